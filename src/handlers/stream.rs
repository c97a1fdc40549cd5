use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use crate::{
    error::{AppError, Result},
    models::claims::{PlayerClaims, Provider},
    state::AppState,
};

/// Content types an upstream may legitimately label video bytes with.
fn is_media_content_type(content_type: &str) -> bool {
    content_type.starts_with("video/") || content_type.starts_with("application/octet-stream")
}

fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            '\n' | '\r' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Reconciles the upstream status before anything reaches the client.
///
/// Some upstreams report 206 while returning the whole body; forwarding 206
/// without `Content-Range` breaks compliant clients, so that combination is
/// downgraded to 200.
fn reconcile_status(upstream: u16, has_content_range: bool) -> Result<StatusCode> {
    let status = match upstream {
        206 if !has_content_range => {
            tracing::warn!("⚠️ Upstream sent 206 without Content-Range, downgrading to 200");
            200
        }
        s => s,
    };

    StatusCode::from_u16(status)
        .map_err(|_| AppError::Internal(format!("Invalid upstream status: {}", upstream)))
}

/// Proxies video bytes from the upstream store to the player.
///
/// The client's `Range` header is forwarded verbatim and the upstream byte
/// stream is piped without full buffering. The signed session is trusted for
/// its whole TTL — no per-byte entitlement re-check.
#[axum::debug_handler]
pub async fn stream_media(
    State(state): State<AppState>,
    Extension(claims): Extension<PlayerClaims>,
    headers: HeaderMap,
) -> Result<Response> {
    if claims.provider != Provider::HostedFile {
        return Err(AppError::Validation("Not a hosted-file session".to_string()));
    }

    tracing::info!(
        "🎬 Stream request - lesson: {}, reference: {}",
        claims.lesson_id,
        claims.reference
    );

    let meta = state.store.metadata(&claims.reference).await?;

    if !meta.mime_type.starts_with("video/") {
        return Err(AppError::UnsupportedContent {
            name: meta.name,
            mime_type: meta.mime_type,
        });
    }

    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    if let Some(range) = range {
        tracing::debug!("↔️ Forwarding range: {}", range);
    }

    let fetch = state.store.fetch(&claims.reference, range).await?;

    if let Some(content_type) = fetch.content_type.as_deref() {
        if !is_media_content_type(content_type) {
            return Err(AppError::UpstreamContract {
                content_type: content_type.to_string(),
            });
        }
    }

    let status = reconcile_status(fetch.status, fetch.content_range.is_some())?;

    let mut response_headers = HeaderMap::new();

    let content_type = fetch
        .content_type
        .unwrap_or_else(|| meta.mime_type.clone());
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .map_err(|_| AppError::Internal("Invalid upstream content type".to_string()))?,
    );

    if let Some(content_length) = fetch.content_length {
        response_headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    }

    if let Some(content_range) = fetch.content_range.as_deref() {
        response_headers.insert(
            header::CONTENT_RANGE,
            HeaderValue::from_str(content_range)
                .map_err(|_| AppError::Internal("Invalid upstream content range".to_string()))?,
        );
    }

    response_headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    let safe_filename = sanitize_filename(&meta.name);
    let disposition = format!(r#"inline; filename="{}""#, safe_filename)
        .parse()
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));
    response_headers.insert(header::CONTENT_DISPOSITION, disposition);

    tracing::debug!(
        "✅ Streaming {} as {} ({})",
        claims.reference,
        content_type,
        status
    );

    Ok((status, response_headers, Body::from_stream(fetch.body)).into_response())
}
