use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tower_cookies::cookie::{time::Duration, SameSite};
use tower_cookies::{Cookie, Cookies};

use crate::{
    crypto::token,
    error::{AppError, Result},
    middleware_layer::session::SESSION_COOKIE,
    models::claims::{PlayerClaims, Provider},
    state::AppState,
    validation::session::{validate_identifier, validate_reference},
};

/// The fixed, parameter-free playback URL.
///
/// All playback state lives in the cookie, so sharing this URL carries
/// nothing a recipient could use without their own entitled session.
pub const PLAYER_URL: &str = "/api/player";

/// The request payload for issuing a playback session.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IssueSessionRequest {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub lesson_id: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub reference: String,
}

/// Extracts the bearer credential from the Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let credential = credential.trim();
    (!credential.is_empty()).then(|| credential.to_string())
}

/// Builds the playback session cookie.
fn session_cookie(token: String, ttl_secs: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);

    let is_production =
        std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()) == "production";

    cookie.set_http_only(true);

    if is_production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(Duration::seconds(ttl_secs));
    cookie.set_path(PLAYER_URL);

    cookie
}

/// Mints a signed playback session for an entitled caller.
///
/// Purely a token mint: nothing is persisted, and every failure is terminal
/// for the request.
#[axum::debug_handler]
pub async fn issue_session(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(payload): Json<IssueSessionRequest>,
) -> Result<Response> {
    tracing::info!(
        "🎫 Issue playback session - course: {}, lesson: {}",
        payload.course_id,
        payload.lesson_id
    );

    let credential = extract_bearer(&headers).ok_or_else(|| {
        AppError::Unauthenticated("Missing Authorization bearer token".to_string())
    })?;

    validate_identifier("courseId", &payload.course_id)?;
    validate_identifier("lessonId", &payload.lesson_id)?;
    validate_reference(&payload.reference)?;

    let provider = Provider::parse(&payload.provider)
        .ok_or_else(|| AppError::Validation("Unsupported video provider".to_string()))?;

    let identity = state.oracle.verify_credential(&credential).await?;
    tracing::debug!("✅ Credential verified: {}", identity);

    if !state
        .oracle
        .is_entitled(&identity, &payload.course_id)
        .await?
    {
        tracing::warn!("❌ {} is not enrolled in {}", identity, payload.course_id);
        return Err(AppError::NotEntitled);
    }

    let issued_at = Utc::now().timestamp();
    let claims = PlayerClaims::mint(
        identity,
        payload.course_id,
        payload.lesson_id,
        provider,
        payload.reference,
        issued_at,
        state.config.session_ttl_secs,
    );

    let signed = token::sign_claims(&claims, state.config.session_secret.as_ref())?;
    cookies.add(session_cookie(signed, state.config.session_ttl_secs));

    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| AppError::Internal("Session expiry out of range".to_string()))?;

    tracing::info!(
        "✅ Playback session issued for {}, expires {}",
        claims.sub,
        expires_at.to_rfc3339()
    );

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "playerUrl": PLAYER_URL,
        "expiresAt": expires_at.to_rfc3339(),
    }))
    .map_err(|e| AppError::Internal(format!("Response serialization failed: {}", e)))?;

    Ok((StatusCode::OK, body).into_response())
}
