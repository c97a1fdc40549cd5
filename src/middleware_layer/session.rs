use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{crypto::token, error::AppError, state::AppState};

/// The name of the playback session cookie.
pub const SESSION_COOKIE: &str = "ps";

/// A middleware that requires a valid playback session cookie.
///
/// On success the decoded claims are inserted as a request extension. The
/// rejection message never distinguishes a tampered token from an expired
/// one.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response` or an `AppError`.
pub async fn require_player_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(cookie) = cookies.get(SESSION_COOKIE) else {
        tracing::warn!("❌ No playback session cookie");
        return Err(AppError::Unauthenticated(
            "Missing session cookie".to_string(),
        ));
    };

    let claims = token::verify_token(cookie.value(), state.config.session_secret.as_ref())?;

    tracing::debug!(
        "✅ Playback session verified: {} {}/{}",
        claims.sub,
        claims.course_id,
        claims.lesson_id
    );

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
