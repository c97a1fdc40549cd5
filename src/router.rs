use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;

use crate::{handlers, middleware_layer, state::AppState};

/// The session issuer route.
///
/// Registered for POST only, so the router answers other methods with 405.
pub fn issuer_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/player/session", post(handlers::session::issue_session))
        .with_state(state)
}

/// The cookie-gated playback routes: page, byte stream, presence channel.
pub fn playback_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/player", get(handlers::player::render_player))
        .route("/api/player/stream", get(handlers::stream::stream_media))
        .route(
            "/api/player/presence",
            get(handlers::presence::presence_socket),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::session::require_player_session,
        ))
        .with_state(state)
}

/// The full playback route table, without the binary-only layers (rate
/// limiting, CORS, tracing). Tests drive this router directly.
pub fn player_routes(state: AppState) -> Router {
    Router::new()
        .merge(issuer_routes(state.clone()))
        .merge(playback_routes(state))
        .layer(CookieManagerLayer::new())
}
