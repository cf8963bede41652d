use crate::{
    AppState,
    handlers::{auth, system},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. Nothing here reads or writes
/// user-owned data.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe with process uptime.
        .route("/health", get(system::health))
        // POST /api/auth/register
        // Creates an account and returns a session (cookie + body).
        .route("/api/auth/register", post(auth::register))
        // POST /api/auth/login
        // Exchanges email and password for a session.
        .route("/api/auth/login", post(auth::login))
        // GET /api/units?category=...
        // The built-in unit table used for quantitative boards.
        .route("/api/units", get(system::list_units))
        // GET /api/units/presets
        .route("/api/units/presets", get(system::list_presets))
}
