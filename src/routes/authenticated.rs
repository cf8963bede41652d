use crate::{
    AppState,
    handlers::{auth, boards, check_ins, users},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Every route here sits behind `auth_middleware`, and every handler goes through
/// `OwnerScope`, so reads and writes are limited to the caller's own rows.
/// Updates accept both PUT and PATCH with partial-update semantics.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Session ---
        // POST /api/auth/logout
        // Deletes the session row; the token is revoked immediately.
        .route("/api/auth/logout", post(auth::logout))
        // GET /api/auth/me
        .route("/api/auth/me", get(auth::me))
        // POST /api/auth/refresh-token
        // Swaps the current session for a new one with a fresh expiry.
        .route("/api/auth/refresh-token", post(auth::refresh_token))
        // --- Boards ---
        .route(
            "/api/boards",
            get(boards::list_boards).post(boards::create_board),
        )
        .route(
            "/api/boards/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .patch(boards::update_board)
                .delete(boards::delete_board),
        )
        // --- Check-ins ---
        // GET /api/check-ins?board_id=...
        .route(
            "/api/check-ins",
            get(check_ins::list_check_ins).post(check_ins::create_check_in),
        )
        .route(
            "/api/check-ins/{id}",
            get(check_ins::get_check_in)
                .put(check_ins::update_check_in)
                .patch(check_ins::update_check_in)
                .delete(check_ins::delete_check_in),
        )
        // --- Users ---
        // Only the caller's own record is visible.
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
