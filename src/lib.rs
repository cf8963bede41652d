use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::time::Instant;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod defaults;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod scope;
pub mod units;

// Module for routing segregation (Public, Authenticated).
pub mod routes;
use auth::AuthUser;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the
/// OpenAPI document. The JSON is served at `/swagger`, the UI at `/docs`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::system::health, handlers::system::list_units, handlers::system::list_presets,
        handlers::auth::register, handlers::auth::login, handlers::auth::logout,
        handlers::auth::me, handlers::auth::refresh_token,
        handlers::boards::list_boards, handlers::boards::create_board, handlers::boards::get_board,
        handlers::boards::update_board, handlers::boards::delete_board,
        handlers::check_ins::list_check_ins, handlers::check_ins::create_check_in,
        handlers::check_ins::get_check_in, handlers::check_ins::update_check_in,
        handlers::check_ins::delete_check_in,
        handlers::users::list_users, handlers::users::get_user, handlers::users::update_user,
        handlers::users::delete_user
    ),
    components(
        schemas(
            models::Board, models::CheckIn, models::BoardDetails, models::CheckInDetails,
            models::UserProfile, models::SessionToken, models::RegisterRequest,
            models::LoginRequest, models::UpdateUserRequest, models::CreateBoardRequest,
            models::UpdateBoardRequest, models::CreateCheckInRequest, models::UpdateCheckInRequest,
            models::AuthResponse, models::MessageResponse, models::UserResponse,
            models::UserListResponse, models::BoardResponse, models::BoardDetailsResponse,
            models::BoardListResponse, models::CheckInResponse, models::CheckInListResponse,
            units::UnitMapping, units::UnitCategory, units::HabitPreset,
            handlers::system::HealthResponse, handlers::system::UnitsResponse,
            handlers::system::PresetsResponse, errors::ErrorBody, errors::ErrorEntry,
        )
    ),
    tags(
        (name = "habit-tracker", description = "Habit Tracker API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The single, immutable container of shared services, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: PostgreSQL in production, in-memory in tests.
    pub repo: RepositoryState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
    /// Process start, reported as uptime by `/health`.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self {
            repo,
            config,
            started_at: Instant::now(),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors pull single components out of the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Guards the authenticated routes. The `AuthUser` extractor rejects the request
/// with 401 before the handler runs; on success the identity is stored in the
/// request extensions so handler-side extractors do not repeat the lookups.
async fn auth_middleware(auth_user: AuthUser, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(auth_user);
    next.run(request).await
}

/// create_router
///
/// Assembles the routing table, applies global and scoped middleware and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI at /docs, OpenAPI JSON at /swagger.
        .merge(SwaggerUi::new("/docs").url("/swagger", ApiDoc::openapi()))
        // Public Routes: No middleware applied.
        .merge(public::public_routes())
        // Authenticated Routes: Protected by the `auth_middleware`.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, carrying the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the `TraceLayer` span: HTTP method, URI and the `x-request-id`, so every
/// log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
