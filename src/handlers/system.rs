use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::{
    AppState,
    errors::{ApiError, ErrorBody},
    units::{self, HabitPreset, UnitCategory, UnitMapping},
};

/// HealthResponse
#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the process started.
    pub uptime: f64,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
}

/// health
///
/// [Public Route] Liveness probe for monitoring and load balancers.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: Utc::now(),
    })
}

/// UnitFilter
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UnitFilter {
    /// Restrict the list to one category (e.g. `volume`).
    pub category: Option<String>,
}

/// UnitsResponse
#[derive(Debug, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct UnitsResponse {
    pub categories: Vec<UnitCategory>,
    pub units: Vec<UnitMapping>,
}

/// list_units
///
/// [Public Route] Returns the built-in unit table so clients can offer units and
/// pre-fill default values when creating quantitative boards.
#[utoipa::path(
    get,
    path = "/api/units",
    params(UnitFilter),
    responses(
        (status = 200, description = "Unit table", body = UnitsResponse),
        (status = 422, description = "Unknown category", body = ErrorBody)
    )
)]
pub async fn list_units(
    Query(filter): Query<UnitFilter>,
) -> Result<Json<UnitsResponse>, ApiError> {
    let units: Vec<UnitMapping> = match filter.category.as_deref() {
        None => units::ALL_UNITS.iter().map(|u| u.to_mapping()).collect(),
        Some(name) => {
            let category = UnitCategory::parse(name)
                .filter(|c| *c != UnitCategory::Custom)
                .ok_or_else(|| ApiError::Field {
                    field: "category",
                    message: format!("Unknown unit category: {name}"),
                })?;
            units::units_by_category(category)
                .into_iter()
                .map(|u| u.to_mapping())
                .collect()
        }
    };

    Ok(Json(UnitsResponse {
        categories: units::categories().to_vec(),
        units,
    }))
}

/// PresetsResponse
#[derive(Debug, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct PresetsResponse {
    pub presets: Vec<HabitPreset>,
}

/// list_presets
///
/// [Public Route] Ready-made quantitative habits with suggested targets.
#[utoipa::path(
    get,
    path = "/api/units/presets",
    responses((status = 200, description = "Habit presets", body = PresetsResponse))
)]
pub async fn list_presets() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: units::habit_presets(),
    })
}
