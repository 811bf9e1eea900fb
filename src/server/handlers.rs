use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::finder::{FinderError, ProximityReport};
use crate::geocode::GeocodeError;
use crate::network::NetworkSummary;
use crate::proximity::{ProximityTier, CONNECTABLE_MAX_M, EXTENDABLE_MAX_M, NEARBY_PLANNED_MAX_M};
use crate::recommendation::Language;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<FinderError> for ApiError {
    fn from(e: FinderError) -> Self {
        let status = match &e {
            FinderError::Proximity(_) => StatusCode::BAD_REQUEST,
            FinderError::GeocodingFailed(GeocodeError::NoInput) => StatusCode::BAD_REQUEST,
            FinderError::GeocodingFailed(GeocodeError::NotFound(_)) => StatusCode::NOT_FOUND,
            FinderError::GeocodingFailed(_) => StatusCode::BAD_GATEWAY,
        };
        api_error(status, e.to_string())
    }
}

// ─── GET /api/check ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckQuery {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub lang: Option<String>,
}

pub async fn check(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckQuery>,
) -> Result<Json<ProximityReport>, ApiError> {
    let start = Instant::now();

    let lang = match params.lang.as_deref() {
        Some(l) => l.parse::<Language>().map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => state.finder.language(),
    };

    let address = params.address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

    let report = match (address, params.lat, params.lon) {
        (Some(address), _, _) => {
            let shared = Arc::clone(&state);
            // The geocoder does blocking HTTP.
            tokio::task::spawn_blocking(move || shared.finder.check_address_in(&address, lang))
                .await
                .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        }
        (None, Some(lat), Some(lon)) => state.finder.check_coordinates_in(lat, lon, lang),
        _ => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Provide 'address' or 'lat'+'lon' parameters",
            ))
        }
    };

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match report {
        Ok(report) => {
            info!(
                "GET /api/check '{}' -> {} ({:.1}ms)",
                report.location.query, report.result.tier, elapsed_ms
            );
            Ok(Json(report))
        }
        Err(e) => {
            warn!("GET /api/check -> {} ({:.1}ms)", e, elapsed_ms);
            Err(e.into())
        }
    }
}

// ─── GET /api/networks ───────────────────────────────────────────

pub async fn networks(State(state): State<Arc<AppState>>) -> Json<Vec<NetworkSummary>> {
    Json(state.finder.table().summaries())
}

// ─── GET /api/tiers ──────────────────────────────────────────────

#[derive(Debug, Serialize, PartialEq)]
pub struct TierInfo {
    pub tier: ProximityTier,
    pub min_meters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_meters: Option<f64>,
    pub max_inclusive: bool,
}

pub async fn tiers() -> Json<Vec<TierInfo>> {
    Json(vec![
        TierInfo {
            tier: ProximityTier::Connectable,
            min_meters: 0.0,
            max_meters: Some(CONNECTABLE_MAX_M),
            max_inclusive: false,
        },
        TierInfo {
            tier: ProximityTier::NearbyPlanned,
            min_meters: CONNECTABLE_MAX_M,
            max_meters: Some(NEARBY_PLANNED_MAX_M),
            max_inclusive: false,
        },
        TierInfo {
            tier: ProximityTier::Extendable,
            min_meters: NEARBY_PLANNED_MAX_M,
            max_meters: Some(EXTENDABLE_MAX_M),
            max_inclusive: true,
        },
        TierInfo {
            tier: ProximityTier::None,
            min_meters: EXTENDABLE_MAX_M,
            max_meters: None,
            max_inclusive: false,
        },
    ])
}
