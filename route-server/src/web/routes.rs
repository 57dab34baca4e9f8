//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::planner::{PlanError, Planner};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops", get(list_stops))
        .route("/routes/plan", post(plan_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every stop in the current snapshot.
async fn list_stops(State(state): State<AppState>) -> Json<StopsResponse> {
    let snapshot = state.snapshot.current().await;

    Json(StopsResponse {
        city: snapshot.city().to_string(),
        stops: snapshot.stops().iter().map(StopResult::from_stop).collect(),
    })
}

/// Plan routes between two points.
async fn plan_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanRoutesResponse>, AppError> {
    // Parse JSON manually so malformed bodies get the same error shape
    let req: PlanRoutesRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(body = %String::from_utf8_lossy(&body), "rejected plan request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let request = req
        .to_plan_request()
        .map_err(|message| AppError::BadRequest { message })?;

    let snapshot = state.snapshot.current().await;
    let planner = Planner::new(&snapshot, &state.config);
    let result = planner.plan(&request)?;

    info!(
        direct_km = result.direct_km,
        candidates = result.candidates().count(),
        best = result.best().map(|r| r.category().as_str()),
        "planned routes"
    );

    Ok(Json(PlanRoutesResponse::from_result(&result)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            PlanError::Path(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
