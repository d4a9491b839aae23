use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::domain::UserProfile;
use super::profiles::template_profiles;
use super::service::PricingService;
use super::simulation::SimulationReport;

pub const DEFAULT_GENERATED_PROFILES: usize = 15;
pub const MAX_GENERATED_PROFILES: usize = 5_000;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub include_summary: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    #[serde(flatten)]
    pub report: SimulationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

/// Router builder exposing the pricing engine over HTTP.
pub fn pricing_router(service: Arc<PricingService>) -> Router {
    Router::new()
        .route("/api/v1/pricing/analyze", post(analyze_handler))
        .route("/api/v1/pricing/insight", post(insight_handler))
        .route("/api/v1/pricing/profiles", get(profiles_handler))
        .route("/api/v1/pricing/profiles/import", post(import_handler))
        .route("/api/v1/pricing/profiles/generate", post(generate_handler))
        .route("/api/v1/pricing/template", get(template_handler))
        .route("/api/v1/pricing/simulate", post(simulate_handler))
        .with_state(service)
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<PricingService>>,
    Json(profile): Json<UserProfile>,
) -> Response {
    let decision = service.analyze(&profile);
    (StatusCode::OK, Json(decision)).into_response()
}

pub(crate) async fn insight_handler(
    State(service): State<Arc<PricingService>>,
    Json(profile): Json<UserProfile>,
) -> Response {
    let view = service.insight(&profile).await;
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn profiles_handler(State(service): State<Arc<PricingService>>) -> Response {
    (StatusCode::OK, Json(service.profiles())).into_response()
}

pub(crate) async fn import_handler(
    State(service): State<Arc<PricingService>>,
    Json(payload): Json<Value>,
) -> Response {
    match service.import_value(payload) {
        Ok(count) => (StatusCode::OK, Json(json!({ "imported": count }))).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "retained": service.profile_count(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn generate_handler(
    State(service): State<Arc<PricingService>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let count = request.count.unwrap_or(DEFAULT_GENERATED_PROFILES);
    if count == 0 || count > MAX_GENERATED_PROFILES {
        let payload = json!({
            "error": format!("count must be between 1 and {MAX_GENERATED_PROFILES}"),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    let generated = service.generate(count, request.seed);
    (StatusCode::OK, Json(json!({ "generated": generated }))).into_response()
}

pub(crate) async fn template_handler() -> Response {
    (StatusCode::OK, Json(template_profiles())).into_response()
}

pub(crate) async fn simulate_handler(
    State(service): State<Arc<PricingService>>,
    Json(request): Json<SimulateRequest>,
) -> Response {
    let report = service.simulate(request.seed);
    let narrative = if request.include_summary {
        Some(service.strategy_summary(&report.summary).await)
    } else {
        None
    };

    (StatusCode::OK, Json(SimulateResponse { report, narrative })).into_response()
}
