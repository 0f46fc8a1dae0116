use crate::infra::{AppState, ReferenceState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use suburb_leads::leads::{lead_router, LeadRepository, LeadService};
use suburb_leads::reference::agents_for_suburb;

pub(crate) fn with_lead_routes<R>(
    service: Arc<LeadService<R>>,
    reference: ReferenceState,
) -> axum::Router
where
    R: LeadRepository + 'static,
{
    lead_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/suburbs", axum::routing::get(suburbs_endpoint))
        .route(
            "/api/v1/suburbs/:suburb_slug",
            axum::routing::get(suburb_detail_endpoint),
        )
        .route(
            "/api/v1/suburbs/:suburb_slug/agents",
            axum::routing::get(suburb_agents_endpoint),
        )
        .layer(Extension(reference))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn suburbs_endpoint(
    Extension(reference): Extension<ReferenceState>,
) -> impl IntoResponse {
    Json(json!({
        "city": reference.suburbs.city(),
        "province": reference.suburbs.province(),
        "suburbs": reference.suburbs.all(),
    }))
}

pub(crate) async fn suburb_detail_endpoint(
    Extension(reference): Extension<ReferenceState>,
    Path(suburb_slug): Path<String>,
) -> impl IntoResponse {
    match reference.suburbs.by_slug(&suburb_slug) {
        Some(suburb) => (StatusCode::OK, Json(json!(suburb))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "unknown suburb", "suburb": suburb_slug })),
        ),
    }
}

/// Ranked agent recommendations for a suburb. An unknown slug is not an
/// error: it simply yields the generalist fallback, matching the matcher's
/// contract.
pub(crate) async fn suburb_agents_endpoint(
    Extension(reference): Extension<ReferenceState>,
    Path(suburb_slug): Path<String>,
) -> impl IntoResponse {
    let matches = agents_for_suburb(&reference.agents, &suburb_slug, &reference.policy);
    let agents: Vec<serde_json::Value> = matches
        .iter()
        .map(|agent| {
            let badge = agent
                .suburbs
                .get(&suburb_slug)
                .and_then(|profile| profile.badge.clone());
            json!({ "agent": agent, "badge": badge })
        })
        .collect();

    Json(json!({ "suburb": suburb_slug, "agents": agents }))
}
