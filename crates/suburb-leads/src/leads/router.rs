use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeadForm, LeadId, LeadStatus, LeadSubmission, SubmissionProvenance};
use super::repository::{LeadFilters, LeadRepository, RepositoryError};
use super::service::{LeadService, LeadServiceError};

/// Router builder exposing the lead intake and management endpoints.
pub fn lead_router<R>(service: Arc<LeadService<R>>) -> Router
where
    R: LeadRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/leads",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/leads/:lead_id", get(lead_handler::<R>))
        .route(
            "/api/v1/leads/:lead_id/status",
            patch(update_status_handler::<R>),
        )
        .with_state(service)
}

/// Body of a lead submission: the raw form plus the page it came from and an
/// optional chosen agent.
#[derive(Debug, Deserialize)]
pub struct SubmitLeadRequest {
    #[serde(flatten)]
    pub form: LeadForm,
    pub source_url: String,
    #[serde(default)]
    pub assigned_agent_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListLeadsQuery {
    pub status: Option<String>,
    pub agent_id: Option<String>,
    pub suburb: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeadStatusRequest {
    pub status: String,
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<SubmitLeadRequest>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let submission = LeadSubmission {
        form: request.form,
        provenance: provenance_from_headers(request.source_url, &headers),
    };

    match service.submit(submission, request.assigned_agent_id) {
        Ok(lead) => (StatusCode::CREATED, axum::Json(lead)).into_response(),
        Err(LeadServiceError::Validation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(LeadServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "lead already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn lead_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let id = LeadId(lead_id);
    match service.lead(&id) {
        Ok(Some(lead)) => (StatusCode::OK, axum::Json(lead)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "lead not found", "lead_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    Query(query): Query<ListLeadsQuery>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let filters = match filters_from_query(query) {
        Ok(filters) => filters,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.leads(&filters) {
        Ok(leads) => (StatusCode::OK, axum::Json(leads)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn update_status_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<UpdateLeadStatusRequest>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let Some(status) = LeadStatus::parse(&request.status) else {
        let payload = json!({
            "error": format!("'{}' is not a recognised lead status", request.status),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    let id = LeadId(lead_id);
    match service.update_status(&id, status) {
        Ok(updated) => {
            let payload = json!({ "lead_id": id.0, "updated": updated });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn provenance_from_headers(source_url: String, headers: &HeaderMap) -> SubmissionProvenance {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    SubmissionProvenance {
        source_url,
        user_agent,
        ip_address,
    }
}

fn filters_from_query(query: ListLeadsQuery) -> Result<LeadFilters, String> {
    let status = match query.status {
        Some(raw) => Some(
            LeadStatus::parse(&raw)
                .ok_or_else(|| format!("'{raw}' is not a recognised lead status"))?,
        ),
        None => None,
    };

    let created_from = query
        .from
        .map(|raw| parse_filter_date(&raw).map(day_start))
        .transpose()?;
    let created_until = query
        .to
        .map(|raw| parse_filter_date(&raw).map(day_end))
        .transpose()?;

    Ok(LeadFilters {
        status,
        agent_id: query.agent_id,
        suburb: query.suburb,
        created_from,
        created_until,
    })
}

fn parse_filter_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    let next_midnight = date.and_time(NaiveTime::MIN) + Duration::days(1);
    Utc.from_utc_datetime(&(next_midnight - Duration::nanoseconds(1)))
}
