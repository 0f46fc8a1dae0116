use std::sync::Arc;

use super::common::*;
use crate::leads::repository::{LeadFilters, LeadRepository};
use crate::leads::service::{LeadService, LeadServiceError};
use crate::leads::validation::ValidationError;
use crate::leads::{LeadId, LeadStatus};

#[test]
fn submit_persists_the_validated_lead() {
    let (service, repository) = build_service();

    let lead = service
        .submit(submission(), None)
        .expect("submission succeeds");

    let stored = repository
        .get(&lead.id)
        .expect("fetch succeeds")
        .expect("lead stored");
    assert_eq!(stored, lead);
    assert_eq!(repository.len(), 1);
}

#[test]
fn rejected_submission_never_reaches_storage() {
    let (service, repository) = build_service();

    let result = service.submit(submission_without_consent(), None);
    assert!(matches!(
        result,
        Err(LeadServiceError::Validation(ValidationError::ConsentNotGiven))
    ));
    assert_eq!(repository.len(), 0);
    assert!(repository
        .list(&LeadFilters::default())
        .expect("list succeeds")
        .is_empty());
}

#[test]
fn submit_accepts_a_known_assigned_agent() {
    let (service, _) = build_service();

    let lead = service
        .submit(submission(), Some("ag_04".to_string()))
        .expect("submission succeeds");
    assert_eq!(lead.assigned_agent_id.as_deref(), Some("ag_04"));
}

#[test]
fn update_status_round_trips_through_the_repository() {
    let (service, _) = build_service();
    let lead = service
        .submit(submission(), None)
        .expect("submission succeeds");

    let updated = service
        .update_status(&lead.id, LeadStatus::Contacted)
        .expect("update succeeds");
    assert!(updated);

    let fetched = service
        .lead(&lead.id)
        .expect("fetch succeeds")
        .expect("lead present");
    assert_eq!(fetched.status, LeadStatus::Contacted);
}

#[test]
fn update_status_on_unknown_id_reports_no_change() {
    let (service, _) = build_service();
    let updated = service
        .update_status(&LeadId("missing".to_string()), LeadStatus::Closed)
        .expect("update succeeds");
    assert!(!updated);
}

#[test]
fn storage_failures_surface_as_repository_errors() {
    let (suburbs, agents) = directories();
    let service = LeadService::new(Arc::new(UnavailableRepository), suburbs, agents);

    let result = service.submit(submission(), None);
    assert!(matches!(result, Err(LeadServiceError::Repository(_))));
}

#[test]
fn list_passes_filters_through() {
    let (service, _) = build_service();
    service
        .submit(submission(), Some("ag_02".to_string()))
        .expect("submission succeeds");
    service
        .submit(submission(), None)
        .expect("submission succeeds");

    let assigned = service
        .leads(&LeadFilters {
            agent_id: Some("ag_02".to_string()),
            ..LeadFilters::default()
        })
        .expect("list succeeds");
    assert_eq!(assigned.len(), 1);

    let all = service
        .leads(&LeadFilters::default())
        .expect("list succeeds");
    assert_eq!(all.len(), 2);
}
