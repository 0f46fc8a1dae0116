use super::common::*;
use crate::leads::validation::{
    IntakeGuard, ValidationError, CONSENT_PURPOSE, CONSENT_TEXT_VERSION,
};
use crate::leads::{LeadStatus, PreApproval};

fn guard() -> IntakeGuard {
    let (suburbs, agents) = directories();
    IntakeGuard::new(suburbs, agents)
}

#[test]
fn rejects_when_consent_is_not_given() {
    let result = guard().lead_from_submission(submission_without_consent(), None);
    assert!(matches!(result, Err(ValidationError::ConsentNotGiven)));
}

#[test]
fn consent_is_checked_before_any_other_rule() {
    let mut submission = submission_without_consent();
    submission.form.name.clear();
    submission.form.buyer_type = "flipping".to_string();

    let result = guard().lead_from_submission(submission, None);
    assert!(matches!(result, Err(ValidationError::ConsentNotGiven)));
}

#[test]
fn rejects_blank_name_and_phone() {
    let mut missing_name = submission();
    missing_name.form.name = "   ".to_string();
    assert!(matches!(
        guard().lead_from_submission(missing_name, None),
        Err(ValidationError::MissingName)
    ));

    let mut missing_phone = submission();
    missing_phone.form.phone = String::new();
    assert!(matches!(
        guard().lead_from_submission(missing_phone, None),
        Err(ValidationError::MissingPhone)
    ));
}

#[test]
fn rejects_unrecognised_enum_values() {
    let mut bad_buyer = submission();
    bad_buyer.form.buyer_type = "flipping".to_string();
    assert!(matches!(
        guard().lead_from_submission(bad_buyer, None),
        Err(ValidationError::InvalidBuyerType(value)) if value == "flipping"
    ));

    let mut bad_budget = submission();
    bad_budget.form.budget_range = "R3m".to_string();
    assert!(matches!(
        guard().lead_from_submission(bad_budget, None),
        Err(ValidationError::InvalidBudgetRange(_))
    ));

    let mut bad_timeline = submission();
    bad_timeline.form.timeline = "someday".to_string();
    assert!(matches!(
        guard().lead_from_submission(bad_timeline, None),
        Err(ValidationError::InvalidTimeline(_))
    ));

    let mut bad_approval = submission();
    bad_approval.form.pre_approved = "maybe".to_string();
    assert!(matches!(
        guard().lead_from_submission(bad_approval, None),
        Err(ValidationError::InvalidPreApproval(_))
    ));
}

#[test]
fn rejects_empty_and_unknown_preferred_suburbs() {
    let mut empty = submission();
    empty.form.preferred_suburbs.clear();
    assert!(matches!(
        guard().lead_from_submission(empty, None),
        Err(ValidationError::NoPreferredSuburbs)
    ));

    let mut unknown = submission();
    unknown.form.preferred_suburbs.push("atlantis".to_string());
    assert!(matches!(
        guard().lead_from_submission(unknown, None),
        Err(ValidationError::UnknownSuburb(slug)) if slug == "atlantis"
    ));
}

#[test]
fn rejects_assignment_to_unknown_agent() {
    let result = guard().lead_from_submission(submission(), Some("ag_99".to_string()));
    assert!(matches!(
        result,
        Err(ValidationError::UnknownAgent(id)) if id == "ag_99"
    ));
}

#[test]
fn successful_intake_binds_consent_constants_and_defaults() {
    let lead = guard()
        .lead_from_submission(submission(), Some("ag_02".to_string()))
        .expect("valid submission passes");

    assert!(lead.consent_given);
    assert_eq!(lead.consent_text_version, CONSENT_TEXT_VERSION);
    assert_eq!(lead.consent_purpose, CONSENT_PURPOSE);
    assert_eq!(lead.consent_timestamp, lead.created_at);
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.pre_approved, PreApproval::Yes);
    assert_eq!(lead.assigned_agent_id.as_deref(), Some("ag_02"));
    assert_eq!(
        lead.preferred_suburbs,
        vec!["bryanston".to_string(), "sandown".to_string()]
    );
    assert!(!lead.id.0.is_empty());
}

#[test]
fn blank_email_is_normalised_to_none() {
    let mut submission = submission();
    submission.form.email = Some("  ".to_string());
    let lead = guard()
        .lead_from_submission(submission, None)
        .expect("valid submission passes");
    assert_eq!(lead.email, None);
}

#[test]
fn each_intake_generates_a_distinct_id() {
    let guard = guard();
    let first = guard
        .lead_from_submission(submission(), None)
        .expect("valid submission passes");
    let second = guard
        .lead_from_submission(submission(), None)
        .expect("valid submission passes");
    assert_ne!(first.id, second.id);
}
