use std::sync::Arc;

use chrono::Utc;

use crate::reference::{AgentDirectory, SuburbDirectory};

use super::domain::{
    BudgetRange, BuyerType, Lead, LeadId, LeadStatus, LeadSubmission, PreApproval, Timeline,
};

/// Identifies the legal consent text the user agreed to. Bump when the wording
/// on the valuation form changes; stored leads keep the version they consented
/// to.
pub const CONSENT_TEXT_VERSION: &str = "za-popia-seller-v1.2";

/// Recorded with every lead so the stored consent is auditable on its own.
pub const CONSENT_PURPOSE: &str =
    "Share property valuation guidance and introduce suitable agents for the selected suburbs";

/// Validation errors raised by the intake guard. All are recoverable by the
/// caller correcting the submitted form.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("consent must be given before a lead can be stored")]
    ConsentNotGiven,
    #[error("name is required")]
    MissingName,
    #[error("phone is required")]
    MissingPhone,
    #[error("at least one preferred suburb is required")]
    NoPreferredSuburbs,
    #[error("'{0}' is not a covered suburb")]
    UnknownSuburb(String),
    #[error("'{0}' is not a recognised buyer type")]
    InvalidBuyerType(String),
    #[error("'{0}' is not a recognised budget range")]
    InvalidBudgetRange(String),
    #[error("'{0}' is not a recognised timeline")]
    InvalidTimeline(String),
    #[error("'{0}' is not a recognised pre-approval answer")]
    InvalidPreApproval(String),
    #[error("'{0}' is not a known agent")]
    UnknownAgent(String),
}

/// Guard responsible for turning raw submissions into well-formed [`Lead`]s.
///
/// Fails closed: nothing leaves this guard unless every field-shape and
/// consent rule holds, so a rejected submission can never reach storage.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    suburbs: Arc<SuburbDirectory>,
    agents: Arc<AgentDirectory>,
}

impl IntakeGuard {
    pub fn new(suburbs: Arc<SuburbDirectory>, agents: Arc<AgentDirectory>) -> Self {
        Self { suburbs, agents }
    }

    /// Convert an inbound submission into a fully-populated lead.
    ///
    /// On success the fixed consent constants are bound, the current server
    /// time is stamped as both consent and creation timestamp, a fresh id is
    /// generated, and status defaults to `new`. No side effects; persistence
    /// is the repository's job.
    pub fn lead_from_submission(
        &self,
        submission: LeadSubmission,
        assigned_agent_id: Option<String>,
    ) -> Result<Lead, ValidationError> {
        let LeadSubmission { form, provenance } = submission;

        if !form.consent_given {
            return Err(ValidationError::ConsentNotGiven);
        }
        if form.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if form.phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }
        if form.preferred_suburbs.is_empty() {
            return Err(ValidationError::NoPreferredSuburbs);
        }
        for slug in &form.preferred_suburbs {
            if !self.suburbs.contains(slug) {
                return Err(ValidationError::UnknownSuburb(slug.clone()));
            }
        }

        let buyer_type = BuyerType::parse(&form.buyer_type)
            .ok_or_else(|| ValidationError::InvalidBuyerType(form.buyer_type.clone()))?;
        let budget_range = BudgetRange::parse(&form.budget_range)
            .ok_or_else(|| ValidationError::InvalidBudgetRange(form.budget_range.clone()))?;
        let timeline = Timeline::parse(&form.timeline)
            .ok_or_else(|| ValidationError::InvalidTimeline(form.timeline.clone()))?;
        let pre_approved = PreApproval::parse(&form.pre_approved)
            .ok_or_else(|| ValidationError::InvalidPreApproval(form.pre_approved.clone()))?;

        if let Some(agent_id) = &assigned_agent_id {
            if !self.agents.contains_id(agent_id) {
                return Err(ValidationError::UnknownAgent(agent_id.clone()));
            }
        }

        let email = form.email.filter(|value| !value.trim().is_empty());
        let now = Utc::now();

        Ok(Lead {
            id: LeadId::generate(),
            name: form.name,
            phone: form.phone,
            email,
            buyer_type,
            budget_range,
            preferred_suburbs: form.preferred_suburbs,
            timeline,
            pre_approved,
            consent_given: true,
            consent_timestamp: now,
            consent_text_version: CONSENT_TEXT_VERSION.to_string(),
            consent_purpose: CONSENT_PURPOSE.to_string(),
            source_url: provenance.source_url,
            user_agent: provenance.user_agent,
            ip_address: provenance.ip_address,
            created_at: now,
            status: LeadStatus::New,
            assigned_agent_id,
        })
    }
}
