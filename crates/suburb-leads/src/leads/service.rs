use std::sync::Arc;

use tracing::info;

use crate::reference::{AgentDirectory, SuburbDirectory};

use super::domain::{Lead, LeadId, LeadStatus, LeadSubmission};
use super::repository::{LeadFilters, LeadRepository, RepositoryError};
use super::validation::{IntakeGuard, ValidationError};

/// Service composing the intake guard and the lead repository.
///
/// One instance per process, shared across requests; the repository behind it
/// is the only shared mutable resource.
pub struct LeadService<R> {
    guard: IntakeGuard,
    repository: Arc<R>,
}

impl<R> LeadService<R>
where
    R: LeadRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        suburbs: Arc<SuburbDirectory>,
        agents: Arc<AgentDirectory>,
    ) -> Self {
        Self {
            guard: IntakeGuard::new(suburbs, agents),
            repository,
        }
    }

    /// Validate a submission and persist the resulting lead.
    ///
    /// Validation runs to completion before any storage call, so a rejected
    /// submission never produces a partial write.
    pub fn submit(
        &self,
        submission: LeadSubmission,
        assigned_agent_id: Option<String>,
    ) -> Result<Lead, LeadServiceError> {
        let lead = self
            .guard
            .lead_from_submission(submission, assigned_agent_id)?;
        self.repository.create(&lead)?;

        info!(
            lead_id = %lead.id,
            suburbs = lead.preferred_suburbs.len(),
            assigned = lead.assigned_agent_id.is_some(),
            "lead captured"
        );
        Ok(lead)
    }

    pub fn lead(&self, id: &LeadId) -> Result<Option<Lead>, LeadServiceError> {
        Ok(self.repository.get(id)?)
    }

    pub fn leads(&self, filters: &LeadFilters) -> Result<Vec<Lead>, LeadServiceError> {
        Ok(self.repository.list(filters)?)
    }

    /// Move a lead to a new status. Returns whether a row actually changed;
    /// an unknown id yields `false`, not an error.
    pub fn update_status(
        &self,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<bool, LeadServiceError> {
        let Some(current) = self.repository.get(id)? else {
            return Ok(false);
        };
        if !current.status.allows_transition_to(status) {
            return Ok(false);
        }
        Ok(self.repository.update_status(id, status)?)
    }
}

/// Error raised by the lead service. Validation and persistence failures stay
/// distinguishable so callers can tell "fix your input" from "try again
/// later".
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
