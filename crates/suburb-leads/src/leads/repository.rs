use chrono::{DateTime, Utc};

use super::domain::{Lead, LeadId, LeadStatus};

/// Storage abstraction so the service module can be exercised in isolation
/// and the backing engine can be swapped without touching callers.
pub trait LeadRepository: Send + Sync {
    /// Persist a new lead as one durable row. All-or-nothing: either the
    /// full record including consent metadata is stored, or nothing is.
    fn create(&self, lead: &Lead) -> Result<(), RepositoryError>;

    /// Fetch by id. A missing id is not an error.
    fn get(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;

    /// Return leads matching the filter bundle, newest first.
    fn list(&self, filters: &LeadFilters) -> Result<Vec<Lead>, RepositoryError>;

    /// Transition the status field only. Returns whether a row was actually
    /// changed (`false` when the id does not exist).
    fn update_status(&self, id: &LeadId, status: LeadStatus) -> Result<bool, RepositoryError>;
}

/// Optional, conjunctive list filters. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct LeadFilters {
    pub status: Option<LeadStatus>,
    pub agent_id: Option<String>,
    /// Substring match against the stored preferred-suburbs list.
    pub suburb: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_until: Option<DateTime<Utc>>,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lead already exists")]
    Conflict,
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}
