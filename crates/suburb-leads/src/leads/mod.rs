//! Lead capture: consent-guarded validation, durable persistence, and the
//! HTTP intake surface.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    BudgetRange, BuyerType, Lead, LeadForm, LeadId, LeadStatus, LeadSubmission, PreApproval,
    SubmissionProvenance, Timeline,
};
pub use repository::{LeadFilters, LeadRepository, RepositoryError};
pub use router::lead_router;
pub use service::{LeadService, LeadServiceError};
pub use sqlite::SqliteLeadRepository;
pub use validation::{IntakeGuard, ValidationError, CONSENT_PURPOSE, CONSENT_TEXT_VERSION};
