use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::leads::domain::{
    BudgetRange, BuyerType, Lead, LeadForm, LeadId, LeadStatus, LeadSubmission, PreApproval,
    SubmissionProvenance, Timeline,
};
use crate::leads::repository::{LeadFilters, LeadRepository, RepositoryError};
use crate::leads::router::lead_router;
use crate::leads::service::LeadService;
use crate::leads::validation::{CONSENT_PURPOSE, CONSENT_TEXT_VERSION};
use crate::reference::{AgentDirectory, SuburbDirectory};

pub(super) fn directories() -> (Arc<SuburbDirectory>, Arc<AgentDirectory>) {
    let suburbs = SuburbDirectory::load_embedded().expect("embedded suburbs parse");
    let agents = AgentDirectory::load_embedded().expect("embedded agents parse");
    (Arc::new(suburbs), Arc::new(agents))
}

pub(super) fn submission() -> LeadSubmission {
    LeadSubmission {
        form: LeadForm {
            name: "Naledi Khumalo".to_string(),
            phone: "+27 82 123 4567".to_string(),
            email: Some("naledi@example.com".to_string()),
            buyer_type: "upgrading".to_string(),
            budget_range: "3-6m".to_string(),
            preferred_suburbs: vec!["bryanston".to_string(), "sandown".to_string()],
            timeline: "0-3".to_string(),
            pre_approved: "yes".to_string(),
            consent_given: true,
        },
        provenance: SubmissionProvenance {
            source_url: "https://example.co.za/sell-house/sandton/bryanston".to_string(),
            user_agent: "test-suite".to_string(),
            ip_address: Some("203.0.113.7".to_string()),
        },
    }
}

pub(super) fn submission_without_consent() -> LeadSubmission {
    let mut submission = submission();
    submission.form.consent_given = false;
    submission
}

pub(super) fn fixed_instant(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0)
        .single()
        .expect("valid instant")
}

/// Fully-formed lead for driving repositories directly, bypassing intake.
pub(super) fn lead_record(name: &str, suburbs: &[&str], created_at: DateTime<Utc>) -> Lead {
    Lead {
        id: LeadId::generate(),
        name: name.to_string(),
        phone: "+27 82 000 1111".to_string(),
        email: None,
        buyer_type: BuyerType::FirstTime,
        budget_range: BudgetRange::From3To6M,
        preferred_suburbs: suburbs.iter().map(|slug| slug.to_string()).collect(),
        timeline: Timeline::ThreeToSixMonths,
        pre_approved: PreApproval::No,
        consent_given: true,
        consent_timestamp: created_at,
        consent_text_version: CONSENT_TEXT_VERSION.to_string(),
        consent_purpose: CONSENT_PURPOSE.to_string(),
        source_url: "https://example.co.za/sell-house/sandton/bryanston".to_string(),
        user_agent: "test-suite".to_string(),
        ip_address: None,
        created_at,
        status: LeadStatus::New,
        assigned_agent_id: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<LeadId, Lead>>>,
}

impl LeadRepository for MemoryRepository {
    fn create(&self, lead: &Lead) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&lead.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(lead.id.clone(), lead.clone());
        Ok(())
    }

    fn get(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, filters: &LeadFilters) -> Result<Vec<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut leads: Vec<Lead> = guard
            .values()
            .filter(|lead| {
                filters.status.map_or(true, |status| lead.status == status)
                    && filters.agent_id.as_ref().map_or(true, |agent| {
                        lead.assigned_agent_id.as_deref() == Some(agent.as_str())
                    })
                    && filters.suburb.as_ref().map_or(true, |suburb| {
                        lead.preferred_suburbs
                            .iter()
                            .any(|slug| slug.contains(suburb.as_str()))
                    })
                    && filters.created_from.map_or(true, |from| lead.created_at >= from)
                    && filters
                        .created_until
                        .map_or(true, |until| lead.created_at <= until)
            })
            .cloned()
            .collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    fn update_status(&self, id: &LeadId, status: LeadStatus) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(id) {
            Some(lead) => {
                lead.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

pub(super) struct UnavailableRepository;

impl LeadRepository for UnavailableRepository {
    fn create(&self, _lead: &Lead) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filters: &LeadFilters) -> Result<Vec<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(&self, _id: &LeadId, _status: LeadStatus) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (LeadService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let (suburbs, agents) = directories();
    let service = LeadService::new(repository.clone(), suburbs, agents);
    (service, repository)
}

pub(super) fn lead_router_with_service(service: LeadService<MemoryRepository>) -> axum::Router {
    lead_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
