use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use tracing::debug;

use super::domain::{
    BudgetRange, BuyerType, Lead, LeadId, LeadStatus, PreApproval, Timeline,
};
use super::repository::{LeadFilters, LeadRepository, RepositoryError};

/// Safe to run on every startup.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS leads (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT,
    buyer_type TEXT NOT NULL,
    budget_range TEXT NOT NULL,
    preferred_suburbs TEXT NOT NULL,
    timeline TEXT NOT NULL,
    pre_approved TEXT NOT NULL,
    consent_given INTEGER NOT NULL,
    consent_timestamp TEXT NOT NULL,
    consent_text_version TEXT NOT NULL,
    consent_purpose TEXT NOT NULL,
    source_url TEXT NOT NULL,
    user_agent TEXT NOT NULL,
    ip_address TEXT,
    created_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'new',
    assigned_agent_id TEXT
);

CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);
CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at);
CREATE INDEX IF NOT EXISTS idx_leads_assigned_agent_id ON leads(assigned_agent_id);
";

const LEAD_COLUMNS: &str = "id, name, phone, email, buyer_type, budget_range, \
     preferred_suburbs, timeline, pre_approved, consent_given, consent_timestamp, \
     consent_text_version, consent_purpose, source_url, user_agent, ip_address, \
     created_at, status, assigned_agent_id";

/// SQLite-backed lead store.
///
/// Every call funnels through one guarded connection, so concurrent writes
/// serialize at the row level exactly as the embedded engine's single writer
/// would. Construct once per process and share behind `Arc`; reopening the
/// file per request would be a correctness and performance bug.
pub struct SqliteLeadRepository {
    conn: Mutex<Connection>,
}

impl SqliteLeadRepository {
    /// Open (or create) the store at `path`, creating parent directories and
    /// running the idempotent schema setup.
    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
            }
        }
        let conn = Connection::open(path).map_err(storage_error)?;
        debug!(path = %path.display(), "lead store opened");
        Self::with_connection(conn)
    }

    /// Volatile store for tests and demos.
    pub fn in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA).map_err(storage_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl LeadRepository for SqliteLeadRepository {
    fn create(&self, lead: &Lead) -> Result<(), RepositoryError> {
        let suburbs = serde_json::to_string(&lead.preferred_suburbs)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;

        let conn = self.conn.lock().expect("lead store mutex poisoned");
        conn.execute(
            "INSERT INTO leads (
                id, name, phone, email, buyer_type, budget_range, preferred_suburbs,
                timeline, pre_approved, consent_given, consent_timestamp,
                consent_text_version, consent_purpose, source_url, user_agent,
                ip_address, created_at, status, assigned_agent_id
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19
            )",
            params![
                lead.id.0,
                lead.name,
                lead.phone,
                lead.email,
                lead.buyer_type.label(),
                lead.budget_range.label(),
                suburbs,
                lead.timeline.label(),
                lead.pre_approved.label(),
                lead.consent_given,
                lead.consent_timestamp.to_rfc3339(),
                lead.consent_text_version,
                lead.consent_purpose,
                lead.source_url,
                lead.user_agent,
                lead.ip_address,
                lead.created_at.to_rfc3339(),
                lead.status.label(),
                lead.assigned_agent_id,
            ],
        )
        .map_err(insert_error)?;
        Ok(())
    }

    fn get(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let conn = self.conn.lock().expect("lead store mutex poisoned");
        conn.query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
            params![id.0],
            row_to_lead,
        )
        .optional()
        .map_err(storage_error)
    }

    fn list(&self, filters: &LeadFilters) -> Result<Vec<Lead>, RepositoryError> {
        let mut sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(status) = filters.status {
            sql.push_str(&format!(" AND status = ?{}", bindings.len() + 1));
            bindings.push(status.label().to_string());
        }
        if let Some(agent_id) = &filters.agent_id {
            sql.push_str(&format!(" AND assigned_agent_id = ?{}", bindings.len() + 1));
            bindings.push(agent_id.clone());
        }
        if let Some(suburb) = &filters.suburb {
            sql.push_str(&format!(" AND preferred_suburbs LIKE ?{}", bindings.len() + 1));
            bindings.push(format!("%{suburb}%"));
        }
        if let Some(from) = filters.created_from {
            sql.push_str(&format!(" AND created_at >= ?{}", bindings.len() + 1));
            bindings.push(from.to_rfc3339());
        }
        if let Some(until) = filters.created_until {
            sql.push_str(&format!(" AND created_at <= ?{}", bindings.len() + 1));
            bindings.push(until.to_rfc3339());
        }

        sql.push_str(" ORDER BY created_at DESC");

        let conn = self.conn.lock().expect("lead store mutex poisoned");
        let mut stmt = conn.prepare(&sql).map_err(storage_error)?;
        let rows = stmt
            .query_map(params_from_iter(bindings), row_to_lead)
            .map_err(storage_error)?;

        let mut leads = Vec::new();
        for row in rows {
            leads.push(row.map_err(storage_error)?);
        }
        Ok(leads)
    }

    fn update_status(&self, id: &LeadId, status: LeadStatus) -> Result<bool, RepositoryError> {
        let conn = self.conn.lock().expect("lead store mutex poisoned");
        let changed = conn
            .execute(
                "UPDATE leads SET status = ?1 WHERE id = ?2",
                params![status.label(), id.0],
            )
            .map_err(storage_error)?;
        Ok(changed > 0)
    }
}

fn row_to_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let suburbs_raw: String = row.get(6)?;
    let preferred_suburbs: Vec<String> = serde_json::from_str(&suburbs_raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(err)))?;

    Ok(Lead {
        id: LeadId(row.get(0)?),
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        buyer_type: parse_labeled(4, row.get(4)?, BuyerType::parse)?,
        budget_range: parse_labeled(5, row.get(5)?, BudgetRange::parse)?,
        preferred_suburbs,
        timeline: parse_labeled(7, row.get(7)?, Timeline::parse)?,
        pre_approved: parse_labeled(8, row.get(8)?, PreApproval::parse)?,
        consent_given: row.get(9)?,
        consent_timestamp: parse_timestamp(10, row.get(10)?)?,
        consent_text_version: row.get(11)?,
        consent_purpose: row.get(12)?,
        source_url: row.get(13)?,
        user_agent: row.get(14)?,
        ip_address: row.get(15)?,
        created_at: parse_timestamp(16, row.get(16)?)?,
        status: parse_labeled(17, row.get(17)?, LeadStatus::parse)?,
        assigned_agent_id: row.get(18)?,
    })
}

fn parse_labeled<T>(
    index: usize,
    raw: String,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("unrecognised stored value '{raw}'").into(),
        )
    })
}

fn parse_timestamp(index: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

fn storage_error(err: rusqlite::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

fn insert_error(err: rusqlite::Error) -> RepositoryError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            RepositoryError::Conflict
        }
        _ => storage_error(err),
    }
}
