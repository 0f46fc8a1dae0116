use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use suburb_leads::reference::{AgentDirectory, GeneralistPolicy, SuburbDirectory};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Immutable reference data shared with the read-only suburb/agent endpoints.
#[derive(Clone)]
pub(crate) struct ReferenceState {
    pub(crate) suburbs: Arc<SuburbDirectory>,
    pub(crate) agents: Arc<AgentDirectory>,
    pub(crate) policy: Arc<GeneralistPolicy>,
}

impl ReferenceState {
    pub(crate) fn load() -> Result<Self, suburb_leads::reference::DatasetError> {
        Ok(Self {
            suburbs: Arc::new(SuburbDirectory::load_embedded()?),
            agents: Arc::new(AgentDirectory::load_embedded()?),
            policy: Arc::new(GeneralistPolicy::default()),
        })
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

pub(crate) fn day_end(date: NaiveDate) -> DateTime<Utc> {
    let next_midnight = date.and_time(NaiveTime::MIN) + Duration::days(1);
    Utc.from_utc_datetime(&(next_midnight - Duration::nanoseconds(1)))
}
