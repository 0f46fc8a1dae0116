use crate::cli::ServeArgs;
use crate::infra::{AppState, ReferenceState};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use suburb_leads::config::AppConfig;
use suburb_leads::error::AppError;
use suburb_leads::leads::{LeadService, SqliteLeadRepository};
use suburb_leads::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(database) = args.database.take() {
        config.database.path = database;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let reference = ReferenceState::load()?;
    let repository = Arc::new(SqliteLeadRepository::open(&config.database.path)?);
    let lead_service = Arc::new(LeadService::new(
        repository,
        reference.suburbs.clone(),
        reference.agents.clone(),
    ));

    let app = with_lead_routes(lead_service, reference)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        database = %config.database.path.display(),
        "suburb lead service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
