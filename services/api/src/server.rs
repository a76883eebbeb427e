use crate::cli::ServeArgs;
use crate::infra::{AppState, StudioServices};
use crate::routes::studio_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ems_studio::config::AppConfig;
use ems_studio::error::AppError;
use ems_studio::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = StudioServices::in_memory(&config.ledger);
    let app = studio_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        summary_window_days = config.ledger.summary_window_days,
        waiting_list_page_size = config.ledger.waiting_list_page_size,
        "ems studio back office ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
