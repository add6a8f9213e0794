use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySubmissionInbox};
use crate::routes::with_estimate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use move_estimate::config::AppConfig;
use move_estimate::error::AppError;
use move_estimate::estimate::submission::EstimateService;
use move_estimate::telemetry;
use std::sync::atomic::Ordering;
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

    let (policy, catalog) = config.estimate.build_policy()?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: Arc::new(catalog),
    };

    let inbox = Arc::new(InMemorySubmissionInbox::default());
    let estimate_service = Arc::new(EstimateService::new(inbox, policy));

    let app = with_estimate_routes(estimate_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        pricing_policy = %config.estimate.pricing_policy,
        "moving estimate service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
