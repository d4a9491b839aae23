use crate::cli::ServeArgs;
use crate::infra::{build_service, load_profiles, AppState, DEMO_POPULATION};
use crate::routes::with_pricing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use smart_pricing::config::AppConfig;
use smart_pricing::error::AppError;
use smart_pricing::telemetry;
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

    let profiles = load_profiles(args.profiles.as_deref(), DEMO_POPULATION, None)?;
    let service = Arc::new(build_service(&config, profiles));
    info!(
        profiles = service.profile_count(),
        narrative = service.narrator().is_enabled(),
        base_price = service.base_price(),
        "pricing service initialised"
    );

    let app = with_pricing_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "smart pricing engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
