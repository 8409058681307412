use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryParticipantRepository};
use crate::routes::with_exchange_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gift_exchange::config::AppConfig;
use gift_exchange::error::AppError;
use gift_exchange::telemetry;
use gift_exchange::workflows::exchange::GiftExchangeService;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryParticipantRepository::default());
    let exchange_service = Arc::new(GiftExchangeService::new(repository, config.draw.clone()));

    let app = with_exchange_routes(exchange_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "gift exchange service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
