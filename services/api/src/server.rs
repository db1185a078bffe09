use crate::cli::ServeArgs;
use crate::infra::{backend_label, build_store, load_catalog, AppState};
use crate::routes::with_inventory_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use interest_inventory::config::AppConfig;
use interest_inventory::error::AppError;
use interest_inventory::inventory::InventoryService;
use interest_inventory::telemetry;
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

    let catalog = Arc::new(load_catalog(&config.inventory)?);
    let store = Arc::new(build_store(&config.inventory.store).await?);
    let service = Arc::new(InventoryService::new(
        Arc::clone(&catalog),
        config.inventory.policy,
        store,
    ));

    let app = with_inventory_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = config.inventory.policy.label(),
        store = backend_label(&config.inventory.store.backend),
        catalog_version = catalog.version(),
        "interest inventory service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
