use interest_inventory::config::{InventoryConfig, StoreBackend, StoreConfig};
use interest_inventory::error::AppError;
use interest_inventory::inventory::store::connect_service_account;
use interest_inventory::inventory::{
    Catalog, CsvSheetGateway, MemorySheetGateway, SubmissionStore, TabularSubmissionStore,
    ValidationPolicy,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

const STORE_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store chosen at startup from configuration.
pub(crate) type ConfiguredStore = Box<dyn SubmissionStore>;

pub(crate) fn load_catalog(config: &InventoryConfig) -> Result<Catalog, AppError> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::standard()?,
    };
    Ok(catalog)
}

pub(crate) async fn build_store(config: &StoreConfig) -> Result<ConfiguredStore, AppError> {
    let attempts = config.max_attempts;
    let store: ConfiguredStore = match &config.backend {
        StoreBackend::Memory => Box::new(TabularSubmissionStore::with_retry(
            MemorySheetGateway::default(),
            attempts,
            STORE_BACKOFF,
        )),
        StoreBackend::Csv { path } => Box::new(TabularSubmissionStore::with_retry(
            CsvSheetGateway::new(path.clone()),
            attempts,
            STORE_BACKOFF,
        )),
        StoreBackend::GoogleSheets(sheets) => {
            let client = connect_service_account(
                &sheets.credentials_path,
                &sheets.spreadsheet_id,
                &sheets.range,
            )
            .await?;
            Box::new(TabularSubmissionStore::with_retry(
                client,
                attempts,
                STORE_BACKOFF,
            ))
        }
    };
    Ok(store)
}

pub(crate) fn backend_label(backend: &StoreBackend) -> &'static str {
    match backend {
        StoreBackend::Memory => "memory",
        StoreBackend::Csv { .. } => "csv",
        StoreBackend::GoogleSheets(_) => "google_sheets",
    }
}

pub(crate) fn parse_policy(raw: &str) -> Result<ValidationPolicy, String> {
    raw.parse()
}
