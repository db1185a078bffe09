use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::catalog::CatalogDocument;
use super::domain::{Category, Submission, ValidationPolicy};
use super::presenter::ResultEntry;
use super::scoring::{CategoryTotals, RankedCategory};
use super::service::{AcceptedSubmission, InventoryService, PersistenceStatus, SubmissionOutcome};
use super::store::SubmissionStore;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub policy: ValidationPolicy,
    #[serde(flatten)]
    pub catalog: CatalogDocument,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub submitted_at: DateTime<Utc>,
    pub policy: ValidationPolicy,
    pub totals: CategoryTotals,
    pub ranking: Vec<RankedCategory>,
    pub highest: Vec<Category>,
    pub results: Vec<ResultEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Router exposing the catalog and the submission endpoint.
pub fn inventory_router<S>(service: Arc<InventoryService<S>>) -> Router
where
    S: SubmissionStore + 'static,
{
    Router::new()
        .route("/api/v1/inventory/catalog", get(catalog_handler::<S>))
        .route("/api/v1/inventory/submissions", post(submit_handler::<S>))
        .with_state(service)
}

pub(crate) async fn catalog_handler<S>(
    State(service): State<Arc<InventoryService<S>>>,
) -> Json<CatalogResponse>
where
    S: SubmissionStore + 'static,
{
    Json(CatalogResponse {
        policy: service.policy(),
        catalog: service.catalog().document(),
    })
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<InventoryService<S>>>,
    Json(submission): Json<Submission>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    // the store may block on network I/O
    let worker = Arc::clone(&service);
    let outcome = match tokio::task::spawn_blocking(move || worker.submit(&submission)).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(error = %err, "submission task failed");
            let payload = json!({ "error": "submission could not be processed" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    match outcome {
        SubmissionOutcome::Rejected(failures) => {
            let messages: Vec<String> = failures.iter().map(|failure| failure.summary()).collect();
            let payload = json!({
                "error": "submission failed validation",
                "messages": messages,
                "failures": failures,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        SubmissionOutcome::Accepted(accepted) => {
            let AcceptedSubmission {
                record,
                evaluation,
                persistence,
            } = *accepted;
            let warnings = match persistence {
                PersistenceStatus::Saved => Vec::new(),
                PersistenceStatus::Failed { warning } => vec![warning],
            };
            let body = SubmissionResponse {
                submitted_at: record.timestamp(),
                policy: record.policy(),
                totals: evaluation.totals,
                ranking: evaluation.ranking.entries().to_vec(),
                highest: evaluation.highest,
                results: evaluation.view.entries,
                warnings,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
    }
}
