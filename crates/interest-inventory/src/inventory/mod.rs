//! Interest inventory scoring: catalog, validation, aggregation, records, and persistence.
//!
//! A form collaborator hands a complete [`Submission`] to the
//! [`InventoryService`], which validates it under the configured
//! [`ValidationPolicy`], aggregates category totals, builds an immutable
//! [`SubmissionRecord`], and appends it to a [`SubmissionStore`]. Store failures
//! never discard the computed results.

pub mod catalog;
pub mod domain;
pub mod presenter;
pub mod record;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;

pub use catalog::{Catalog, CatalogDocument, CatalogError, RATING_MAX, RATING_MIN};
pub use domain::{
    Category, IdentityField, Item, Respondent, ResponseKey, ResponseSet, Submission,
    ValidationPolicy,
};
pub use presenter::{ResultEntry, ResultView};
pub use record::{Clock, FixedClock, SubmissionRecord, SystemClock};
pub use router::inventory_router;
pub use scoring::{aggregate, CategoryTotals, RankedCategory, Ranking, TieGroup};
pub use service::{
    AcceptedSubmission, Evaluation, Evaluator, InventoryService, PersistenceStatus,
    SubmissionOutcome,
};
pub use store::{
    CsvSheetGateway, GoogleSheetsClient, MemorySheetGateway, SheetGateway, SheetLayout,
    StoreError, SubmissionStore, TabularSubmissionStore,
};
pub use validation::{
    validate, FailureKind, ValidatedResponses, ValidatedSubmission, ValidationFailure,
    ValidationResult, Validator,
};
