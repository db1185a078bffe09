//! Persistence of accepted submissions as rows of an external table.
//!
//! A [`SubmissionStore`] receives finished [`SubmissionRecord`]s. The tabular store
//! flattens each record through a [`SheetLayout`] and hands rows to a
//! [`SheetGateway`] (Google Sheets, a CSV file, or memory). The header row is
//! written the first time a sheet is found empty.

mod csv_file;
mod memory;
mod sheets;

pub use csv_file::CsvSheetGateway;
pub use memory::MemorySheetGateway;
pub use sheets::{connect_service_account, GoogleSheetsClient};

use std::fmt::Debug;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::warn;

use super::domain::{Category, IdentityField, ValidationPolicy};
use super::record::SubmissionRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HIGHEST_SEPARATOR: &str = ", ";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store temporarily unavailable: {0}")]
    Transient(String),
    #[error("store rejected credentials: {0}")]
    Unauthorized(String),
    #[error("store backend failure: {0}")]
    Backend(String),
    #[error("sheet header mismatch (expected {expected:?}, found {found:?})")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("unable to encode responses: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv store failure: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_) | StoreError::Io(_))
    }
}

/// Sink for accepted submissions.
pub trait SubmissionStore: Send + Sync {
    fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError>;
}

/// Row-oriented access to one worksheet or file.
pub trait SheetGateway: Debug + Send + Sync {
    /// First row of the sheet, or `None` when the sheet is empty.
    fn header(&self) -> Result<Option<Vec<String>>, StoreError>;
    fn append_row(&self, row: &[String]) -> Result<(), StoreError>;
}

/// Column order of persisted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    contact: IdentityField,
}

impl SheetLayout {
    pub fn for_policy(policy: ValidationPolicy) -> Self {
        Self {
            contact: policy.contact_field(),
        }
    }

    pub fn header(&self) -> Vec<String> {
        let mut columns = vec![
            "Timestamp".to_string(),
            IdentityField::Name.label().to_string(),
            self.contact.label().to_string(),
        ];
        columns.extend(Category::ALL.iter().map(|category| category.code().to_string()));
        columns.push("Highest".to_string());
        columns.push("Responses".to_string());
        columns
    }

    pub fn row(&self, record: &SubmissionRecord) -> Result<Vec<String>, StoreError> {
        let respondent = record.respondent();
        let mut row = vec![
            record.timestamp().format(TIMESTAMP_FORMAT).to_string(),
            respondent.name.trim().to_string(),
            respondent
                .field(self.contact)
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        ];
        row.extend(record.totals().iter().map(|(_, total)| total.to_string()));
        row.push(
            record
                .highest()
                .iter()
                .map(|category| category.code())
                .collect::<Vec<_>>()
                .join(HIGHEST_SEPARATOR),
        );
        row.push(serde_json::to_string(record.responses())?);
        Ok(row)
    }
}

/// Writes records through a gateway, retrying transient failures.
///
/// Appends through one store are serialized, so the header is written at most once
/// per store. Separate processes sharing a sheet are not coordinated. A retried
/// append whose first request reached the backend before failing can leave a
/// duplicate row.
#[derive(Debug)]
pub struct TabularSubmissionStore<G> {
    gateway: G,
    max_attempts: u32,
    backoff: Duration,
    write_lock: Mutex<()>,
}

impl<G: SheetGateway> TabularSubmissionStore<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_retry(gateway, 3, Duration::from_millis(250))
    }

    pub fn with_retry(gateway: G, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            gateway,
            max_attempts: max_attempts.max(1),
            backoff,
            write_lock: Mutex::new(()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn ensure_header(&self, layout: &SheetLayout) -> Result<(), StoreError> {
        let expected = layout.header();
        match self.gateway.header()? {
            None => self.gateway.append_row(&expected),
            Some(found) if found == expected => Ok(()),
            Some(found) => Err(StoreError::HeaderMismatch { expected, found }),
        }
    }

    fn retrying<T>(
        &self,
        mut operation: impl FnMut() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut attempt = 1;
        loop {
            match operation() {
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "retrying sheet operation"
                    );
                    thread::sleep(self.backoff * attempt);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl<G: SheetGateway> SubmissionStore for TabularSubmissionStore<G> {
    fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let layout = SheetLayout::for_policy(record.policy());
        let row = layout.row(record)?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("sheet write lock poisoned".to_string()))?;
        self.retrying(|| self.ensure_header(&layout))?;
        self.retrying(|| self.gateway.append_row(&row))
    }
}

impl<S: SubmissionStore + ?Sized> SubmissionStore for Box<S> {
    fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        (**self).append(record)
    }
}
