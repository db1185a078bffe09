use std::path::Path;

use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::hyper_rustls::HttpsConnector;
use google_sheets4::hyper_util::client::legacy::connect::HttpConnector;
use google_sheets4::{hyper_rustls, hyper_util, yup_oauth2, Sheets};
use serde_json::Value;
use tokio::runtime::Handle;

use super::{SheetGateway, StoreError};

/// Thin wrapper around the generated google-sheets4 client so the synchronous
/// store can append rows without exposing async details. Calls block on the
/// given runtime handle and must run off the async executor threads.
pub struct GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    runtime: Handle,
    spreadsheet_id: String,
    range: String,
}

impl<C> GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    pub fn new(
        hub: Sheets<C>,
        runtime: Handle,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            hub,
            runtime,
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }

    fn map_error(err: google_sheets4::Error) -> StoreError {
        match err {
            google_sheets4::Error::HttpError(inner) => StoreError::Transient(inner.to_string()),
            google_sheets4::Error::Io(inner) => StoreError::Transient(inner.to_string()),
            google_sheets4::Error::MissingToken(inner) => {
                StoreError::Unauthorized(inner.to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl<C> std::fmt::Debug for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient").finish_non_exhaustive()
    }
}

impl<C> SheetGateway for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn header(&self) -> Result<Option<Vec<String>>, StoreError> {
        let header_range = format!("{}!1:1", self.range);
        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_get(&self.spreadsheet_id, &header_range)
                .add_scope(Scope::Spreadsheet)
                .doit()
                .await
        });

        let (_, values) = result.map_err(Self::map_error)?;
        let header = values
            .values
            .unwrap_or_default()
            .into_iter()
            .next()
            .filter(|row| !row.is_empty())
            .map(|row| row.into_iter().map(cell_text).collect());
        Ok(header)
    }

    fn append_row(&self, row: &[String]) -> Result<(), StoreError> {
        let request = ValueRange {
            values: Some(vec![row
                .iter()
                .map(|cell| Value::String(cell.clone()))
                .collect()]),
            ..ValueRange::default()
        };

        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_append(request, &self.spreadsheet_id, &self.range)
                .value_input_option("RAW")
                .insert_data_option("INSERT_ROWS")
                .add_scope(Scope::Spreadsheet)
                .doit()
                .await
        });

        result.map(|_| ()).map_err(Self::map_error)
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build a client authenticated with a service-account key file.
pub async fn connect_service_account(
    credentials_path: &Path,
    spreadsheet_id: &str,
    range: &str,
) -> Result<GoogleSheetsClient<HttpsConnector<HttpConnector>>, StoreError> {
    let key = yup_oauth2::read_service_account_key(credentials_path)
        .await
        .map_err(|err| StoreError::Unauthorized(err.to_string()))?;
    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|err| StoreError::Unauthorized(err.to_string()))?;

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();
    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(connector);

    let hub = Sheets::new(client, auth);
    Ok(GoogleSheetsClient::new(
        hub,
        Handle::current(),
        spreadsheet_id,
        range,
    ))
}
