use super::normalizer::records_from_payload;
use super::store::ListingDataSource;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Raw records fetched by a source, not yet normalized.
#[derive(Debug, Clone, Default)]
pub struct FetchedRecords {
    pub records: Vec<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("listing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("listing endpoint returned status {0}")]
    Status(u16),
    #[error("listing payload is not an array of records")]
    UnexpectedShape,
    #[error("invalid listing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Collaborator that supplies raw listing records for one load.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self) -> Result<FetchedRecords, SourceError>;

    fn kind(&self) -> ListingDataSource;
}

/// GET-style listing endpoint returning a JSON array (or an object wrapping one).
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
}

impl HttpListingSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            bearer_token: None,
        })
    }

    /// Attaches an opaque bearer token to every request.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|token| !token.trim().is_empty());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self) -> Result<FetchedRecords, SourceError> {
        info!(url = %self.url, "fetching marketplace listings");

        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let records = records_from_payload(payload).ok_or(SourceError::UnexpectedShape)?;
        debug!(count = records.len(), "fetched raw listing records");

        Ok(FetchedRecords { records })
    }

    fn kind(&self) -> ListingDataSource {
        ListingDataSource::Api
    }
}

/// Broker export on disk: `.csv` files are read as CSV, anything else as JSON.
#[derive(Debug, Clone)]
pub struct FileListingSource {
    path: PathBuf,
}

impl FileListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }
}

#[async_trait]
impl ListingSource for FileListingSource {
    async fn fetch(&self) -> Result<FetchedRecords, SourceError> {
        let contents = tokio::fs::read(&self.path).await?;
        let records = if self.is_csv() {
            parse_csv_records(contents.as_slice())?
        } else {
            parse_json_records(&contents)?
        };

        info!(path = %self.path.display(), count = records.len(), "read listing export");
        Ok(FetchedRecords { records })
    }

    fn kind(&self) -> ListingDataSource {
        ListingDataSource::File
    }
}

pub fn parse_json_records(bytes: &[u8]) -> Result<Vec<Value>, SourceError> {
    let payload: Value = serde_json::from_slice(bytes)?;
    records_from_payload(payload).ok_or(SourceError::UnexpectedShape)
}

/// Each CSV row becomes an object keyed by header; blank cells are omitted.
pub fn parse_csv_records<R: Read>(reader: R) -> Result<Vec<Value>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let fields: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(Value::Object(fields));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::normalizer::normalize_batch;
    use std::io::Cursor;

    #[test]
    fn csv_rows_map_headers_to_fields() {
        let csv = "id,location,askingPrice,roi,verified,type\n\
wash-1,Tampa FL,\"$350,000\",18.5,true,Coin-Operated\n\
wash-2,Austin TX,,,no,\n";
        let records = parse_csv_records(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records.len(), 2);

        let batch = normalize_batch(records);
        let first = &batch.listings[0];
        assert_eq!(first.asking_price, Some(350_000.0));
        assert_eq!(first.roi, Some(18.5));
        assert!(first.verified);
        assert_eq!(first.business_type, "coin-operated");

        let second = &batch.listings[1];
        assert_eq!(second.asking_price, None);
        assert_eq!(second.business_type, "unknown");
        assert!(!second.verified);
    }

    #[test]
    fn json_records_accept_wrapped_payloads() {
        let records =
            parse_json_records(br#"{"listings":[{"id":"a"},{"id":"b"}]}"#).expect("parses");
        assert_eq!(records.len(), 2);

        match parse_json_records(br#"{"message":"nothing here"}"#) {
            Err(SourceError::UnexpectedShape) => {}
            other => panic!("expected shape error, got {other:?}"),
        }

        match parse_json_records(b"not json") {
            Err(SourceError::Json(_)) => {}
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_source_propagates_io_errors() {
        let source = FileListingSource::new("./does-not-exist.json");
        match source.fetch().await {
            Err(SourceError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
        assert_eq!(source.kind(), ListingDataSource::File);
    }

    #[test]
    fn blank_bearer_tokens_are_dropped() {
        let source = HttpListingSource::new("http://127.0.0.1:9/listings", Duration::from_secs(1))
            .expect("client builds")
            .with_bearer_token(Some("   ".to_string()));
        assert!(source.bearer_token.is_none());
        assert_eq!(source.url(), "http://127.0.0.1:9/listings");
    }
}
