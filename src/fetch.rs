//! Transaction fetch from the node GraphQL endpoint
//!
//! The scoring core only needs "given start/end instants, return the matching
//! transaction records", expressed as the `TransactionSource` trait so tests
//! can substitute an in-memory source. The real source posts one GraphQL
//! query for the whole window; a failed fetch (after retries) is fatal for
//! the run and no partial leaderboard is produced.

use crate::types::TransactionRecord;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

/// Errors from the fetch boundary
#[derive(Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS)
    Transport(reqwest::Error),
    /// Non-success HTTP status from the node
    Status(reqwest::StatusCode),
    /// Response body did not match the expected envelope
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(err) => write!(f, "transport error: {}", err),
            FetchError::Status(status) => write!(f, "node returned HTTP {}", status),
            FetchError::Malformed(detail) => write!(f, "malformed response: {}", detail),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err)
    }
}

/// Source of transaction records for a time range
#[async_trait]
pub trait TransactionSource {
    async fn fetch_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, FetchError>;
}

/// GraphQL client for the node's `allTransactions` query
pub struct GraphqlSource {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlSource {
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl TransactionSource for GraphqlSource {
    async fn fetch_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        let query = window_query(start, end);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let envelope: GraphqlResponse = response
            .json()
            .await
            .map_err(|err| FetchError::Malformed(err.to_string()))?;

        envelope.into_records()
    }
}

/// Build the month query. Ordered by `created` ascending so "first
/// occurrence" in the dedup guard means chronologically first.
fn window_query(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        r#"query MonthlyTransactions {{
  allTransactions(
    filter: {{
      created: {{ greaterThanOrEqualTo: "{}", lessThan: "{}" }}
    }}
    orderBy: CREATED_ASC
  ) {{
    edges {{
      node {{
        contract
        function
        sender
        success
        created
        jsonContent
      }}
    }}
  }}
}}"#,
        start.to_rfc3339_opts(SecondsFormat::Secs, true),
        end.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "allTransactions")]
    all_transactions: TransactionConnection,
}

#[derive(Debug, Deserialize)]
struct TransactionConnection {
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: TransactionRecord,
}

impl GraphqlResponse {
    fn into_records(self) -> Result<Vec<TransactionRecord>, FetchError> {
        if let Some(error) = self.errors.first() {
            return Err(FetchError::Malformed(error.message.clone()));
        }

        match self.data {
            Some(data) => Ok(data
                .all_transactions
                .edges
                .into_iter()
                .map(|edge| edge.node)
                .collect()),
            None => Err(FetchError::Malformed("response has no data".to_string())),
        }
    }
}

/// Exponential backoff for fetch retries
#[derive(Debug)]
pub struct ExponentialBackoff {
    initial_delay: u64,
    max_delay: u64,
    max_retries: u32,
    current_attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(initial: u64, max: u64, retries: u32) -> Self {
        Self {
            initial_delay: initial,
            max_delay: max,
            max_retries: retries,
            current_attempt: 0,
        }
    }

    pub async fn sleep(&mut self) -> Result<(), MaxRetriesExceeded> {
        if self.current_attempt >= self.max_retries {
            return Err(MaxRetriesExceeded);
        }

        let delay = std::cmp::min(
            self.initial_delay * 2_u64.pow(self.current_attempt),
            self.max_delay,
        );

        log::warn!(
            "⏳ Retry attempt {} of {} in {}s",
            self.current_attempt + 1,
            self.max_retries,
            delay
        );

        sleep(Duration::from_secs(delay)).await;
        self.current_attempt += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct MaxRetriesExceeded;

impl fmt::Display for MaxRetriesExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Maximum retry attempts exceeded")
    }
}

impl std::error::Error for MaxRetriesExceeded {}

/// Fetch the window, retrying transient failures with exponential backoff.
/// Returns the last fetch error once retries are exhausted.
pub async fn fetch_with_retry<S: TransactionSource>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TransactionRecord>, FetchError> {
    let mut backoff = ExponentialBackoff::new(1, 30, 4);

    loop {
        match source.fetch_window(start, end).await {
            Ok(records) => return Ok(records),
            Err(err) => {
                log::warn!("Fetch failed: {}", err);
                if backoff.sleep().await.is_err() {
                    return Err(err);
                }
            }
        }
    }
}
