//! Attention service client.
//!
//! HTTP client for the Attention conversation intelligence API. Provides
//! conversation search, retrieval by ID and listing of recent conversations.
//! Every operation issues exactly one authenticated GET request; there are no
//! retries and nothing is cached.

use super::config::{AttentionConfig, ConfigError, Credential};
use super::models::{Conversation, ConversationPage};
use chrono::{DateTime, Days, NaiveDate, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Page size used when the caller gives none or a non-positive one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size forwarded to the remote.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default look-back window for recent conversations.
pub const DEFAULT_DAYS_BACK: i64 = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Attention client errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttentionError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied argument failed a precondition.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Transport-level failure (DNS, connection, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// API returned a non-success status other than not-found.
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from the API.
        message: String,
    },

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body was not in the expected shape.
    #[error("invalid API response: {0}")]
    Parse(String),
}

impl AttentionError {
    /// Name of the failure kind, as shown in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttentionError::Configuration(_) => "ConfigurationError",
            AttentionError::Validation(_) => "ValidationError",
            AttentionError::Network(_) => "NetworkError",
            AttentionError::Api { .. } => "APIError",
            AttentionError::NotFound(_) => "NotFoundError",
            AttentionError::Parse(_) => "ParseError",
        }
    }
}

impl From<ConfigError> for AttentionError {
    fn from(err: ConfigError) -> Self {
        AttentionError::Configuration(err.to_string())
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Conversation search filters.
///
/// Every field is optional; absent and blank fields are left out of the
/// request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive partial match on the title.
    #[serde(default)]
    pub query: Option<String>,

    /// Start date (YYYY-MM-DD).
    #[serde(default)]
    pub from_date: Option<String>,

    /// End date (YYYY-MM-DD).
    #[serde(default)]
    pub to_date: Option<String>,

    /// Participant email filter.
    #[serde(default)]
    pub participant_email: Option<String>,

    /// Call owner email filter.
    #[serde(default)]
    pub owner_email: Option<String>,

    /// Page size; see [`normalize_page_size`].
    #[serde(default)]
    pub size: Option<i64>,

    /// 1-based page number.
    #[serde(default)]
    pub page: Option<i64>,
}

impl SearchQuery {
    /// Empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title search term.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the start date.
    pub fn with_from_date(mut self, from_date: impl Into<String>) -> Self {
        self.from_date = Some(from_date.into());
        self
    }

    /// Set the end date.
    pub fn with_to_date(mut self, to_date: impl Into<String>) -> Self {
        self.to_date = Some(to_date.into());
        self
    }

    /// Filter by participant email.
    pub fn with_participant_email(mut self, email: impl Into<String>) -> Self {
        self.participant_email = Some(email.into());
        self
    }

    /// Filter by owner email.
    pub fn with_owner_email(mut self, email: impl Into<String>) -> Self {
        self.owner_email = Some(email.into());
        self
    }

    /// Set the page size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the page number.
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Validate the filters and build the outgoing query parameters.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, AttentionError> {
        let from_date = parse_date("from_date", self.from_date.as_deref())?;
        let to_date = parse_date("to_date", self.to_date.as_deref())?;
        if let (Some(from), Some(to)) = (from_date, to_date) {
            if from > to {
                return Err(AttentionError::Validation(format!(
                    "from_date {} is after to_date {}",
                    from, to
                )));
            }
        }

        let mut params = Vec::new();
        if let Some(query) = present(self.query.as_deref()) {
            params.push(("q", query.to_string()));
        }
        if let Some(from) = from_date {
            params.push(("from_date", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = to_date {
            params.push(("to_date", to.format(DATE_FORMAT).to_string()));
        }
        if let Some(email) = present(self.participant_email.as_deref()) {
            params.push(("participant_email", email.to_string()));
        }
        if let Some(email) = present(self.owner_email.as_deref()) {
            params.push(("owner_email", email.to_string()));
        }
        params.push(("size", normalize_page_size(self.size).to_string()));
        if let Some(page) = self.page.filter(|p| *p > 0) {
            params.push(("page", page.to_string()));
        }

        Ok(params)
    }
}

/// Absent or non-positive sizes become [`DEFAULT_PAGE_SIZE`]; sizes above
/// [`MAX_PAGE_SIZE`] are clamped.
pub fn normalize_page_size(size: Option<i64>) -> u32 {
    match size {
        Some(size) if size > 0 => size.min(MAX_PAGE_SIZE as i64) as u32,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Attention API client.
///
/// Cheap to clone; clones share the underlying connection pool, so one
/// handle can serve concurrent callers.
#[derive(Clone)]
pub struct AttentionClient {
    /// HTTP client instance.
    client: Client,

    /// Endpoint configuration.
    config: AttentionConfig,

    /// Validated bearer credential.
    credential: Credential,

    /// Time source for relative date windows.
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for AttentionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttentionClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl AttentionClient {
    /// Create a new Attention client.
    ///
    /// Fails with [`AttentionError::Configuration`] when the API key is
    /// missing or blank, or the endpoint settings are unusable.
    pub fn new(config: AttentionConfig) -> Result<Self, AttentionError> {
        let credential = config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AttentionError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config,
            credential,
            clock: Arc::new(SystemClock),
        })
    }

    /// Create a client from `ATTENTION_*` environment variables.
    pub fn from_env() -> Result<Self, AttentionError> {
        Self::new(AttentionConfig::from_env())
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Endpoint configuration.
    pub fn config(&self) -> &AttentionConfig {
        &self.config
    }

    /// Search conversations.
    ///
    /// Only the filters present on `query` are sent.
    #[instrument(skip(self, query))]
    pub async fn search(&self, query: &SearchQuery) -> Result<ConversationPage, AttentionError> {
        let params = query.to_params()?;
        debug!(params = ?params, "Searching conversations");

        let url = self.endpoint("/conversations")?;
        self.get(url, &params, "conversations").await
    }

    /// Get a conversation by ID.
    ///
    /// With `detailed_transcript` the remote embeds speaker-labeled
    /// transcript segments; without it the returned conversation never
    /// carries a transcript.
    #[instrument(skip(self), fields(conversation_id = %conversation_id))]
    pub async fn get_conversation(
        &self,
        conversation_id: &str,
        detailed_transcript: bool,
    ) -> Result<Conversation, AttentionError> {
        let conversation_id = conversation_id.trim();
        if conversation_id.is_empty() {
            return Err(AttentionError::Validation(
                "conversation_id must not be empty".to_string(),
            ));
        }

        debug!("Fetching conversation {}", conversation_id);

        let mut url = self.endpoint("/conversations")?;
        url.path_segments_mut()
            .map_err(|_| {
                AttentionError::Configuration(format!(
                    "base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?
            .push(conversation_id);

        let params = [("detailedTranscript", detailed_transcript.to_string())];
        let resource = format!("conversation {}", conversation_id);
        let mut conversation: Conversation = self.get(url, &params, &resource).await?;

        if !detailed_transcript {
            conversation.transcript = None;
        }

        Ok(conversation)
    }

    /// List conversations from the past `days_back` days.
    #[instrument(skip(self))]
    pub async fn list_recent(
        &self,
        days_back: i64,
        size: Option<i64>,
    ) -> Result<ConversationPage, AttentionError> {
        let query = self.recent_query(days_back, size)?;
        self.search(&query).await
    }

    /// Build the search used by [`list_recent`](Self::list_recent).
    pub fn recent_query(
        &self,
        days_back: i64,
        size: Option<i64>,
    ) -> Result<SearchQuery, AttentionError> {
        if days_back < 0 {
            return Err(AttentionError::Validation(format!(
                "days_back must be a non-negative integer, got {}",
                days_back
            )));
        }

        let today = self.clock.now().date_naive();
        let from_date = today
            .checked_sub_days(Days::new(days_back as u64))
            .ok_or_else(|| {
                AttentionError::Validation(format!("days_back {} is out of range", days_back))
            })?;

        let mut query = SearchQuery::new().with_from_date(from_date.format(DATE_FORMAT).to_string());
        query.size = size;
        Ok(query)
    }

    fn endpoint(&self, path: &str) -> Result<Url, AttentionError> {
        Url::parse(&self.config.url(path)).map_err(|e| AttentionError::Configuration(e.to_string()))
    }

    /// Issue one authenticated GET and decode the JSON body.
    async fn get<T>(
        &self,
        url: Url,
        params: &[(&str, String)],
        resource: &str,
    ) -> Result<T, AttentionError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .header("Authorization", format!("Bearer {}", self.credential.expose()))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        self.handle_response(response, resource).await
    }

    /// Map status codes to errors and parse the JSON body.
    async fn handle_response<T>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T, AttentionError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            warn!("Attention API returned 404 for {}", resource);
            return Err(AttentionError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(status, &body);
            warn!("Attention API error ({}): {}", status.as_u16(), message);
            return Err(AttentionError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.network_error(e))?;
        serde_json::from_str(&body).map_err(|e| AttentionError::Parse(e.to_string()))
    }

    fn network_error(&self, err: reqwest::Error) -> AttentionError {
        let message = if err.is_timeout() {
            format!("request timed out after {}s", self.config.timeout_secs)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        warn!("Attention request failed: {}", message);
        AttentionError::Network(message)
    }
}

/// Best-effort human-readable message from an error response body.
fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.pointer("/errors/0/detail"),
            value.pointer("/errors/0/title"),
            value.get("message"),
            value.get("error"),
        ];
        if let Some(message) = candidates
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str())
            .find(|s| !s.trim().is_empty())
        {
            return message.trim().to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    body.chars().take(500).collect()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AttentionError> {
    present(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                AttentionError::Validation(format!(
                    "{} must be a date in YYYY-MM-DD format, got {:?}",
                    field, raw
                ))
            })
        })
        .transpose()
}
