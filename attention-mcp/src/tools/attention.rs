//! Attention MCP tools
//!
//! Tools for searching, retrieving and listing recorded conversations. Each
//! tool fills argument defaults, performs one Attention API call and renders
//! the result as text. Failures are rendered as one-line diagnostics in an
//! error result; they never surface as protocol errors.

use crate::clients::attention::{AttentionClient, AttentionError, SearchQuery, DEFAULT_DAYS_BACK};
use crate::clients::models::{Conversation, ConversationPage};
use crate::format::{format_conversation, format_diagnostic, format_page};
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Decode tool arguments, treating missing arguments as an empty object.
fn parse_args<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, AttentionError> {
    let args = if args.is_null() {
        serde_json::json!({})
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| AttentionError::Validation(e.to_string()))
}

/// Turn an operation outcome into a tool result.
fn respond<T>(
    tool: &str,
    outcome: Result<T, AttentionError>,
    render: impl FnOnce(&T) -> String,
) -> ToolResult {
    match outcome {
        Ok(value) => ToolResult::text(render(&value)),
        Err(e) => {
            match &e {
                AttentionError::Validation(_) | AttentionError::NotFound(_) => {
                    warn!("{} failed: {}", tool, e)
                }
                _ => error!("{} failed: {}", tool, e),
            }
            ToolResult::error(format_diagnostic(&e))
        }
    }
}

/// Tool to search conversations.
///
/// Filters by title, date range, participant and owner. Returns a digest of
/// matching conversations rather than full transcripts.
pub struct SearchConversationsTool {
    client: Arc<AttentionClient>,
}

impl SearchConversationsTool {
    /// Create the tool around a shared client.
    pub fn new(client: Arc<AttentionClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct SearchConversationsParams {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    from_date: Option<String>,
    #[serde(default)]
    to_date: Option<String>,
    #[serde(default)]
    participant_email: Option<String>,
    #[serde(default)]
    owner_email: Option<String>,
    #[serde(default)]
    size: Option<i64>,
    #[serde(default)]
    page: Option<i64>,
}

impl From<SearchConversationsParams> for SearchQuery {
    fn from(params: SearchConversationsParams) -> Self {
        SearchQuery {
            query: params.query,
            from_date: params.from_date,
            to_date: params.to_date,
            participant_email: params.participant_email,
            owner_email: params.owner_email,
            size: params.size,
            page: params.page,
        }
    }
}

#[async_trait]
impl Tool for SearchConversationsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "search_conversations",
            "Search Attention for call recordings and transcripts. Use for sales calls, customer calls, and demos.",
        )
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search term for conversation title (case-insensitive partial match)"
                },
                "from_date": {
                    "type": "string",
                    "description": "Start date in YYYY-MM-DD format"
                },
                "to_date": {
                    "type": "string",
                    "description": "End date in YYYY-MM-DD format"
                },
                "participant_email": {
                    "type": "string",
                    "description": "Filter by participant email address"
                },
                "owner_email": {
                    "type": "string",
                    "description": "Filter by call owner email address"
                },
                "size": {
                    "type": "integer",
                    "description": "Maximum number of results (default: 20, max: 100)",
                    "default": 20
                },
                "page": {
                    "type": "integer",
                    "description": "Page number, starting from 1"
                }
            }
        }))
    }

    #[instrument(skip(self, args, context), fields(tool = "search_conversations", correlation_id = ?context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let outcome: Result<ConversationPage, AttentionError> = async {
            let params: SearchConversationsParams = parse_args(args)?;
            debug!("Searching conversations: {:?}", params);
            self.client.search(&SearchQuery::from(params)).await
        }
        .await;

        Ok(respond("search_conversations", outcome, format_page))
    }
}

/// Tool to fetch one conversation with its transcript.
pub struct GetConversationTool {
    client: Arc<AttentionClient>,
}

impl GetConversationTool {
    /// Create the tool around a shared client.
    pub fn new(client: Arc<AttentionClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct GetConversationParams {
    conversation_id: String,
    #[serde(default = "default_true")]
    detailed_transcript: bool,
}

fn default_true() -> bool {
    true
}

#[async_trait]
impl Tool for GetConversationTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_conversation",
            "Get full details and transcript for a specific Attention conversation by ID.",
        )
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "conversation_id": {
                    "type": "string",
                    "description": "The conversation UUID"
                },
                "detailed_transcript": {
                    "type": "boolean",
                    "description": "Include detailed transcript with speaker labels (default: true)",
                    "default": true
                }
            },
            "required": ["conversation_id"]
        }))
    }

    #[instrument(skip(self, args, context), fields(tool = "get_conversation", correlation_id = ?context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let outcome: Result<Conversation, AttentionError> = async {
            let params: GetConversationParams = parse_args(args)?;
            debug!("Getting conversation: {}", params.conversation_id);
            self.client
                .get_conversation(&params.conversation_id, params.detailed_transcript)
                .await
        }
        .await;

        Ok(respond("get_conversation", outcome, format_conversation))
    }
}

/// Tool to list conversations from the past few days.
pub struct ListRecentConversationsTool {
    client: Arc<AttentionClient>,
}

impl ListRecentConversationsTool {
    /// Create the tool around a shared client.
    pub fn new(client: Arc<AttentionClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListRecentParams {
    #[serde(default = "default_days_back")]
    days_back: i64,
    #[serde(default)]
    size: Option<i64>,
}

fn default_days_back() -> i64 {
    DEFAULT_DAYS_BACK
}

#[async_trait]
impl Tool for ListRecentConversationsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "list_recent_conversations",
            "List recent Attention conversations from the past N days.",
        )
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "days_back": {
                    "type": "integer",
                    "description": "Number of days to look back (default: 7)",
                    "default": 7,
                    "minimum": 0
                },
                "size": {
                    "type": "integer",
                    "description": "Maximum number of results (default: 20, max: 100)",
                    "default": 20
                }
            }
        }))
    }

    #[instrument(skip(self, args, context), fields(tool = "list_recent_conversations", correlation_id = ?context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let outcome: Result<ConversationPage, AttentionError> = async {
            let params: ListRecentParams = parse_args(args)?;
            debug!("Listing conversations from the past {} days", params.days_back);
            self.client.list_recent(params.days_back, params.size).await
        }
        .await;

        Ok(respond("list_recent_conversations", outcome, format_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::config::AttentionConfig;

    fn client() -> Arc<AttentionClient> {
        // Port 9 (discard) is never contacted by these tests.
        let config = AttentionConfig::with_api_key("test-key").with_base_url("http://127.0.0.1:9");
        Arc::new(AttentionClient::new(config).unwrap())
    }

    #[test]
    fn test_parse_args_defaults() {
        let params: GetConversationParams =
            parse_args(serde_json::json!({"conversation_id": "abc"})).unwrap();
        assert!(params.detailed_transcript);

        let params: ListRecentParams = parse_args(serde_json::Value::Null).unwrap();
        assert_eq!(params.days_back, 7);
        assert_eq!(params.size, None);
    }

    #[test]
    fn test_parse_args_type_errors_are_validation() {
        let err = parse_args::<ListRecentParams>(serde_json::json!({"days_back": "seven"}))
            .unwrap_err();
        assert_eq!(err.kind(), "ValidationError");

        let err = parse_args::<GetConversationParams>(serde_json::json!({})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn test_tool_definitions() {
        let client = client();
        let search = SearchConversationsTool::new(client.clone()).definition();
        assert_eq!(search.name, "search_conversations");
        assert!(search.input_schema["properties"]["owner_email"].is_object());

        let get = GetConversationTool::new(client.clone()).definition();
        assert_eq!(get.input_schema["required"][0], "conversation_id");

        let recent = ListRecentConversationsTool::new(client).definition();
        assert_eq!(recent.input_schema["properties"]["days_back"]["default"], 7);
    }

    #[tokio::test]
    async fn test_validation_failures_render_diagnostics() {
        let tool = GetConversationTool::new(client());
        let result = tool
            .execute(
                serde_json::json!({"conversation_id": "  "}),
                &ToolContext::empty(),
            )
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.text_content(),
            "Error: ValidationError: invalid argument: conversation_id must not be empty"
        );

        let tool = ListRecentConversationsTool::new(client());
        let result = tool
            .execute(serde_json::json!({"days_back": -3}), &ToolContext::empty())
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.text_content().starts_with("Error: ValidationError:"));
    }
}
