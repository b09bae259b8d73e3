//! Attention MCP tools
//!
//! This module exposes the Attention client operations as MCP tools.

pub mod attention;

pub use attention::*;

use crate::clients::AttentionClient;
use crate::server::Tool;
use std::sync::Arc;

/// Get all Attention tools backed by the given client.
///
/// # Example
///
/// ```rust,no_run
/// use attention_mcp::clients::{AttentionClient, AttentionConfig};
/// use attention_mcp::tools::attention_tools;
/// use std::sync::Arc;
///
/// let client = AttentionClient::new(AttentionConfig::from_env()).unwrap();
/// let tools = attention_tools(Arc::new(client));
/// println!("Available tools: {}", tools.len());
/// ```
pub fn attention_tools(client: Arc<AttentionClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(SearchConversationsTool::new(client.clone())),
        Arc::new(GetConversationTool::new(client.clone())),
        Arc::new(ListRecentConversationsTool::new(client)),
    ]
}
