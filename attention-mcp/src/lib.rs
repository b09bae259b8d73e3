//! # Attention MCP
//!
//! This crate exposes the [Attention](https://attention.tech) conversation
//! intelligence API to AI assistants as MCP (Model Context Protocol) tools.
//!
//! ## Overview
//!
//! The attention-mcp crate handles:
//! - **Client**: authenticated HTTP access to the Attention REST API
//! - **Formatting**: rendering conversations and search results as text
//! - **Tools**: MCP tool definitions and execution
//! - **JSON-RPC**: a minimal MCP server over stdio
//!
//! ## Available Tools
//!
//! - `search_conversations`: Search calls by title, date range, participant or owner
//! - `get_conversation`: Fetch one conversation with insights and transcript
//! - `list_recent_conversations`: List calls from the past N days
//!
//! Tool failures never become protocol errors. Each call returns either the
//! rendered text or a one-line diagnostic such as
//! `Error: NotFoundError: not found: conversation 123`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use attention_mcp::{attention_tools, AttentionClient, AttentionConfig, McpServer};
//! use std::sync::Arc;
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AttentionClient::new(AttentionConfig::from_env())?;
//!
//!     let server = McpServer::attention();
//!     server.register_tools(attention_tools(Arc::new(client))).await;
//!     server.run_stdio().await?;
//!     Ok(())
//! }
//! ```
//!
//! ### Calling the client directly
//!
//! ```rust,no_run
//! use attention_mcp::{AttentionClient, AttentionConfig, SearchQuery};
//!
//! async fn search(client: &AttentionClient) {
//!     let query = SearchQuery::new().with_query("Acme").with_from_date("2025-01-01");
//!     match client.search(&query).await {
//!         Ok(page) => println!("{}", attention_mcp::format::format_page(&page)),
//!         Err(e) => eprintln!("{}", attention_mcp::format::format_diagnostic(&e)),
//!     }
//! }
//! ```

pub mod clients;
pub mod format;
pub mod server;
pub mod tools;
pub mod types;

// Re-export main types
pub use server::{McpServer, McpServerError, McpServerResult, Tool, ToolContext};
pub use types::{
    ContentBlock, McpError, McpRequest, McpResponse, RequestId, ServerCapabilities, ServerInfo,
    ToolCall, ToolCapabilities, ToolDefinition, ToolResult,
};

// Re-export tool collection
pub use tools::attention_tools;

// Re-export the service client
pub use clients::{
    AttentionClient, AttentionConfig, AttentionError, Conversation, ConversationPage,
    SearchQuery,
};
