//! Attention MCP Server Binary
//!
//! ## Usage
//!
//! ```bash
//! # Run as MCP server (stdio)
//! ATTENTION_API_KEY=... attention-mcp
//!
//! # Against a different endpoint, with debug logging
//! ATTENTION_API_URL=http://localhost:8080 RUST_LOG=attention_mcp=debug attention-mcp
//! ```

use std::sync::Arc;

use attention_mcp::{attention_tools, AttentionClient, AttentionConfig, McpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries protocol messages
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attention_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Attention MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = AttentionConfig::from_env();
    let client = match AttentionClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Cannot start: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Using Attention API at {}", client.config().base_url);

    let server = McpServer::attention();
    server.register_tools(attention_tools(Arc::new(client))).await;

    tracing::info!("MCP server ready, listening on stdio");
    server.run_stdio().await?;

    Ok(())
}
