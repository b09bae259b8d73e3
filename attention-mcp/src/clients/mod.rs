//! Service client modules.
//!
//! This module provides the HTTP client for the Attention conversation
//! intelligence API, its configuration and its response model.

pub mod attention;
pub mod config;
pub mod models;

pub use attention::{AttentionClient, AttentionError, Clock, FixedClock, SearchQuery, SystemClock};
pub use config::{AttentionConfig, ConfigError, Credential};
pub use models::{
    Conversation, ConversationPage, ConversationSummary, InsightField, Insights, PageMeta,
    Participant, Speaker, Transcript, TranscriptSegment, Word,
};
