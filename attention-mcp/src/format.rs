//! Text rendering for tool results.
//!
//! Turns API results into the Markdown-flavoured text blocks returned to the
//! assistant, and failures into one-line diagnostics. Output shapes are fixed;
//! downstream consumers match on them.

use crate::clients::attention::AttentionError;
use crate::clients::models::{
    Conversation, ConversationPage, ConversationSummary, Participant, Transcript,
    TranscriptSegment,
};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Shown when a transcript is present but carries no text.
pub const NO_TRANSCRIPT: &str = "*No transcript available*";

/// Shown for an empty listing.
pub const NO_CONVERSATIONS: &str = "No conversations found.";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
const DIGEST_PARTICIPANTS: usize = 3;

/// Render a timestamp as `YYYY-MM-DD HH:MM`.
///
/// Offset-qualified timestamps are converted to UTC. Unrecognized input is
/// returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc).format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY_FORMAT).to_string();
    }

    raw.to_string()
}

/// Render a page of search or listing results as a digest.
pub fn format_page(page: &ConversationPage) -> String {
    if page.is_empty() {
        return NO_CONVERSATIONS.to_string();
    }

    let total = page
        .meta
        .total_records
        .unwrap_or(page.data.len() as u64);

    let mut lines = vec![format!("Found {} conversations:", total), String::new()];

    for conversation in &page.data {
        lines.extend(summary_lines(conversation));
        lines.push(String::new());
    }

    if let Some(page_count) = page.meta.page_count.filter(|count| *count > 1) {
        lines.push(String::new());
        lines.push(format!(
            "Page {} of {}",
            page.meta.page_number.unwrap_or(1),
            page_count
        ));
    }

    lines.join("\n")
}

fn summary_lines(conversation: &ConversationSummary) -> [String; 4] {
    [
        format!("- **{}**", title_or_default(conversation.title.as_deref())),
        format!("  ID: {}", conversation.id),
        format!(
            "  Date: {}",
            format_timestamp(conversation.created_at.as_deref().unwrap_or_default())
        ),
        format!("  Participants: {}", participant_digest(&conversation.participants)),
    ]
}

fn participant_digest(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return "None listed".to_string();
    }

    let names: Vec<&str> = participants
        .iter()
        .take(DIGEST_PARTICIPANTS)
        .map(Participant::display_name)
        .collect();
    let mut digest = names.join(", ");
    if participants.len() > DIGEST_PARTICIPANTS {
        digest.push_str(&format!(
            " (+{} more)",
            participants.len() - DIGEST_PARTICIPANTS
        ));
    }
    digest
}

/// Render a single conversation with metadata, insights and transcript.
pub fn format_conversation(conversation: &Conversation) -> String {
    let mut lines = vec![
        format!("# {}", title_or_default(conversation.title.as_deref())),
        String::new(),
        format!("**ID:** {}", conversation.id),
        format!(
            "**Date:** {}",
            format_timestamp(conversation.created_at.as_deref().unwrap_or_default())
        ),
        format!(
            "**Video Status:** {}",
            conversation
                .video_status
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown")
        ),
        String::new(),
        "## Participants".to_string(),
    ];

    if conversation.participants.is_empty() {
        lines.push("- None listed".to_string());
    }
    lines.extend(
        conversation
            .participants
            .iter()
            .map(|p| format!("- {}", format_participant(p))),
    );

    let insights = conversation
        .insights
        .as_ref()
        .map(|insights| insights.entries())
        .unwrap_or_default();
    if !insights.is_empty() {
        lines.push(String::new());
        lines.push("## Extracted Intelligence".to_string());
        for (title, value) in insights {
            lines.push(format!("### {}", title));
            lines.push(value);
            lines.push(String::new());
        }
    }

    if let Some(transcript) = &conversation.transcript {
        lines.push(String::new());
        lines.push("## Transcript".to_string());
        lines.push(String::new());
        lines.push(format_transcript(transcript));
    }

    lines.join("\n")
}

/// `Name (email)`, or whichever of the two is present.
pub fn format_participant(participant: &Participant) -> String {
    match (participant.name(), participant.email()) {
        (Some(name), Some(email)) if name != email => format!("{} ({})", name, email),
        (Some(name), _) => name.to_string(),
        (None, Some(email)) => email.to_string(),
        (None, None) => "Unknown".to_string(),
    }
}

/// Render a transcript as `**Speaker:** utterance` paragraphs.
pub fn format_transcript(transcript: &Transcript) -> String {
    let text = match transcript {
        Transcript::Segments(segments) => format_segments(segments),
        Transcript::Text(text) => text.trim().to_string(),
        Transcript::Structured {
            text: Some(text), ..
        } if !text.trim().is_empty() => text.trim().to_string(),
        Transcript::Structured {
            segments: Some(segments),
            ..
        } => format_segments(segments),
        Transcript::Structured { .. } => String::new(),
    };

    if text.is_empty() {
        NO_TRANSCRIPT.to_string()
    } else {
        text
    }
}

fn format_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .filter_map(|segment| {
            let utterance = segment.utterance();
            (!utterance.is_empty())
                .then(|| format!("**{}:** {}", segment.speaker_name(), utterance))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One-line diagnostic naming the failure kind.
pub fn format_diagnostic(error: &AttentionError) -> String {
    let message = error.to_string();
    let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("Error: {}: {}", error.kind(), message)
}

fn title_or_default(title: Option<&str>) -> &str {
    title
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Untitled")
}
