//! Attention API response model.
//!
//! The API speaks a JSON:API-like dialect: resources carry an `id` and an
//! `attributes` object, listings wrap resources in `data` with paging info in
//! `meta`. The public types here flatten that envelope into plain structs;
//! the envelope structs stay private and are only used for deserialization.
//!
//! Every remote field is optional. `None` means the remote did not send the
//! field at all, which the renderer treats differently from a field that is
//! present but empty.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Identifier used when the remote sends neither `uuid` nor `id`.
pub const UNKNOWN_ID: &str = "unknown";

/// A conversation participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Participant {
    /// Create a participant with both fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// Name if non-blank.
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Email if non-blank.
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Name, falling back to email, falling back to "Unknown".
    pub fn display_name(&self) -> &str {
        self.name().or_else(|| self.email()).unwrap_or("Unknown")
    }
}

/// Paging information returned with listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total matching records across all pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,

    /// Number of pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,

    /// Current page (1-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u64>,
}

/// Reduced view of a conversation returned by search and listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: String,

    /// Title.
    pub title: Option<String>,

    /// Creation timestamp as sent by the remote.
    pub created_at: Option<String>,

    /// Participants in the order the remote lists them.
    pub participants: Vec<Participant>,
}

/// One page of conversation summaries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct ConversationPage {
    /// Conversations on this page.
    pub data: Vec<ConversationSummary>,

    /// Paging information.
    pub meta: PageMeta,
}

impl ConversationPage {
    /// Whether the page holds no conversations.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A single recorded conversation.
///
/// Decodes from either a bare resource (`{ "id", "attributes" }`) or one
/// wrapped in `data`. Any other body is rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct Conversation {
    /// Conversation identifier.
    pub id: String,

    /// Title.
    pub title: Option<String>,

    /// Creation timestamp as sent by the remote.
    pub created_at: Option<String>,

    /// Recording status (e.g. "ready", "processing").
    pub video_status: Option<String>,

    /// Participants in the order the remote lists them.
    pub participants: Vec<Participant>,

    /// AI-extracted intelligence, confirmed values preferred.
    pub insights: Option<Insights>,

    /// Speaker-labeled transcript, absent unless requested.
    pub transcript: Option<Transcript>,
}

/// A single intelligence field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InsightField {
    /// Bare text value.
    Text(String),
    /// List of values, rendered as bullets.
    List(Vec<serde_json::Value>),
    /// `{ "title": ..., "value": ... }`
    Detailed {
        /// Human-readable title.
        #[serde(default)]
        title: Option<String>,
        /// Extracted value, either text or a list.
        #[serde(default)]
        value: Option<Box<InsightField>>,
    },
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl InsightField {
    /// Title supplied by the remote, if any.
    pub fn title(&self) -> Option<&str> {
        match self {
            InsightField::Detailed { title, .. } => non_blank(title.as_deref()),
            _ => None,
        }
    }

    /// Non-empty text content of the field.
    pub fn text(&self) -> Option<String> {
        match self {
            InsightField::Detailed { value, .. } => value.as_deref().and_then(InsightField::text),
            InsightField::Text(text) => non_blank(Some(text.as_str())).map(str::to_string),
            InsightField::Other(serde_json::Value::Number(n)) => Some(n.to_string()),
            InsightField::Other(serde_json::Value::Bool(b)) => Some(b.to_string()),
            InsightField::List(items) => {
                let lines: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .filter_map(|item| non_blank(Some(item)))
                    .map(|item| format!("- {}", item))
                    .collect();
                (!lines.is_empty()).then(|| lines.join("\n"))
            }
            InsightField::Other(_) => None,
        }
    }
}

/// AI-extracted intelligence attached to a conversation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Insights {
    /// Overall sentiment.
    #[serde(default)]
    pub sentiment: Option<InsightField>,

    /// Conversation summary.
    #[serde(default)]
    pub summary: Option<InsightField>,

    /// Follow-up action items.
    #[serde(default, rename = "actionItems", alias = "action_items")]
    pub action_items: Option<InsightField>,

    /// Any other named fields, keyed by their remote name.
    #[serde(flatten)]
    pub other: BTreeMap<String, InsightField>,
}

impl Insights {
    /// Present, non-empty fields as `(title, text)` pairs.
    ///
    /// Known fields come first in a fixed order, followed by the remaining
    /// fields sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let known = [
            ("Sentiment", self.sentiment.as_ref()),
            ("Summary", self.summary.as_ref()),
            ("Action Items", self.action_items.as_ref()),
        ];

        let known = known
            .into_iter()
            .filter_map(|(default_title, field)| field.map(|f| (default_title, f)));
        let other = self
            .other
            .iter()
            .map(|(key, field)| (key.as_str(), field));

        known
            .chain(other)
            .filter_map(|(default_title, field)| {
                let text = field.text()?;
                let title = field.title().unwrap_or(default_title).to_string();
                Some((title, text))
            })
            .collect()
    }

    /// Whether no field carries any text.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Speaker attribution on a transcript segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Speaker {
    /// `{ "name": ..., "email": ... }`
    Person(Participant),
    /// Plain label.
    Label(String),
}

/// One word of a word-level transcript segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Word {
    /// Word text including any leading whitespace.
    #[serde(default)]
    pub text: Option<String>,
}

/// One speaker-attributed utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranscriptSegment {
    /// Who spoke.
    #[serde(default)]
    pub speaker: Option<Speaker>,

    /// Word-level content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub words: Vec<Word>,

    /// Whole-segment text, used when no words are given.
    #[serde(default)]
    pub text: Option<String>,
}

impl TranscriptSegment {
    /// Speaker name, falling back to email, falling back to "Unknown".
    pub fn speaker_name(&self) -> &str {
        match &self.speaker {
            Some(Speaker::Person(person)) => person.display_name(),
            Some(Speaker::Label(label)) => non_blank(Some(label.as_str())).unwrap_or("Unknown"),
            None => "Unknown",
        }
    }

    /// The spoken text, trimmed.
    pub fn utterance(&self) -> String {
        if self.words.is_empty() {
            return self.text.as_deref().unwrap_or_default().trim().to_string();
        }
        self.words
            .iter()
            .filter_map(|w| w.text.as_deref())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// Transcript payload in any of the shapes the remote produces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Transcript {
    /// Ordered segments.
    Segments(Vec<TranscriptSegment>),
    /// Pre-rendered text.
    Text(String),
    /// Object carrying either text or segments.
    Structured {
        /// Pre-rendered text.
        #[serde(default)]
        text: Option<String>,
        /// Ordered segments.
        #[serde(default)]
        segments: Option<Vec<TranscriptSegment>>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryAttributes {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    participants: Option<Vec<Participant>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResource {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    attributes: Option<SummaryAttributes>,
}

impl TryFrom<JsonObject> for ConversationSummary {
    type Error = serde_json::Error;

    fn try_from(object: JsonObject) -> Result<Self, Self::Error> {
        let resource: SummaryResource = from_object(object, "attributes")?;
        let attrs = resource.attributes.unwrap_or_default();
        Ok(Self {
            id: resolve_id(attrs.uuid, resource.id),
            title: attrs.title,
            created_at: attrs.created_at,
            participants: attrs.participants.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    data: Vec<ConversationSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    meta: PageMeta,
}

impl TryFrom<JsonObject> for ConversationPage {
    type Error = serde_json::Error;

    fn try_from(object: JsonObject) -> Result<Self, Self::Error> {
        let envelope: PageEnvelope = from_object(object, "meta")?;
        Ok(Self {
            data: envelope.data,
            meta: envelope.meta,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationAttributes {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    video_status: Option<String>,
    #[serde(default)]
    participants: Option<Vec<Participant>>,
    #[serde(default)]
    transcript: Option<Transcript>,
    #[serde(default)]
    extracted_intelligence: Option<Insights>,
    #[serde(default)]
    confirmed_extracted_intelligence: Option<Insights>,
}

#[derive(Debug, Deserialize)]
struct ConversationResource {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    attributes: Option<ConversationAttributes>,
}

impl TryFrom<JsonObject> for Conversation {
    type Error = serde_json::Error;

    fn try_from(mut object: JsonObject) -> Result<Self, Self::Error> {
        let object = match object.remove("data") {
            Some(serde_json::Value::Object(data)) => data,
            Some(_) => {
                return Err(serde_json::Error::custom(
                    "`data` must be a conversation object",
                ))
            }
            None if matches!(object.get("attributes"), Some(serde_json::Value::Object(_))) => {
                object
            }
            None => {
                return Err(serde_json::Error::custom(
                    "expected a conversation under `data` or `attributes`",
                ))
            }
        };
        let resource: ConversationResource = from_object(object, "attributes")?;
        let attrs = resource.attributes.unwrap_or_default();

        let insights = match attrs.confirmed_extracted_intelligence {
            Some(confirmed) if !confirmed.is_empty() => Some(confirmed),
            _ => attrs.extracted_intelligence,
        };

        Ok(Self {
            id: resolve_id(attrs.uuid, resource.id),
            title: attrs.title,
            created_at: attrs.created_at,
            video_status: attrs.video_status,
            participants: attrs.participants.unwrap_or_default(),
            insights,
            transcript: attrs.transcript,
        })
    }
}

/// Decode an envelope from a JSON object whose `section`, when present, is
/// also an object. Derived struct visitors also accept arrays.
fn from_object<T>(object: JsonObject, section: &str) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
{
    match object.get(section) {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Object(_)) => {}
        Some(_) => {
            return Err(serde_json::Error::custom(format!(
                "`{}` must be an object",
                section
            )))
        }
    }
    serde_json::from_value(serde_json::Value::Object(object))
}

fn resolve_id(uuid: Option<String>, id: Option<String>) -> String {
    uuid.filter(|s| !s.trim().is_empty())
        .or(id.filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| UNKNOWN_ID.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_parses_listing() {
        let page: ConversationPage = serde_json::from_value(json!({
            "data": [
                {
                    "id": "res-1",
                    "attributes": {
                        "uuid": "conv-1",
                        "title": "Kickoff",
                        "createdAt": "2025-01-02T10:00:00Z",
                        "participants": [{"name": "Ada", "email": "ada@example.com"}]
                    }
                },
                { "id": "res-2" }
            ],
            "meta": {"totalRecords": 42, "pageCount": 3, "pageNumber": 1}
        }))
        .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id, "conv-1");
        assert_eq!(page.data[0].title.as_deref(), Some("Kickoff"));
        assert_eq!(page.data[1].id, "res-2");
        assert!(page.data[1].participants.is_empty());
        assert_eq!(page.meta.total_records, Some(42));
        assert_eq!(page.meta.page_count, Some(3));
    }

    #[test]
    fn test_page_tolerates_missing_and_null_sections() {
        let page: ConversationPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.is_empty());

        let page: ConversationPage =
            serde_json::from_value(json!({"data": null, "meta": null})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.meta, PageMeta::default());
    }

    #[test]
    fn test_conversation_bare_and_wrapped() {
        let bare: Conversation = serde_json::from_value(json!({
            "id": "res-9",
            "attributes": {"uuid": "conv-9", "title": "Bare"}
        }))
        .unwrap();
        assert_eq!(bare.id, "conv-9");

        let wrapped: Conversation = serde_json::from_value(json!({
            "data": {"id": "res-9", "attributes": {"title": "Wrapped"}}
        }))
        .unwrap();
        assert_eq!(wrapped.id, "res-9");
        assert_eq!(wrapped.title.as_deref(), Some("Wrapped"));

        let anonymous: Conversation = serde_json::from_value(json!({"attributes": {}})).unwrap();
        assert_eq!(anonymous.id, UNKNOWN_ID);
    }

    #[test]
    fn test_conversation_rejects_wrong_shapes() {
        for body in [
            json!([]),
            json!(["a", {"x": 1}]),
            json!({}),
            json!({"message": "oops"}),
            json!({"data": []}),
            json!({"data": null}),
            json!({"attributes": ["conv-1"]}),
            json!({"attributes": null}),
            json!("conv-1"),
        ] {
            assert!(
                serde_json::from_value::<Conversation>(body.clone()).is_err(),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn test_page_rejects_wrong_shapes() {
        for body in [
            json!([]),
            json!([[], {}]),
            json!({"data": [["conv-1", {"title": "x"}]]}),
            json!({"data": [{"attributes": "x"}]}),
            json!({"data": {}}),
            json!({"meta": [1, 2, 3]}),
        ] {
            assert!(
                serde_json::from_value::<ConversationPage>(body.clone()).is_err(),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn test_confirmed_intelligence_preferred() {
        let conversation: Conversation = serde_json::from_value(json!({
            "attributes": {
                "extractedIntelligence": {"summary": {"title": "Summary", "value": "draft"}},
                "confirmedExtractedIntelligence": {"summary": {"title": "Summary", "value": "final"}}
            }
        }))
        .unwrap();
        let insights = conversation.insights.unwrap();
        assert_eq!(insights.entries(), vec![("Summary".to_string(), "final".to_string())]);
    }

    #[test]
    fn test_empty_confirmed_falls_back_to_extracted() {
        let conversation: Conversation = serde_json::from_value(json!({
            "attributes": {
                "extractedIntelligence": {"sentiment": "Positive"},
                "confirmedExtractedIntelligence": {}
            }
        }))
        .unwrap();
        let insights = conversation.insights.unwrap();
        assert_eq!(
            insights.entries(),
            vec![("Sentiment".to_string(), "Positive".to_string())]
        );
    }

    #[test]
    fn test_insight_entries_order_and_blank_values() {
        let insights: Insights = serde_json::from_value(json!({
            "zeta": {"title": "Next Steps", "value": "Send proposal"},
            "actionItems": ["Email Bob", ""],
            "summary": {"title": "Call Summary", "value": "  "},
            "sentiment": {"value": "Neutral"},
            "alpha": "Won"
        }))
        .unwrap();

        let titles: Vec<String> = insights.entries().into_iter().map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Sentiment", "Action Items", "alpha", "Next Steps"]);
        assert_eq!(insights.entries()[1].1, "- Email Bob");
    }

    #[test]
    fn test_transcript_word_segments() {
        let transcript: Transcript = serde_json::from_value(json!([
            {"speaker": {"name": "Ada"}, "words": [{"text": "Hi"}, {"text": " there "}]},
            {"speaker": {"email": "bob@example.com"}, "text": " Hello "},
            {"words": []}
        ]))
        .unwrap();

        let Transcript::Segments(segments) = transcript else {
            panic!("expected segments");
        };
        assert_eq!(segments[0].speaker_name(), "Ada");
        assert_eq!(segments[0].utterance(), "Hi there");
        assert_eq!(segments[1].speaker_name(), "bob@example.com");
        assert_eq!(segments[1].utterance(), "Hello");
        assert_eq!(segments[2].speaker_name(), "Unknown");
        assert_eq!(segments[2].utterance(), "");
    }

    #[test]
    fn test_transcript_text_and_structured() {
        let text: Transcript = serde_json::from_value(json!("Full text")).unwrap();
        assert_eq!(text, Transcript::Text("Full text".to_string()));

        let structured: Transcript = serde_json::from_value(json!({
            "segments": [{"speaker": "Ada", "text": "Hi"}]
        }))
        .unwrap();
        let Transcript::Structured { segments: Some(segments), .. } = structured else {
            panic!("expected structured segments");
        };
        assert_eq!(segments[0].speaker_name(), "Ada");
    }

    #[test]
    fn test_participant_display_name() {
        assert_eq!(Participant::new("Ada", "ada@example.com").display_name(), "Ada");
        let email_only = Participant {
            name: Some(" ".to_string()),
            email: Some("bob@example.com".to_string()),
        };
        assert_eq!(email_only.display_name(), "bob@example.com");
        assert_eq!(Participant::default().display_name(), "Unknown");
    }
}
