//! Conversation records and import metadata.
//!
//! A [`Conversation`] is one imported transcript: normalized metadata plus
//! the ordered message list. Conversations are created once at import time
//! and are immutable thereafter from this pipeline's perspective — the
//! chunker derives disposable projections from them on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::ChatFormat;
use crate::message::Message;

/// First and last timestamps observed across a set of messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest timestamp.
    pub first: DateTime<Utc>,
    /// Latest timestamp.
    pub last: DateTime<Utc>,
}

impl DateRange {
    /// Computes the range over the non-null timestamps of `messages`.
    ///
    /// Returns `None` when no message carries a timestamp.
    pub fn of(messages: &[Message]) -> Option<DateRange> {
        let mut timestamps = messages.iter().filter_map(|m| m.ts);
        let first_seen = timestamps.next()?;
        let (first, last) = timestamps.fold((first_seen, first_seen), |(lo, hi), ts| {
            (lo.min(ts), hi.max(ts))
        });
        Some(DateRange { first, last })
    }
}

/// Aggregate statistics computed from a parsed message list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationStats {
    /// Distinct speakers in order of first appearance.
    pub participants: Vec<String>,
    /// Range of non-null timestamps, if any message carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl ConversationStats {
    /// Computes stats for a message list.
    pub fn of(messages: &[Message]) -> Self {
        Self {
            participants: participants_in_order(messages),
            date_range: DateRange::of(messages),
        }
    }
}

/// Returns distinct speaker names in first-appearance order.
pub fn participants_in_order(messages: &[Message]) -> Vec<String> {
    let mut seen = Vec::new();
    for msg in messages {
        if !seen.iter().any(|s| s == &msg.speaker) {
            seen.push(msg.speaker.clone());
        }
    }
    seen
}

/// Caller-supplied metadata attached to an import.
///
/// All fields are optional; the assembler fills sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportMeta {
    /// Project the conversation belongs to, if the caller tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Display title; defaults to `"Conversation {date}"` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Channel the transcript came from (Slack/Teams).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Workspace or tenant name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
}

impl ImportMeta {
    /// Creates empty import metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the project id.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Builder method to set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the channel name.
    #[must_use]
    pub fn with_channel_name(mut self, channel: impl Into<String>) -> Self {
        self.channel_name = Some(channel.into());
        self
    }

    /// Builder method to set the workspace name.
    #[must_use]
    pub fn with_workspace_name(mut self, workspace: impl Into<String>) -> Self {
        self.workspace_name = Some(workspace.into());
        self
    }
}

/// One imported chat transcript with normalized metadata and an ordered
/// message list.
///
/// `id` is a fresh random UUID per import — never content-derived.
/// Re-importing the same transcript produces a new `Conversation` whose
/// messages carry identical content-addressed ids, enabling message-level
/// dedup downstream without conversation-level merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Random v4 UUID assigned at import.
    pub id: Uuid,
    /// Owning project, if supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Display title.
    pub title: String,
    /// The format the transcript was parsed as.
    pub source_app: ChatFormat,
    /// Source channel, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Source workspace, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    /// Distinct speakers in first-appearance order.
    pub participants: Vec<String>,
    /// Earliest message timestamp, or the import time when none exists.
    pub created_at: DateTime<Utc>,
    /// When the import ran.
    pub imported_at: DateTime<Utc>,
    /// Number of messages.
    pub message_count: usize,
    /// Range of message timestamps, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// The normalized messages, in transcript order.
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 8, 12, h, m, 0).unwrap()
    }

    #[test]
    fn test_date_range_none_without_timestamps() {
        let messages = vec![Message::new("Alice", "hi"), Message::new("Bob", "yo")];
        assert!(DateRange::of(&messages).is_none());
    }

    #[test]
    fn test_date_range_min_max() {
        let messages = vec![
            Message::new("Alice", "hi").with_ts(ts(10, 30)),
            Message::new("Bob", "yo").with_ts(ts(9, 15)),
            Message::new("Alice", "later").with_ts(ts(11, 0)),
            Message::new("Carol", "no clock"),
        ];
        let range = DateRange::of(&messages).unwrap();
        assert_eq!(range.first, ts(9, 15));
        assert_eq!(range.last, ts(11, 0));
    }

    #[test]
    fn test_participants_first_appearance_order() {
        let messages = vec![
            Message::new("Carol", "1"),
            Message::new("Alice", "2"),
            Message::new("Carol", "3"),
            Message::new("Bob", "4"),
            Message::new("Alice", "5"),
        ];
        assert_eq!(
            participants_in_order(&messages),
            vec!["Carol", "Alice", "Bob"]
        );
    }

    #[test]
    fn test_stats_of_empty() {
        let stats = ConversationStats::of(&[]);
        assert!(stats.participants.is_empty());
        assert!(stats.date_range.is_none());
    }

    #[test]
    fn test_import_meta_builder() {
        let meta = ImportMeta::new()
            .with_project_id("proj-1")
            .with_title("Standup")
            .with_channel_name("#dev")
            .with_workspace_name("Acme");
        assert_eq!(meta.project_id.as_deref(), Some("proj-1"));
        assert_eq!(meta.title.as_deref(), Some("Standup"));
        assert_eq!(meta.channel_name.as_deref(), Some("#dev"));
        assert_eq!(meta.workspace_name.as_deref(), Some("Acme"));
    }
}
