//! Normalized message type for all transcript formats.
//!
//! This module provides [`Message`], the normalized representation of an
//! attributed chat message. All format parsers convert their native
//! grammars into this structure, enabling uniform assembly and chunking
//! regardless of source.
//!
//! # Overview
//!
//! A message consists of:
//! - **Required**: `speaker` and `text` (`text` is always initialized to
//!   the empty string before continuation lines are appended — it is never
//!   absent)
//! - **Optional**: `ts`, `attachments`, positional/system metadata in
//!   [`MessageMeta`]
//! - **Derived**: `id`, a content-addressed identifier assigned once the
//!   full text is known (see [`crate::ids::message_id`])
//!
//! # Examples
//!
//! ```
//! use convosift::Message;
//!
//! let msg = Message::new("Alice", "Hello, world!");
//! assert_eq!(msg.speaker, "Alice");
//! assert_eq!(msg.text, "Hello, world!");
//! assert!(msg.ts.is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of an attachment reference.
///
/// Text exports carry no attachment payloads; placeholders like
/// `<Media omitted>` are surfaced as a [`Media`](AttachmentKind::Media)
/// reference so downstream consumers know content was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum AttachmentKind {
    /// An omitted or externally-stored media item.
    Media,
}

/// A reference to an attachment that accompanied a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// What kind of attachment this was. Serialized as `"type"` for
    /// downstream consumers.
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
}

impl AttachmentRef {
    /// Creates a media attachment reference.
    pub fn media() -> Self {
        Self {
            kind: AttachmentKind::Media,
        }
    }
}

/// Fixed-field metadata recorded during parsing.
///
/// Every parser records enough positional information here
/// (`original_line`) to derive a deterministic message id even when the
/// source carries no timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    /// `true` for messages synthesized from system notices (group events,
    /// encryption banners) rather than a named speaker.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_system: bool,

    /// 1-based line number (or array index, for JSON exports) of the line
    /// that started this message in the raw input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_line: Option<usize>,

    /// Raw time-of-day string for sources that carry a clock time but no
    /// date (Slack copy-paste headers). `ts` stays `None` in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_only: Option<String>,
}

impl MessageMeta {
    /// Returns `true` when no metadata was recorded.
    pub fn is_empty(&self) -> bool {
        *self == MessageMeta::default()
    }
}

/// A normalized, attributed chat message.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `id` | `String` | Content-addressed identifier (`msg-xxxxxxxx`) |
/// | `ts` | `Option<DateTime<Utc>>` | Absolute timestamp, when the source carries one |
/// | `speaker` | `String` | Attributed speaker name |
/// | `text` | `String` | Message text, with continuation lines joined by `\n` |
/// | `attachments` | `Vec<AttachmentRef>` | Placeholder attachment references |
/// | `meta` | [`MessageMeta`] | Positional and system-message metadata |
///
/// `ts` is `None` when the source format does not carry an absolute date
/// (e.g. a Slack copy-paste with only a time-of-day); the raw clock time,
/// if any, is preserved in `meta.time_only`.
///
/// # Serialization
///
/// Implements `Serialize`/`Deserialize`; `None` and empty optional fields
/// are omitted from JSON, timestamps use RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Content-addressed identifier, stable across re-imports of the same
    /// transcript. Assigned by the parser once the full text is known.
    #[serde(default)]
    pub id: String,

    /// When the message was sent, if the source format records a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,

    /// Attributed speaker name (`"System"` for system notices,
    /// `"Unknown"` when attribution failed).
    pub speaker: String,

    /// Message text. Never absent: accumulation always starts from the
    /// empty string before continuation lines are appended.
    #[serde(default)]
    pub text: String,

    /// Placeholder references for attachments the export omitted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRef>,

    /// Parser-recorded metadata.
    #[serde(default, skip_serializing_if = "MessageMeta::is_empty")]
    pub meta: MessageMeta,
}

impl Message {
    /// Creates a new message with only speaker and text.
    ///
    /// The id is left empty (parsers assign it at emit time), and all
    /// optional fields are unset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use convosift::Message;
    ///
    /// let msg = Message::new("Alice", "Hello!");
    /// assert_eq!(msg.speaker, "Alice");
    /// assert!(msg.ts.is_none());
    /// assert!(msg.attachments.is_empty());
    /// ```
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            ts: None,
            speaker: speaker.into(),
            text: text.into(),
            attachments: Vec::new(),
            meta: MessageMeta::default(),
        }
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_ts(mut self, ts: DateTime<Utc>) -> Self {
        self.ts = Some(ts);
        self
    }

    /// Builder method to record the originating line number.
    #[must_use]
    pub fn with_original_line(mut self, line: usize) -> Self {
        self.meta.original_line = Some(line);
        self
    }

    /// Builder method to record a dateless time-of-day string.
    #[must_use]
    pub fn with_time_only(mut self, time: impl Into<String>) -> Self {
        self.meta.time_only = Some(time.into());
        self
    }

    /// Builder method to mark this as a system message.
    #[must_use]
    pub fn as_system(mut self) -> Self {
        self.meta.is_system = true;
        self
    }

    /// Appends a continuation line to the text.
    ///
    /// Sets the text when it is still empty, otherwise joins with `\n`.
    pub fn append_line(&mut self, line: &str) {
        if self.text.is_empty() {
            self.text.push_str(line);
        } else {
            self.text.push('\n');
            self.text.push_str(line);
        }
    }

    /// Returns `true` if this message's text is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
