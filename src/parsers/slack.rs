//! Slack export and copy-paste parser.
//!
//! Two very different inputs arrive labeled "Slack":
//! - **JSON exports**: an array of `{type, text, ts, user|username,
//!   attachments}` objects with Unix-seconds timestamps. Tried first
//!   against the whole input.
//! - **Copy-paste text**: `Name  10:30 AM` header lines followed by the
//!   message body, or `10:30 Name: text` single lines. Copy-paste
//!   carries only a time-of-day, so `ts` stays `None` and the clock
//!   reading is preserved in `meta.time_only`.
//!
//! A plain `Name: text` line is only accepted as a new message while no
//! message is accumulating; otherwise a continuation that happens to
//! contain a colon would be misread as a speaker change.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;

use super::{ParseOutput, State, TranscriptParser, no_messages_warning, no_timestamps_warning, push_finalized};
use crate::format::ChatFormat;
use crate::message::{AttachmentRef, Message};

// Name  10:30 AM  (header line, body follows on the next lines)
const HEADER_PATTERN: &str = r"^(?P<name>\S.*?)\s{2,}(?P<time>\d{1,2}:\d{2}(?:\s?[AaPp][Mm])?)$";
// 10:30 Name: text
const TIMED_PATTERN: &str = r"^(?P<time>\d{1,2}:\d{2})\s+(?P<name>[^:]+):\s?(?P<text>.*)$";
// Name: text (Idle state only)
const PLAIN_PATTERN: &str = r"^(?P<name>[^:]+):\s(?P<text>.*)$";

/// One entry of a Slack JSON export.
#[derive(Debug, Deserialize)]
struct SlackExportMessage {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    attachments: Vec<serde_json::Value>,
}

/// Parser for Slack JSON exports and copy-pasted channel text.
///
/// # Example
///
/// ```rust
/// use convosift::parsers::{SlackParser, TranscriptParser};
///
/// let output = SlackParser::new()
///     .parse(r#"[{"type":"message","user":"U1","text":"hi","ts":"1690000000.0"}]"#);
/// assert_eq!(output.messages[0].speaker, "U1");
/// assert!(output.messages[0].ts.is_some());
/// ```
pub struct SlackParser {
    header: Regex,
    timed: Regex,
    plain: Regex,
}

impl SlackParser {
    /// Creates a parser with all line patterns compiled.
    pub fn new() -> Self {
        Self {
            header: Regex::new(HEADER_PATTERN).unwrap(),
            timed: Regex::new(TIMED_PATTERN).unwrap(),
            plain: Regex::new(PLAIN_PATTERN).unwrap(),
        }
    }

    /// Converts messages out of a parsed JSON export array.
    fn from_json(entries: Vec<SlackExportMessage>) -> Vec<Message> {
        let mut messages = Vec::new();
        for (idx, entry) in entries.into_iter().enumerate() {
            if entry.kind.as_deref() != Some("message") {
                continue;
            }
            let speaker = entry
                .user
                .or(entry.username)
                .unwrap_or_else(|| "Unknown".to_string());
            let mut msg = Message::new(speaker, entry.text.unwrap_or_default())
                .with_original_line(idx + 1);
            msg.ts = entry.ts.as_deref().and_then(unix_seconds_to_utc);
            msg.attachments = entry
                .attachments
                .iter()
                .map(|_| AttachmentRef::media())
                .collect();
            push_finalized(&mut messages, msg);
        }
        messages
    }

    fn parse_lines(&self, text: &str) -> Vec<Message> {
        let mut messages = Vec::new();
        let mut state = State::Idle;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let idle = matches!(state, State::Idle);

            if let Some(caps) = self.header.captures(line) {
                state.flush_into(&mut messages);
                let msg = Message::new(caps.name("name").map_or("", |m| m.as_str()).trim(), "")
                    .with_original_line(line_no)
                    .with_time_only(caps.name("time").map_or("", |m| m.as_str()));
                state = State::Accumulating(msg);
            } else if let Some(caps) = self.timed.captures(line) {
                state.flush_into(&mut messages);
                let msg = Message::new(
                    caps.name("name").map_or("", |m| m.as_str()).trim(),
                    caps.name("text").map_or("", |m| m.as_str()),
                )
                .with_original_line(line_no)
                .with_time_only(caps.name("time").map_or("", |m| m.as_str()));
                state = State::Accumulating(msg);
            } else if idle {
                // Plain "Name: text" is only trusted between messages
                if let Some(caps) = self.plain.captures(line) {
                    let msg = Message::new(
                        caps.name("name").map_or("", |m| m.as_str()).trim(),
                        caps.name("text").map_or("", |m| m.as_str()),
                    )
                    .with_original_line(line_no);
                    state = State::Accumulating(msg);
                }
            } else if let State::Accumulating(msg) = &mut state {
                msg.append_line(line);
            }
        }

        state.flush_into(&mut messages);
        messages
    }
}

impl Default for SlackParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for SlackParser {
    fn name(&self) -> &'static str {
        "Slack"
    }

    fn format(&self) -> ChatFormat {
        ChatFormat::Slack
    }

    fn parse(&self, text: &str) -> ParseOutput {
        let messages = match serde_json::from_str::<Vec<SlackExportMessage>>(text.trim()) {
            Ok(entries) => Self::from_json(entries),
            Err(_) => self.parse_lines(text),
        };

        let mut warnings = Vec::new();
        if messages.is_empty() {
            warnings.push(no_messages_warning(self.format()));
        } else if messages.iter().all(|m| m.ts.is_none()) {
            warnings.push(no_timestamps_warning());
        }

        ParseOutput { messages, warnings }
    }
}

/// Converts a Slack `"1690000000.123456"` timestamp to UTC.
fn unix_seconds_to_utc(ts: &str) -> Option<DateTime<Utc>> {
    let seconds: f64 = ts.parse().ok()?;
    let secs = seconds.trunc() as i64;
    let nanos = (seconds.fract() * 1e9).round() as u32;
    DateTime::from_timestamp(secs, nanos)
}
