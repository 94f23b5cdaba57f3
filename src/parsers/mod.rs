//! Transcript parsers for the supported chat formats.
//!
//! Each parser implements [`TranscriptParser`]: an infallible
//! `&str -> ParseOutput` transformation. Malformed input never errors —
//! it degrades to fewer (or zero) messages plus `warnings` describing the
//! degraded conditions.
//!
//! All four parsers run the same abstract machine over the input lines:
//! [`State::Idle`] until a new-message pattern matches, then
//! [`State::Accumulating`] while continuation lines extend the current
//! message's text. The flush of the in-progress accumulator at end of
//! input is an explicit terminal transition — dropping it would silently
//! lose the last message of every transcript.
//!
//! # Example
//!
//! ```
//! use convosift::format::ChatFormat;
//! use convosift::parsers::create_parser;
//!
//! let parser = create_parser(ChatFormat::Generic);
//! let output = parser.parse("Alice: hello\nBob: hi");
//! assert_eq!(output.messages.len(), 2);
//! ```

mod generic;
mod slack;
mod teams;
mod whatsapp;

pub use generic::GenericParser;
pub use slack::SlackParser;
pub use teams::TeamsParser;
pub use whatsapp::WhatsAppParser;

use chrono::{DateTime, NaiveDate, Utc};

use crate::format::ChatFormat;
use crate::ids::{message_id, timestamp_anchor};
use crate::message::Message;

/// The result of parsing one transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    /// Normalized messages in transcript order.
    pub messages: Vec<Message>,
    /// Degraded-condition notes (no messages, missing timestamps, …).
    pub warnings: Vec<String>,
}

impl ParseOutput {
    /// Returns `true` when any degraded condition was reported.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Trait implemented by every format parser.
///
/// Parsers are stateless across calls and hold only their compiled
/// patterns, so one instance may be shared freely.
pub trait TranscriptParser: Send + Sync {
    /// Human-readable parser name (e.g. `"WhatsApp"`).
    fn name(&self) -> &'static str;

    /// The format this parser consumes.
    fn format(&self) -> ChatFormat;

    /// Parses raw transcript text. Never fails; degraded input yields
    /// warnings instead.
    fn parse(&self, text: &str) -> ParseOutput;
}

/// Creates the parser for `format`.
///
/// [`ChatFormat::Unknown`] dispatches to the generic parser.
pub fn create_parser(format: ChatFormat) -> Box<dyn TranscriptParser> {
    match format {
        ChatFormat::WhatsApp => Box::new(WhatsAppParser::new()),
        ChatFormat::Slack => Box::new(SlackParser::new()),
        ChatFormat::Teams => Box::new(TeamsParser::new()),
        ChatFormat::Generic | ChatFormat::Unknown => Box::new(GenericParser::new()),
    }
}

/// Line-loop state shared by all parsers.
///
/// Threading this explicitly (rather than a loop-local `Option`) keeps
/// the end-of-input flush a visible transition.
#[derive(Debug)]
pub(crate) enum State {
    /// No message under construction.
    Idle,
    /// A message is accumulating continuation lines.
    Accumulating(Message),
}

impl State {
    /// Takes the in-progress message, leaving the state `Idle`.
    pub(crate) fn take(&mut self) -> Option<Message> {
        match std::mem::replace(self, State::Idle) {
            State::Idle => None,
            State::Accumulating(msg) => Some(msg),
        }
    }

    /// Emits the in-progress message (if any) and resets to `Idle`.
    pub(crate) fn flush_into(&mut self, messages: &mut Vec<Message>) {
        if let Some(msg) = self.take() {
            push_finalized(messages, msg);
        }
    }
}

/// Assigns the content-addressed id and appends the message.
///
/// Ids are derived from `(speaker, text, ts-or-line-anchor)`, so they can
/// only be computed here, after all continuation lines have accumulated.
pub(crate) fn push_finalized(messages: &mut Vec<Message>, mut msg: Message) {
    let anchor = match msg.ts {
        Some(ts) => timestamp_anchor(ts),
        None => format!("line-{}", msg.meta.original_line.unwrap_or(0)),
    };
    msg.id = message_id(&msg.speaker, &msg.text, &anchor);
    messages.push(msg);
}

/// Maps a 2-digit year onto a century: `> 50` lands in 19xx, the rest in
/// 20xx. Intentionally crude; 4-digit years pass through unchanged.
pub(crate) fn normalize_year(year: i32) -> i32 {
    if year < 100 {
        if year > 50 { 1900 + year } else { 2000 + year }
    } else {
        year
    }
}

/// Converts a 12-hour clock reading to 24-hour.
///
/// PM adds 12 unless the hour is already 12; AM maps 12 to 0. `None`
/// markers leave the hour untouched.
pub(crate) fn apply_ampm(hour: u32, ampm: Option<&str>) -> u32 {
    match ampm.map(str::to_ascii_uppercase).as_deref() {
        Some("PM") if hour != 12 => hour + 12,
        Some("AM") if hour == 12 => 0,
        _ => hour,
    }
}

/// Builds a UTC timestamp from parsed calendar fields.
///
/// Returns `None` for impossible dates (month 13, hour 25, …) — the
/// message is then kept with `ts = None` rather than rejected.
pub(crate) fn build_timestamp(
    day: u32,
    month: u32,
    year: i32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(normalize_year(year), month, day)?
        .and_hms_opt(hour, minute, second)
        .map(|naive| naive.and_utc())
}

/// Warning used by every parser when nothing could be extracted.
pub(crate) fn no_messages_warning(format: ChatFormat) -> String {
    format!("no messages could be parsed from the input as {format}")
}

/// Warning used when no message carries an absolute timestamp.
pub(crate) fn no_timestamps_warning() -> String {
    "no timestamps found; message ordering relies on line positions only".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_parser_dispatch() {
        assert_eq!(create_parser(ChatFormat::WhatsApp).name(), "WhatsApp");
        assert_eq!(create_parser(ChatFormat::Slack).name(), "Slack");
        assert_eq!(create_parser(ChatFormat::Teams).name(), "Teams");
        assert_eq!(create_parser(ChatFormat::Generic).name(), "Generic");
        assert_eq!(create_parser(ChatFormat::Unknown).name(), "Generic");
    }

    #[test]
    fn test_state_take() {
        let mut state = State::Accumulating(Message::new("Alice", "hi"));
        let msg = state.take().unwrap();
        assert_eq!(msg.speaker, "Alice");
        assert!(state.take().is_none());
    }

    #[test]
    fn test_flush_assigns_id() {
        let mut messages = Vec::new();
        let mut state =
            State::Accumulating(Message::new("Alice", "hello").with_original_line(3));
        state.flush_into(&mut messages);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].id.starts_with("msg-"));
    }

    #[test]
    fn test_flush_idle_is_noop() {
        let mut messages = Vec::new();
        State::Idle.flush_into(&mut messages);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_normalize_year() {
        assert_eq!(normalize_year(23), 2023);
        assert_eq!(normalize_year(50), 2050);
        assert_eq!(normalize_year(51), 1951);
        assert_eq!(normalize_year(99), 1999);
        assert_eq!(normalize_year(2023), 2023);
    }

    #[test]
    fn test_apply_ampm() {
        assert_eq!(apply_ampm(9, Some("AM")), 9);
        assert_eq!(apply_ampm(12, Some("AM")), 0);
        assert_eq!(apply_ampm(1, Some("PM")), 13);
        assert_eq!(apply_ampm(12, Some("PM")), 12);
        assert_eq!(apply_ampm(14, None), 14);
        assert_eq!(apply_ampm(3, Some("pm")), 15);
    }

    #[test]
    fn test_build_timestamp_rejects_impossible_dates() {
        assert!(build_timestamp(32, 1, 2023, 10, 0, 0).is_none());
        assert!(build_timestamp(1, 13, 2023, 10, 0, 0).is_none());
        assert!(build_timestamp(1, 1, 2023, 25, 0, 0).is_none());
        assert!(build_timestamp(1, 2, 23, 9, 0, 0).is_some());
    }

    #[test]
    fn test_identical_content_identical_ids() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        push_finalized(
            &mut first,
            Message::new("Alice", "same text").with_original_line(5),
        );
        push_finalized(
            &mut second,
            Message::new("Alice", "same text").with_original_line(5),
        );
        assert_eq!(first[0].id, second[0].id);
    }
}
