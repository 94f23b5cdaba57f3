//! Microsoft Teams copy-paste parser.
//!
//! Teams pastes put the speaker and timestamp on a header line of their
//! own (`Name␣␣12/08/2023 14:05` or `Name␣␣2:05 PM`), with the message
//! body on the following lines. Headers therefore start a message with
//! empty text that continuations fill in.
//!
//! Because two headers can appear back-to-back (a speaker whose message
//! body was lost in the paste), a previous message is only flushed once
//! it has non-empty text; an empty header is silently replaced by the
//! next one.

use regex::Regex;

use super::{ParseOutput, State, TranscriptParser, apply_ampm, build_timestamp, no_messages_warning, push_finalized};
use crate::format::ChatFormat;
use crate::message::Message;

// Name  12/08/2023 14:05  (optional AM/PM)
const FULL_HEADER_PATTERN: &str = r"^(?P<name>\S.*?)\s{2,}(?P<day>\d{1,2})/(?P<month>\d{1,2})/(?P<year>\d{2,4})\s+(?P<hour>\d{1,2}):(?P<min>\d{2})(?:\s?(?P<ampm>[AaPp][Mm]))?$";
// Name  2:05 PM
const TIME_HEADER_PATTERN: &str =
    r"^(?P<name>\S.*?)\s{2,}(?P<hour>\d{1,2}):(?P<min>\d{2})\s?(?P<ampm>[AaPp][Mm])$";

/// Parser for Microsoft Teams copy-pasted transcripts.
///
/// # Example
///
/// ```rust
/// use convosift::parsers::{TeamsParser, TranscriptParser};
///
/// let output = TeamsParser::new().parse("Alice Johnson  12/08/2023 14:05\nhello everyone");
/// assert_eq!(output.messages[0].speaker, "Alice Johnson");
/// assert_eq!(output.messages[0].text, "hello everyone");
/// ```
pub struct TeamsParser {
    full_header: Regex,
    time_header: Regex,
}

impl TeamsParser {
    /// Creates a parser with both header patterns compiled.
    pub fn new() -> Self {
        Self {
            full_header: Regex::new(FULL_HEADER_PATTERN).unwrap(),
            time_header: Regex::new(TIME_HEADER_PATTERN).unwrap(),
        }
    }

    /// Flushes the accumulator only when it holds real content; an
    /// empty-text header is dropped in favor of the incoming one.
    fn flush_nonempty(state: &mut State, messages: &mut Vec<Message>) {
        if let Some(msg) = state.take() {
            if !msg.text.is_empty() {
                push_finalized(messages, msg);
            }
        }
    }
}

impl Default for TeamsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for TeamsParser {
    fn name(&self) -> &'static str {
        "Teams"
    }

    fn format(&self) -> ChatFormat {
        ChatFormat::Teams
    }

    fn parse(&self, text: &str) -> ParseOutput {
        let mut output = ParseOutput::default();
        let mut state = State::Idle;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(caps) = self.full_header.captures(line) {
                Self::flush_nonempty(&mut state, &mut output.messages);
                let mut msg = Message::new(caps.name("name").map_or("", |m| m.as_str()).trim(), "")
                    .with_original_line(line_no);
                msg.ts = header_timestamp(&caps);
                state = State::Accumulating(msg);
            } else if let Some(caps) = self.time_header.captures(line) {
                Self::flush_nonempty(&mut state, &mut output.messages);
                let time = format!(
                    "{}:{} {}",
                    caps.name("hour").map_or("", |m| m.as_str()),
                    caps.name("min").map_or("", |m| m.as_str()),
                    caps.name("ampm").map_or("", |m| m.as_str()),
                );
                let msg = Message::new(caps.name("name").map_or("", |m| m.as_str()).trim(), "")
                    .with_original_line(line_no)
                    .with_time_only(time);
                state = State::Accumulating(msg);
            } else {
                match &mut state {
                    State::Accumulating(msg) => msg.append_line(line),
                    State::Idle => {
                        // Orphan content with no header above it
                        let msg = Message::new("Unknown", line).with_original_line(line_no);
                        state = State::Accumulating(msg);
                    }
                }
            }
        }

        state.flush_into(&mut output.messages);

        if output.messages.is_empty() {
            output.warnings.push(no_messages_warning(self.format()));
        }

        output
    }
}

fn header_timestamp(caps: &regex::Captures<'_>) -> Option<chrono::DateTime<chrono::Utc>> {
    let day = caps.name("day")?.as_str().parse().ok()?;
    let month = caps.name("month")?.as_str().parse().ok()?;
    let year = caps.name("year")?.as_str().parse().ok()?;
    let raw_hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
    let minute = caps.name("min")?.as_str().parse().ok()?;
    let hour = apply_ampm(raw_hour, caps.name("ampm").map(|m| m.as_str()));
    build_timestamp(day, month, year, hour, minute, 0)
}
