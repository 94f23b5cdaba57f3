//! WhatsApp text export parser.
//!
//! WhatsApp exports vary by locale. Three line shapes are recognized:
//! - `12/08/2023, 14:05 - Name: text` (optional seconds and AM/PM)
//! - `[12/08/2023, 14:05] Name: text`
//! - `12.08.2023, 14:05 - Name: text` (no AM/PM, seconds default to 00)
//!
//! Dates are day-first. Two-digit years are mapped Y2K-style (`> 50` →
//! 19xx, else 20xx). Lines with the date/time prefix but no `Name:`
//! segment are system notices (group events, encryption banners); they
//! are attributed to `"System"` and emitted immediately rather than
//! accumulated.

use regex::Regex;

use super::{ParseOutput, State, TranscriptParser, apply_ampm, build_timestamp, no_messages_warning, push_finalized};
use crate::format::ChatFormat;
use crate::message::{AttachmentRef, Message};

const MESSAGE_PATTERNS: &[&str] = &[
    // 12/08/2023, 14:05 - Name: text (optional :ss and AM/PM)
    r"^(?P<day>\d{1,2})/(?P<month>\d{1,2})/(?P<year>\d{2,4}),\s(?P<hour>\d{1,2}):(?P<min>\d{2})(?::(?P<sec>\d{2}))?(?:\s?(?P<ampm>[AaPp][Mm]))?\s-\s(?P<name>[^:]+):\s?(?P<text>.*)$",
    // [12/08/2023, 14:05] Name: text
    r"^\[(?P<day>\d{1,2})/(?P<month>\d{1,2})/(?P<year>\d{2,4}),\s(?P<hour>\d{1,2}):(?P<min>\d{2})\]\s(?P<name>[^:]+):\s?(?P<text>.*)$",
    // 12.08.2023, 14:05 - Name: text
    r"^(?P<day>\d{1,2})\.(?P<month>\d{1,2})\.(?P<year>\d{2,4}),\s(?P<hour>\d{1,2}):(?P<min>\d{2})\s-\s(?P<name>[^:]+):\s?(?P<text>.*)$",
];

// Same prefix, no "Name:" before the content
const SYSTEM_PATTERN: &str = r"^(?P<day>\d{1,2})/(?P<month>\d{1,2})/(?P<year>\d{2,4}),\s(?P<hour>\d{1,2}):(?P<min>\d{2})(?::(?P<sec>\d{2}))?(?:\s?(?P<ampm>[AaPp][Mm]))?\s-\s(?P<text>.*)$";

/// Parser for WhatsApp text exports.
///
/// # Example
///
/// ```rust
/// use convosift::parsers::{TranscriptParser, WhatsAppParser};
///
/// let parser = WhatsAppParser::new();
/// let output = parser.parse("01/02/23, 09:00 - Bob: hi");
/// assert_eq!(output.messages[0].speaker, "Bob");
/// assert!(output.messages[0].ts.is_some());
/// ```
pub struct WhatsAppParser {
    patterns: Vec<Regex>,
    system: Regex,
}

impl WhatsAppParser {
    /// Creates a parser with all line patterns compiled.
    pub fn new() -> Self {
        Self {
            patterns: MESSAGE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).unwrap())
                .collect(),
            system: Regex::new(SYSTEM_PATTERN).unwrap(),
        }
    }

    fn timestamp_from(caps: &regex::Captures<'_>) -> Option<chrono::DateTime<chrono::Utc>> {
        let day = caps.name("day")?.as_str().parse().ok()?;
        let month = caps.name("month")?.as_str().parse().ok()?;
        let year = caps.name("year")?.as_str().parse().ok()?;
        let raw_hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
        let minute = caps.name("min")?.as_str().parse().ok()?;
        let second = caps
            .name("sec")
            .map_or(Some(0), |m| m.as_str().parse().ok())?;
        let hour = apply_ampm(raw_hour, caps.name("ampm").map(|m| m.as_str()));
        build_timestamp(day, month, year, hour, minute, second)
    }
}

impl Default for WhatsAppParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn format(&self) -> ChatFormat {
        ChatFormat::WhatsApp
    }

    fn parse(&self, text: &str) -> ParseOutput {
        let mut output = ParseOutput::default();
        let mut state = State::Idle;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let idle = matches!(state, State::Idle);

            if let Some(caps) = self.patterns.iter().find_map(|p| p.captures(line)) {
                state.flush_into(&mut output.messages);

                let mut msg = Message::new(
                    caps.name("name").map_or("", |m| m.as_str()).trim(),
                    caps.name("text").map_or("", |m| m.as_str()),
                )
                .with_original_line(line_no);
                msg.ts = Self::timestamp_from(&caps);
                state = State::Accumulating(msg);
            } else if idle {
                // System notices carry no sender, never accumulate, and
                // are only recognized between messages
                if let Some(caps) = self.system.captures(line) {
                    let mut msg =
                        Message::new("System", caps.name("text").map_or("", |m| m.as_str()))
                            .with_original_line(line_no)
                            .as_system();
                    msg.ts = Self::timestamp_from(&caps);
                    push_finalized(&mut output.messages, msg);
                }
                // Anything else is an orphan line with nothing to join
            } else if let State::Accumulating(msg) = &mut state {
                msg.append_line(line);
            }
        }

        state.flush_into(&mut output.messages);

        // Export placeholders for dropped media become attachment refs
        for msg in &mut output.messages {
            if msg.text.contains("<Media omitted>") || msg.text.contains("<attached:") {
                msg.attachments.push(AttachmentRef::media());
            }
        }

        if output.messages.is_empty() {
            output.warnings.push(no_messages_warning(self.format()));
        }

        output
    }
}
