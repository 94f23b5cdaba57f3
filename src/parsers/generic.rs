//! Generic "Speaker: message" parser — the fallback grammar.
//!
//! Four new-message shapes are tried per line, first match wins:
//! `Name: text`, `[Name] text`, `<Name> text`, `@Name text`.
//!
//! Lines matching none of them are classified by a heuristic with no
//! ground truth: indented lines, tab-led lines, and lines under 50
//! characters continue the current message; anything longer starts a new
//! message attributed to the last seen speaker. Downstream chunking
//! assumes this exact segmentation, so the heuristic is preserved as-is.

use regex::Regex;

use super::{ParseOutput, State, TranscriptParser, no_messages_warning, no_timestamps_warning};
use crate::format::ChatFormat;
use crate::message::Message;

/// Longest non-matching line still treated as a continuation.
const CONTINUATION_MAX_CHARS: usize = 50;

const NEW_MESSAGE_PATTERNS: &[&str] = &[
    // Name: text
    r"^(?P<name>[A-Za-z0-9_. '\-]{1,40}):\s(?P<text>.*)$",
    // [Name] text
    r"^\[(?P<name>[^\]]+)\]\s?(?P<text>.*)$",
    // <Name> text
    r"^<(?P<name>[^>]+)>\s?(?P<text>.*)$",
    // @Name text
    r"^@(?P<name>\S+)\s+(?P<text>.*)$",
];

/// Parser for unlabeled `Speaker: message` transcripts.
///
/// # Example
///
/// ```rust
/// use convosift::parsers::{GenericParser, TranscriptParser};
///
/// let output = GenericParser::new().parse("Alice: hello\nBob: hi");
/// assert_eq!(output.messages.len(), 2);
/// assert_eq!(output.messages[1].speaker, "Bob");
/// ```
pub struct GenericParser {
    patterns: Vec<Regex>,
}

impl GenericParser {
    /// Creates a parser with all line patterns compiled.
    pub fn new() -> Self {
        Self {
            patterns: NEW_MESSAGE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).unwrap())
                .collect(),
        }
    }
}

impl Default for GenericParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for GenericParser {
    fn name(&self) -> &'static str {
        "Generic"
    }

    fn format(&self) -> ChatFormat {
        ChatFormat::Generic
    }

    fn parse(&self, text: &str) -> ParseOutput {
        let mut output = ParseOutput::default();
        let mut state = State::Idle;
        let mut last_speaker: Option<String> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(caps) = self.patterns.iter().find_map(|p| p.captures(line)) {
                state.flush_into(&mut output.messages);
                let speaker = caps.name("name").map_or("", |m| m.as_str()).trim().to_string();
                last_speaker = Some(speaker.clone());
                let msg = Message::new(speaker, caps.name("text").map_or("", |m| m.as_str()))
                    .with_original_line(line_no);
                state = State::Accumulating(msg);
                continue;
            }

            let looks_like_continuation = line.starts_with(' ')
                || line.starts_with('\t')
                || line.chars().count() < CONTINUATION_MAX_CHARS;

            if looks_like_continuation {
                if let State::Accumulating(msg) = &mut state {
                    msg.append_line(line);
                    continue;
                }
            }

            // Long unmarked line (or no message to continue): the same
            // speaker kept talking
            state.flush_into(&mut output.messages);
            let speaker = last_speaker.clone().unwrap_or_else(|| "Unknown".to_string());
            let msg = Message::new(speaker, line).with_original_line(line_no);
            state = State::Accumulating(msg);
        }

        state.flush_into(&mut output.messages);

        if output.messages.is_empty() {
            output.warnings.push(no_messages_warning(self.format()));
        } else {
            if output.messages.iter().all(|m| m.ts.is_none()) {
                output.warnings.push(no_timestamps_warning());
            }
            let unknown = output
                .messages
                .iter()
                .filter(|m| m.speaker == "Unknown")
                .count();
            if unknown * 2 > output.messages.len() {
                output.warnings.push(
                    "more than half of the messages could not be attributed to a speaker"
                        .to_string(),
                );
            }
        }

        output
    }
}
