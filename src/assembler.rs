//! Conversation assembly: detection, parser dispatch, and record
//! construction.
//!
//! [`ConversationAssembler`] is the import entry point. It wires the
//! [`FormatDetector`] to the parsers, computes aggregate statistics, and
//! builds the final immutable [`Conversation`] record.
//!
//! # Example
//!
//! ```
//! use convosift::assembler::ConversationAssembler;
//! use convosift::conversation::ImportMeta;
//! use convosift::format::ChatFormat;
//!
//! let assembler = ConversationAssembler::new();
//! let result = assembler.parse("12/08/2023, 14:05 - Alice: hello", None);
//! assert_eq!(result.format, ChatFormat::WhatsApp);
//!
//! let conversation = assembler.create_conversation(result, ImportMeta::new());
//! assert_eq!(conversation.message_count, 1);
//! ```

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, ConversationStats, ImportMeta};
use crate::detect::FormatDetector;
use crate::format::ChatFormat;
use crate::ids::{RandomUuidGenerator, UuidGenerator};
use crate::message::Message;
use crate::parsers::create_parser;

/// Confidence reported when a caller-supplied format hint bypasses
/// detection.
const HINT_CONFIDENCE: f64 = 0.9;

/// The full outcome of one parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Format the text was parsed as ([`ChatFormat::Unknown`] only for
    /// empty input, where no grammar was consulted).
    pub format: ChatFormat,
    /// Detection confidence, or the fixed hint confidence (0.9) when a
    /// hint bypassed detection. Advisory only.
    pub confidence: f64,
    /// Human-readable notes from detection or the hint override.
    pub hints: Vec<String>,
    /// Normalized messages in transcript order.
    pub messages: Vec<Message>,
    /// Degraded-condition notes from the parser.
    pub warnings: Vec<String>,
    /// Aggregate statistics over `messages`.
    pub stats: ConversationStats,
}

/// Wires detection, parser selection, and conversation construction.
///
/// Holds a compiled [`FormatDetector`] and the injected
/// [`UuidGenerator`]; construct once and reuse.
pub struct ConversationAssembler {
    detector: FormatDetector,
    uuid_gen: Box<dyn UuidGenerator>,
}

impl ConversationAssembler {
    /// Creates an assembler with random conversation ids.
    pub fn new() -> Self {
        Self::with_uuid_generator(Box::new(RandomUuidGenerator))
    }

    /// Creates an assembler with a caller-supplied id source.
    ///
    /// Tests substitute a deterministic generator here.
    pub fn with_uuid_generator(uuid_gen: Box<dyn UuidGenerator>) -> Self {
        Self {
            detector: FormatDetector::new(),
            uuid_gen,
        }
    }

    /// Parses raw transcript text into normalized messages.
    ///
    /// With no hint (or `"auto"`), the detector picks the format. Any
    /// other hint is trusted verbatim at confidence 0.9 — the detector
    /// is never consulted — and unrecognized hint strings dispatch to
    /// the generic parser. Never fails: degraded input yields warnings.
    pub fn parse(&self, text: &str, format_hint: Option<&str>) -> ParseResult {
        if text.trim().is_empty() {
            return ParseResult {
                format: ChatFormat::Unknown,
                confidence: 0.0,
                hints: Vec::new(),
                messages: Vec::new(),
                warnings: vec!["input is empty; nothing to import".to_string()],
                stats: ConversationStats::default(),
            };
        }

        let (format, confidence, hints) = match format_hint {
            None | Some("auto") => {
                let detection = self.detector.detect(text);
                (detection.format, detection.confidence, detection.hints)
            }
            Some(hint) => {
                let format = ChatFormat::from_str(hint).unwrap_or(ChatFormat::Generic);
                (
                    format,
                    HINT_CONFIDENCE,
                    vec![format!("format hint '{hint}' supplied; detection skipped")],
                )
            }
        };

        let output = create_parser(format).parse(text);
        let stats = ConversationStats::of(&output.messages);

        ParseResult {
            format,
            confidence,
            hints,
            messages: output.messages,
            warnings: output.warnings,
            stats,
        }
    }

    /// Builds the immutable [`Conversation`] record for a parse result.
    ///
    /// The conversation id is freshly generated — never content-derived —
    /// so re-importing a transcript yields a new conversation whose
    /// messages still carry identical content-addressed ids.
    pub fn create_conversation(&self, result: ParseResult, meta: ImportMeta) -> Conversation {
        let now = Utc::now();
        let created_at = result
            .stats
            .date_range
            .map_or(now, |range| range.first);
        let title = meta
            .title
            .unwrap_or_else(|| format!("Conversation {}", now.format("%Y-%m-%d")));

        Conversation {
            id: self.uuid_gen.generate(),
            project_id: meta.project_id,
            title,
            source_app: result.format.or_generic(),
            channel_name: meta.channel_name,
            workspace_name: meta.workspace_name,
            participants: result.stats.participants,
            created_at,
            imported_at: now,
            message_count: result.messages.len(),
            date_range: result.stats.date_range,
            messages: result.messages,
        }
    }
}

impl Default for ConversationAssembler {
    fn default() -> Self {
        Self::new()
    }
}
