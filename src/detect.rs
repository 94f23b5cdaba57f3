//! Heuristic transcript format detection.
//!
//! No file extension or explicit marker is guaranteed for pasted text, so
//! [`FormatDetector`] classifies raw input by scoring a bounded sample of
//! lines against per-format pattern families. The returned
//! [`Detection`] carries a confidence in `[0, 1)` and human-readable
//! hints; confidence is advisory only — the selected format is always
//! used for parsing, and callers may use a low score to prompt a user
//! override.
//!
//! # Example
//!
//! ```
//! use convosift::detect::FormatDetector;
//! use convosift::format::ChatFormat;
//!
//! let detector = FormatDetector::new();
//! let detection = detector.detect("12/08/2023, 14:05 - Alice: hello");
//! assert_eq!(detection.format, ChatFormat::WhatsApp);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::format::ChatFormat;

/// How many non-blank lines are sampled for scoring.
///
/// Detection must stay O(1) in document size for large pastes.
const SAMPLE_LINES: usize = 50;

/// Confidence assigned when the input is structurally certain to be a
/// Slack JSON export (trumps all line heuristics).
const SLACK_JSON_CONFIDENCE: f64 = 0.95;

/// WhatsApp line shapes: `dd/mm/yyyy, hh:mm[:ss][ AM/PM] - `, the
/// bracketed variant, and the dot-separated variant.
const WHATSAPP_PATTERNS: &[&str] = &[
    r"^\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp][Mm])?\s-\s",
    r"^\[\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp][Mm])?\]",
    r"^\d{1,2}\.\d{1,2}\.\d{2,4},\s\d{1,2}:\d{2}\s-\s",
];

/// Slack line shapes: `Name␣␣hh:mm[ AM/PM]` headers, `hh:mm Name: text`,
/// and a JSON export fragment.
const SLACK_PATTERNS: &[&str] = &[
    r"^\S.*?\s{2,}\d{1,2}:\d{2}(?:\s?[AaPp][Mm])?$",
    r"^\d{1,2}:\d{2}\s+[^:]+:\s",
    r#""type"\s*:\s*"message""#,
];

/// Teams line shapes: `Name␣␣dd/mm/yyyy hh:mm`, `Name␣␣hh:mm AM/PM`, and
/// `(Name) dd/mm/yyyy`.
const TEAMS_PATTERNS: &[&str] = &[
    r"^\S.*?\s{2,}\d{1,2}/\d{1,2}/\d{2,4}\s+\d{1,2}:\d{2}",
    r"^\S.*?\s{2,}\d{1,2}:\d{2}\s?[AaPp][Mm]$",
    r"^\(.+\)\s+\d{1,2}/\d{1,2}/\d{2,4}",
];

/// Catch-all `Speaker: text` shape for unlabeled transcripts.
const GENERIC_PATTERN: &str = r"^[A-Za-z0-9_. '\-]{1,30}:\s\S";

/// Per-format scoring constants.
struct Weights {
    /// Upper bound on confidence.
    cap: f64,
    /// Confidence floor once the format wins.
    base: f64,
    /// Density multiplier (`score / sampled lines`).
    scale: f64,
    /// Minimum score required to win at all.
    threshold: u32,
    /// Points one matching line contributes.
    line_weight: u32,
}

fn weights(format: ChatFormat) -> Weights {
    match format {
        ChatFormat::WhatsApp => Weights {
            cap: 0.95,
            base: 0.5,
            scale: 0.5,
            threshold: 3,
            line_weight: 3,
        },
        ChatFormat::Slack => Weights {
            cap: 0.9,
            base: 0.5,
            scale: 0.4,
            threshold: 3,
            line_weight: 3,
        },
        ChatFormat::Teams => Weights {
            cap: 0.85,
            base: 0.5,
            scale: 0.35,
            threshold: 3,
            line_weight: 3,
        },
        ChatFormat::Generic | ChatFormat::Unknown => Weights {
            cap: 0.7,
            base: 0.3,
            scale: 0.4,
            threshold: 1,
            line_weight: 1,
        },
    }
}

/// The outcome of format detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// The winning format. Always usable for parsing, however low the
    /// confidence.
    pub format: ChatFormat,
    /// Heuristic confidence in `[0, 1)`. Advisory only.
    pub confidence: f64,
    /// Human-readable notes on how the decision was made.
    pub hints: Vec<String>,
}

/// Scores raw text against per-format line pattern families.
///
/// Construction compiles all patterns once; reuse the detector across
/// calls.
pub struct FormatDetector {
    whatsapp: Vec<Regex>,
    slack: Vec<Regex>,
    teams: Vec<Regex>,
    generic: Regex,
}

impl FormatDetector {
    /// Creates a detector with all pattern families compiled.
    pub fn new() -> Self {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .map(|p| Regex::new(p).unwrap())
                .collect::<Vec<_>>()
        };
        Self {
            whatsapp: compile(WHATSAPP_PATTERNS),
            slack: compile(SLACK_PATTERNS),
            teams: compile(TEAMS_PATTERNS),
            generic: Regex::new(GENERIC_PATTERN).unwrap(),
        }
    }

    /// Classifies `text` as one of the four transcript formats.
    ///
    /// Empty input yields [`ChatFormat::Generic`] at confidence 0. A
    /// whole-input JSON array whose first element has `"type": "message"`
    /// is structurally certain Slack and short-circuits at confidence
    /// 0.95. Otherwise the first 50 non-blank lines are scored against
    /// the pattern families; the strictly highest score above its
    /// format's threshold wins, with ties resolved in the order
    /// whatsapp > slack > teams > generic.
    pub fn detect(&self, text: &str) -> Detection {
        if text.trim().is_empty() {
            return Detection {
                format: ChatFormat::Generic,
                confidence: 0.0,
                hints: vec!["input is empty or whitespace-only".to_string()],
            };
        }

        if is_slack_json(text) {
            return Detection {
                format: ChatFormat::Slack,
                confidence: SLACK_JSON_CONFIDENCE,
                hints: vec!["input parses as a Slack JSON message array".to_string()],
            };
        }

        let sampled: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(SAMPLE_LINES)
            .collect();

        // One score slot per entry in ChatFormat::all()
        let mut scores = [0u32; 4];
        for line in &sampled {
            for (slot, family) in [&self.whatsapp, &self.slack, &self.teams]
                .into_iter()
                .enumerate()
            {
                // First matching pattern within a family wins the line
                if family.iter().any(|p| p.is_match(line)) {
                    scores[slot] += weights(ChatFormat::all()[slot]).line_weight;
                }
            }
            if self.generic.is_match(line) {
                scores[3] += weights(ChatFormat::Generic).line_weight;
            }
        }

        let mut winner: Option<(ChatFormat, u32)> = None;
        for (slot, &format) in ChatFormat::all().iter().enumerate() {
            let score = scores[slot];
            if score < weights(format).threshold {
                continue;
            }
            if winner.is_none_or(|(_, best)| score > best) {
                winner = Some((format, score));
            }
        }

        match winner {
            Some((format, score)) => {
                let w = weights(format);
                let density = f64::from(score) / sampled.len() as f64;
                let confidence = f64::min(w.cap, w.base + density * w.scale);
                let hits = score / w.line_weight;
                Detection {
                    format,
                    confidence,
                    hints: vec![format!(
                        "{hits} of {} sampled lines matched {format} patterns",
                        sampled.len()
                    )],
                }
            }
            None => Detection {
                format: ChatFormat::Generic,
                confidence: weights(ChatFormat::Generic).base,
                hints: vec![
                    "no known chat format patterns matched; using line-based generic parsing"
                        .to_string(),
                ],
            },
        }
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural sniff: a JSON array whose first element is a Slack-style
/// message object.
fn is_slack_json(text: &str) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text.trim()) else {
        return false;
    };
    value
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|first| first.get("type"))
        .and_then(|t| t.as_str())
        .is_some_and(|t| t == "message")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Detection {
        FormatDetector::new().detect(text)
    }

    #[test]
    fn test_detect_whatsapp_repeated_line() {
        let text = "12/08/2023, 14:05 - Alice: hello\n".repeat(10);
        let detection = detect(&text);
        assert_eq!(detection.format, ChatFormat::WhatsApp);
        assert!(detection.confidence >= 0.5);
        assert!(detection.confidence < 1.0);
    }

    #[test]
    fn test_detect_whatsapp_bracket_variant() {
        let text = "[12/08/2023, 14:05] Alice: hello\n[12/08/2023, 14:06] Bob: hi";
        assert_eq!(detect(text).format, ChatFormat::WhatsApp);
    }

    #[test]
    fn test_detect_whatsapp_dot_variant() {
        let text = "12.08.2023, 14:05 - Alice: hello\n12.08.2023, 14:06 - Bob: hi";
        assert_eq!(detect(text).format, ChatFormat::WhatsApp);
    }

    #[test]
    fn test_detect_slack_copy_paste() {
        let text = "Alice  10:30 AM\nhello there\nBob  10:31 AM\nhi back";
        assert_eq!(detect(text).format, ChatFormat::Slack);
    }

    #[test]
    fn test_detect_slack_json() {
        let text = r#"[{"type":"message","user":"U1","text":"hi","ts":"1690000000.0"}]"#;
        let detection = detect(text);
        assert_eq!(detection.format, ChatFormat::Slack);
        assert!((detection.confidence - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_detect_json_array_of_other_things_is_not_slack() {
        let text = r#"[{"type":"event","name":"deploy"}]"#;
        assert_ne!(detect(text).format, ChatFormat::Slack);
    }

    #[test]
    fn test_detect_teams_headers() {
        let text = "Alice Johnson  12/08/2023 14:05\nhello everyone\nBob Smith  12/08/2023 14:07\nhi";
        assert_eq!(detect(text).format, ChatFormat::Teams);
    }

    #[test]
    fn test_detect_generic_speaker_colon() {
        let text = "Alice: hello\nBob: hi there\nAlice: how are you";
        assert_eq!(detect(text).format, ChatFormat::Generic);
    }

    #[test]
    fn test_detect_generic_fallback_on_prose() {
        let detection = detect("random unstructured prose with no markers");
        assert_eq!(detection.format, ChatFormat::Generic);
        assert!(!detection.hints.is_empty());
    }

    #[test]
    fn test_detect_empty_input() {
        let detection = detect("");
        assert_eq!(detection.format, ChatFormat::Generic);
        assert!((detection.confidence - 0.0).abs() < f64::EPSILON);
        assert!(!detection.hints.is_empty());
    }

    #[test]
    fn test_detect_confidence_caps() {
        // Dense matches saturate at the per-format cap, never 1.0
        let text = "12/08/2023, 14:05 - Alice: hello\n".repeat(50);
        let detection = detect(&text);
        assert!((detection.confidence - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_detect_whatsapp_beats_generic() {
        // WhatsApp message lines also end in "Name: text", but the
        // format-specific family outweighs the catch-all
        let text = "12/08/2023, 14:05 - Alice: hello\nAlice: extra generic line";
        assert_eq!(detect(&text).format, ChatFormat::WhatsApp);
    }

    #[test]
    fn test_detect_blank_lines_not_sampled() {
        let text = "\n\n\nAlice: hello\n\n\nBob: hi\n\n";
        let detection = detect(text);
        assert_eq!(detection.format, ChatFormat::Generic);
        // 2 matched of 2 sampled, not of 8 raw lines
        assert!(detection.confidence > 0.5);
    }
}
