//! Source chat formats recognized by the pipeline.
//!
//! [`ChatFormat`] identifies which grammar a transcript was (or should be)
//! parsed with. Detection produces one of the four real formats; the extra
//! [`Unknown`](ChatFormat::Unknown) variant exists only for the
//! empty-input parse result, where no grammar was ever consulted.
//!
//! # Example
//!
//! ```rust
//! use convosift::format::ChatFormat;
//! use std::str::FromStr;
//!
//! let format = ChatFormat::from_str("whatsapp").unwrap();
//! assert_eq!(format, ChatFormat::WhatsApp);
//!
//! // Aliases are supported
//! let format = ChatFormat::from_str("wa").unwrap();
//! assert_eq!(format, ChatFormat::WhatsApp);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConvosiftError;

/// A transcript format, as pasted or exported by a chat application.
///
/// Detection scores raw text against per-format line patterns and returns
/// one of these variants; parser dispatch selects the matching grammar.
/// The variants are ordered by detection priority: when two formats score
/// identically, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ChatFormat {
    /// WhatsApp text exports (`12/08/2023, 14:05 - Name: text` and variants)
    #[serde(alias = "wa")]
    WhatsApp,

    /// Slack copy-paste or JSON exports
    Slack,

    /// Microsoft Teams copy-paste (`Name  dd/mm/yyyy hh:mm` headers)
    #[serde(alias = "msteams")]
    Teams,

    /// Unlabeled `Speaker: message` text
    Generic,

    /// No format was ever determined (empty input).
    ///
    /// Never produced by detection; only the assembler's empty-input path
    /// yields this.
    Unknown,
}

impl ChatFormat {
    /// Returns the four real formats in detection priority order.
    pub fn all() -> &'static [ChatFormat] {
        &[
            ChatFormat::WhatsApp,
            ChatFormat::Slack,
            ChatFormat::Teams,
            ChatFormat::Generic,
        ]
    }

    /// Returns all accepted format names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["whatsapp", "wa", "slack", "teams", "msteams", "generic"]
    }

    /// Maps [`Unknown`](ChatFormat::Unknown) to
    /// [`Generic`](ChatFormat::Generic), leaving real formats untouched.
    ///
    /// Conversation records admit only the four real formats.
    pub fn or_generic(self) -> ChatFormat {
        match self {
            ChatFormat::Unknown => ChatFormat::Generic,
            other => other,
        }
    }
}

impl std::fmt::Display for ChatFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChatFormat::WhatsApp => "whatsapp",
            ChatFormat::Slack => "slack",
            ChatFormat::Teams => "teams",
            ChatFormat::Generic => "generic",
            ChatFormat::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for ChatFormat {
    type Err = ConvosiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" | "wa" => Ok(ChatFormat::WhatsApp),
            "slack" => Ok(ChatFormat::Slack),
            "teams" | "msteams" => Ok(ChatFormat::Teams),
            "generic" => Ok(ChatFormat::Generic),
            _ => Err(ConvosiftError::unknown_format(
                s,
                "whatsapp, wa, slack, teams, msteams, generic",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_from_str() {
        assert_eq!(
            ChatFormat::from_str("whatsapp").unwrap(),
            ChatFormat::WhatsApp
        );
        assert_eq!(ChatFormat::from_str("wa").unwrap(), ChatFormat::WhatsApp);
        assert_eq!(ChatFormat::from_str("slack").unwrap(), ChatFormat::Slack);
        assert_eq!(ChatFormat::from_str("teams").unwrap(), ChatFormat::Teams);
        assert_eq!(ChatFormat::from_str("msteams").unwrap(), ChatFormat::Teams);
        assert_eq!(
            ChatFormat::from_str("generic").unwrap(),
            ChatFormat::Generic
        );
        assert_eq!(
            ChatFormat::from_str("WhatsApp").unwrap(),
            ChatFormat::WhatsApp
        );
        assert!(ChatFormat::from_str("telegram").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ChatFormat::WhatsApp.to_string(), "whatsapp");
        assert_eq!(ChatFormat::Slack.to_string(), "slack");
        assert_eq!(ChatFormat::Teams.to_string(), "teams");
        assert_eq!(ChatFormat::Generic.to_string(), "generic");
        assert_eq!(ChatFormat::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_format_all() {
        let all = ChatFormat::all();
        assert_eq!(all.len(), 4);
        assert!(!all.contains(&ChatFormat::Unknown));
        // Priority order matters for tie-breaking
        assert_eq!(all[0], ChatFormat::WhatsApp);
        assert_eq!(all[3], ChatFormat::Generic);
    }

    #[test]
    fn test_format_or_generic() {
        assert_eq!(ChatFormat::Unknown.or_generic(), ChatFormat::Generic);
        assert_eq!(ChatFormat::Slack.or_generic(), ChatFormat::Slack);
    }

    #[test]
    fn test_format_serde() {
        let json = serde_json::to_string(&ChatFormat::WhatsApp).unwrap();
        assert_eq!(json, "\"whatsapp\"");

        let parsed: ChatFormat = serde_json::from_str("\"teams\"").unwrap();
        assert_eq!(parsed, ChatFormat::Teams);

        let aliased: ChatFormat = serde_json::from_str("\"wa\"").unwrap();
        assert_eq!(aliased, ChatFormat::WhatsApp);
    }
}
