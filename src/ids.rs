//! Identifier generation for messages and conversations.
//!
//! Two id schemes live here, with deliberately different properties:
//!
//! - **Message ids** are content-addressed: a pure hash over
//!   `(speaker, text, timestamp-or-anchor)`, so re-importing the same
//!   transcript reproduces the same ids and downstream stores can
//!   deduplicate at the message level.
//! - **Conversation ids** are random v4 UUIDs behind the
//!   [`UuidGenerator`] capability trait: two imports of the same
//!   transcript are two distinct conversations sharing deduplicable
//!   messages. Tests substitute a deterministic generator.
//!
//! # Example
//!
//! ```
//! use convosift::ids::message_id;
//!
//! let a = message_id("Alice", "hello", "2023-08-12T14:05:00");
//! let b = message_id("Alice", "hello", "2023-08-12T14:05:00");
//! assert_eq!(a, b);
//! assert!(a.starts_with("msg-"));
//! assert_eq!(a.len(), 12);
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generates a deterministic, content-addressed message identifier.
///
/// The three fields are joined with `:` and folded through a 32-bit
/// rolling hash (`hash * 31 + code_unit`, wrapping signed arithmetic over
/// UTF-16 code units, matching Java's `String.hashCode` bit-for-bit —
/// message-id reproducibility across systems depends on the exact numeric
/// behavior, including overflow wraparound). The absolute value is
/// rendered in base-36, left-padded with `'0'` to 8 characters, and
/// prefixed with `msg-`.
///
/// Collisions are an accepted limitation of the 32-bit space; this is not
/// a cryptographic hash.
pub fn message_id(speaker: &str, text: &str, anchor: &str) -> String {
    let seed = format!("{speaker}:{text}:{anchor}");

    let mut hash: i32 = 0;
    for unit in seed.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }

    let encoded = to_base36(u64::from(hash.unsigned_abs()));
    format!("msg-{encoded:0>8}")
}

/// Renders the canonical anchor string for a timestamped message.
///
/// Zero-padded `YYYY-MM-DDTHH:MM:SS`, so equal timestamps always yield
/// equal anchors. Messages without a timestamp use a `line-{n}` anchor
/// from [`MessageMeta::original_line`](crate::message::MessageMeta)
/// instead.
pub fn timestamp_anchor(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let d = (value % 36) as u32;
        digits.push(char::from_digit(d, 36).unwrap());
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Capability for generating conversation-level UUIDs.
///
/// Production code uses [`RandomUuidGenerator`]; tests inject a
/// deterministic implementation so conversation records are stable.
pub trait UuidGenerator: Send + Sync {
    /// Returns the next UUID.
    fn generate(&self) -> Uuid;
}

/// The production [`UuidGenerator`]: random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuidGenerator;

impl UuidGenerator for RandomUuidGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}
