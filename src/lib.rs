//! # Convosift
//!
//! A Rust library for turning pasted or exported chat transcripts into
//! normalized, attributed conversations and retrieval-ready chunks.
//!
//! ## Overview
//!
//! Convosift handles the messy middle of chat ingestion:
//! - **Detection** — classifies free-form text as WhatsApp, Slack, Teams,
//!   or generic `Speaker: message` dumps by heuristic line scoring, since
//!   pasted text carries no file extension or format marker.
//! - **Parsing** — four stateful line parsers turn each grammar
//!   (continuation lines, system notices, timestamps in several
//!   encodings) into one normalized [`Message`] sequence, degrading to
//!   warnings instead of errors on malformed input.
//! - **Assembly** — [`assembler::ConversationAssembler`] builds the
//!   immutable [`conversation::Conversation`] record with aggregate
//!   stats, reproducible message ids, and a fresh conversation UUID per
//!   import.
//! - **Chunking** — [`chunker`] slides overlapping, length-bounded
//!   windows over a conversation and emits summary and chunk records for
//!   an embedding collaborator.
//!
//! Message ids are content-addressed, so re-importing the same
//! transcript deduplicates at the message level downstream.
//!
//! ## Quick Start
//!
//! ```rust
//! use convosift::prelude::*;
//!
//! let assembler = ConversationAssembler::new();
//!
//! let result = assembler.parse("12/08/2023, 14:05 - Alice: hello\nBob joined late", None);
//! assert_eq!(result.format, ChatFormat::WhatsApp);
//!
//! let conversation = assembler.create_conversation(result, ImportMeta::new());
//! let chunks = chunk_conversation(&conversation, &ChunkOptions::default())?;
//! assert_eq!(chunks.len(), 1);
//! # Ok::<(), convosift::ConvosiftError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`assembler`] — **Import entry point**
//!   - [`ConversationAssembler`](assembler::ConversationAssembler),
//!     [`ParseResult`](assembler::ParseResult)
//! - [`detect`] — Heuristic format classification
//!   - [`FormatDetector`](detect::FormatDetector), [`Detection`](detect::Detection)
//! - [`parsers`] — Per-format transcript parsers
//!   - [`WhatsAppParser`](parsers::WhatsAppParser), [`SlackParser`](parsers::SlackParser),
//!     [`TeamsParser`](parsers::TeamsParser), [`GenericParser`](parsers::GenericParser)
//! - [`chunker`] — Retrieval windowing
//!   - [`chunk_conversation`](chunker::chunk_conversation),
//!     [`conversation_summary`](chunker::conversation_summary),
//!     [`embedding_items`](chunker::embedding_items)
//! - [`ids`] — Content-addressed message ids, UUID capability
//! - [`message`], [`conversation`], [`format`] — Data model
//! - [`error`] — Unified error types ([`ConvosiftError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

pub mod assembler;
pub mod chunker;
pub mod conversation;
pub mod detect;
pub mod error;
pub mod format;
pub mod ids;
pub mod message;
pub mod parsers;

// Re-export the main types at the crate root for convenience
pub use error::{ConvosiftError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use convosift::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::Message;

    // Error types
    pub use crate::error::{ConvosiftError, Result};

    // Data model
    pub use crate::conversation::{Conversation, ConversationStats, DateRange, ImportMeta};
    pub use crate::format::ChatFormat;
    pub use crate::message::{AttachmentKind, AttachmentRef, MessageMeta};

    // Detection
    pub use crate::detect::{Detection, FormatDetector};

    // Parsing
    pub use crate::parsers::{
        GenericParser, ParseOutput, SlackParser, TeamsParser, TranscriptParser, WhatsAppParser,
        create_parser,
    };

    // Assembly
    pub use crate::assembler::{ConversationAssembler, ParseResult};

    // Chunking
    pub use crate::chunker::{
        Chunk, ChunkMetadata, ChunkOptions, EmbeddingItem, EmbeddingOptions, chunk_conversation,
        conversation_summary, embedding_items,
    };

    // Id generation
    pub use crate::ids::{RandomUuidGenerator, UuidGenerator, message_id};
}
