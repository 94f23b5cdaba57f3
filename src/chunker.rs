//! Windowed chunking of conversations for embedding-based retrieval.
//!
//! A conversation's message list is split into overlapping,
//! length-bounded windows; each window renders to one retrievable text
//! unit ([`Chunk`]) carrying enough metadata to reconstruct provenance.
//! Chunks and [`EmbeddingItem`]s are disposable projections — recomputed
//! on demand, with no persisted identity beyond the deterministic id
//! string `conv_{conversation_id}_chunk_{index}`.
//!
//! # Example
//!
//! ```
//! use convosift::assembler::ConversationAssembler;
//! use convosift::chunker::{ChunkOptions, chunk_conversation};
//! use convosift::conversation::ImportMeta;
//!
//! let assembler = ConversationAssembler::new();
//! let result = assembler.parse("Alice: hello\nBob: hi", None);
//! let conversation = assembler.create_conversation(result, ImportMeta::new());
//!
//! let chunks = chunk_conversation(&conversation, &ChunkOptions::default())?;
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].metadata.total_chunks, 1);
//! # Ok::<(), convosift::ConvosiftError>(())
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::{Conversation, DateRange, participants_in_order};
use crate::error::{ConvosiftError, Result};
use crate::format::ChatFormat;
use crate::message::Message;

/// Default summary length budget in characters.
pub const DEFAULT_SUMMARY_LENGTH: usize = 500;

/// How many participants and sample messages a summary shows at most.
const SUMMARY_SAMPLE_LIMIT: usize = 5;

/// Windowing parameters for [`chunk_conversation`].
///
/// # Example
///
/// ```rust
/// use convosift::chunker::ChunkOptions;
///
/// let options = ChunkOptions::new()
///     .with_messages_per_chunk(10)
///     .with_overlap(2)
///     .with_max_chunk_length(1500);
/// assert_eq!(options.messages_per_chunk, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    /// Messages per window (default 15). Must be at least 1.
    pub messages_per_chunk: usize,
    /// Messages shared between consecutive windows (default 3).
    pub overlap: usize,
    /// Character budget per chunk text (default 2000). A single message
    /// longer than this is never split.
    pub max_chunk_length: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            messages_per_chunk: 15,
            overlap: 3,
            max_chunk_length: 2000,
        }
    }
}

impl ChunkOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window size.
    #[must_use]
    pub fn with_messages_per_chunk(mut self, n: usize) -> Self {
        self.messages_per_chunk = n;
        self
    }

    /// Sets the overlap between consecutive windows.
    #[must_use]
    pub fn with_overlap(mut self, n: usize) -> Self {
        self.overlap = n;
        self
    }

    /// Sets the per-chunk character budget.
    #[must_use]
    pub fn with_max_chunk_length(mut self, n: usize) -> Self {
        self.max_chunk_length = n;
        self
    }
}

/// Inclusive index range into a conversation's message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRange {
    /// Index of the first message in the chunk.
    pub start: usize,
    /// Index of the last message in the chunk.
    pub end: usize,
}

/// Provenance metadata attached to every chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Owning conversation.
    pub conversation_id: Uuid,
    /// Conversation title at chunking time.
    pub conversation_title: String,
    /// Format the conversation was imported from.
    pub source_app: ChatFormat,
    /// All conversation participants.
    pub participants: Vec<String>,
    /// Speakers appearing in this chunk, first-appearance order.
    pub chunk_speakers: Vec<String>,
    /// Position of this chunk in the chunk list.
    pub chunk_index: usize,
    /// Which messages this chunk covers.
    pub message_range: MessageRange,
    /// Timestamp range of the covered messages, if any carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_date_range: Option<DateRange>,
    /// Total chunks produced for the conversation. Identical across all
    /// chunks; backfilled once the full list is known.
    pub total_chunks: usize,
    /// Source channel, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Source workspace, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
}

/// A bounded, possibly overlapping window of conversation messages
/// rendered as one retrievable text unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Deterministic id: `conv_{conversation_id}_chunk_{index}`.
    pub id: String,
    /// The rendered window text.
    pub text: String,
    /// Provenance metadata.
    pub metadata: ChunkMetadata,
}

/// Options for [`embedding_items`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingOptions {
    /// Emit one conversation-level summary item before the chunk items
    /// (default true).
    pub include_full_conversation: bool,
    /// Windowing parameters for the chunk items.
    pub chunk_options: ChunkOptions,
    /// Character budget for the summary item text.
    pub summary_max_length: usize,
}

impl Default for EmbeddingOptions {
    fn default() -> Self {
        Self {
            include_full_conversation: true,
            chunk_options: ChunkOptions::default(),
            summary_max_length: DEFAULT_SUMMARY_LENGTH,
        }
    }
}

impl EmbeddingOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the conversation-level summary item is emitted.
    #[must_use]
    pub fn with_full_conversation(mut self, include: bool) -> Self {
        self.include_full_conversation = include;
        self
    }

    /// Sets the windowing parameters.
    #[must_use]
    pub fn with_chunk_options(mut self, options: ChunkOptions) -> Self {
        self.chunk_options = options;
        self
    }
}

/// Payload handed to the vector-embedding collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    /// Owning conversation.
    pub conversation_id: Uuid,
    /// `true` for the conversation-level summary item.
    pub is_summary: bool,
    /// Chunk provenance; absent on the summary item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<ChunkMetadata>,
}

/// One retrieval-ready record: a summary or a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingItem {
    /// Summary or chunk id.
    pub id: String,
    /// Record type; always `"conversation"`.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Text to embed.
    pub text: String,
    /// Provenance payload.
    pub data: EmbeddingData,
}

/// Renders one message as a chunk line.
///
/// `[{timestamp to the minute}] {speaker}: {text}`, with the bracketed
/// segment omitted for messages without a timestamp.
fn render_message(msg: &Message) -> String {
    match msg.ts {
        Some(ts) => format!("[{}] {}: {}", ts.format("%Y-%m-%dT%H:%M"), msg.speaker, msg.text),
        None => format!("{}: {}", msg.speaker, msg.text),
    }
}

/// Splits a conversation into overlapping, length-bounded chunks.
///
/// A window of `messages_per_chunk` messages slides from index 0,
/// advancing `max(1, messages_per_chunk - overlap)` per step. Windows
/// whose rendered text exceeds `max_chunk_length` are rebuilt from the
/// window start, accepting messages while they fit — though the first
/// `overlap + 1` are always kept, so a truncated chunk still carries the
/// overlap's worth of context, and a single message is never split. A
/// tail of `overlap` or fewer remaining messages is already covered by
/// the previous window and does not become a redundant final chunk.
///
/// `total_chunks` is only known once the list is complete and is
/// backfilled in a second pass.
///
/// # Errors
///
/// Returns [`ConvosiftError::ChunkConfig`] when
/// `options.messages_per_chunk` is zero. Malformed conversations cannot
/// occur: an empty message list yields an empty chunk list.
pub fn chunk_conversation(
    conversation: &Conversation,
    options: &ChunkOptions,
) -> Result<Vec<Chunk>> {
    if options.messages_per_chunk == 0 {
        return Err(ConvosiftError::chunk_config(0));
    }

    let messages = &conversation.messages;
    let mut chunks: Vec<Chunk> = Vec::new();
    let step = std::cmp::max(1, options.messages_per_chunk - options.overlap.min(options.messages_per_chunk));

    let mut start = 0;
    while start < messages.len() {
        let window_end = std::cmp::min(start + options.messages_per_chunk, messages.len());
        let window = &messages[start..window_end];
        let rendered: Vec<String> = window.iter().map(render_message).collect();

        let mut used = window.len();
        let mut text = rendered.join("\n");

        if text.chars().count() > options.max_chunk_length && window.len() > options.overlap + 1 {
            // Rebuild from the window start, keeping at least overlap+1
            // messages before the length cutoff may stop acceptance
            let mut accepted = 0;
            let mut running = 0;
            for line in &rendered {
                let line_len = line.chars().count();
                if accepted > options.overlap
                    && running + line_len + 1 > options.max_chunk_length
                {
                    break;
                }
                running += line_len + 1;
                accepted += 1;
            }
            used = accepted;
            text = rendered[..used].join("\n");
        }

        let covered = &window[..used];
        let chunk_index = chunks.len();
        chunks.push(Chunk {
            id: format!("conv_{}_chunk_{}", conversation.id, chunk_index),
            text,
            metadata: ChunkMetadata {
                conversation_id: conversation.id,
                conversation_title: conversation.title.clone(),
                source_app: conversation.source_app,
                participants: conversation.participants.clone(),
                chunk_speakers: participants_in_order(covered),
                chunk_index,
                message_range: MessageRange {
                    start,
                    end: start + used - 1,
                },
                chunk_date_range: DateRange::of(covered),
                total_chunks: 0, // backfilled below
                channel_name: conversation.channel_name.clone(),
                workspace_name: conversation.workspace_name.clone(),
            },
        });

        start += step;
        // The tail is already inside the previous window's overlap
        if messages.len().saturating_sub(start) <= options.overlap {
            break;
        }
    }

    let total = chunks.len();
    for chunk in &mut chunks {
        chunk.metadata.total_chunks = total;
    }

    Ok(chunks)
}

/// Builds a line-oriented conversation summary bounded to `max_length`
/// characters.
///
/// Title, source, optional channel, up to 5 participants (with a
/// trailing ellipsis marker when more exist), optional date range, and
/// the message count, followed by up to 5 sample messages appended only
/// while the running text stays under the budget. The final string is
/// hard-truncated to `max_length` characters regardless.
pub fn conversation_summary(conversation: &Conversation, max_length: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("Conversation: {}", conversation.title));
    lines.push(format!("Source: {}", conversation.source_app));
    if let Some(channel) = &conversation.channel_name {
        lines.push(format!("Channel: {channel}"));
    }
    if !conversation.participants.is_empty() {
        let mut names = conversation
            .participants
            .iter()
            .take(SUMMARY_SAMPLE_LIMIT)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if conversation.participants.len() > SUMMARY_SAMPLE_LIMIT {
            names.push_str(", ...");
        }
        lines.push(format!("Participants: {names}"));
    }
    if let Some(range) = conversation.date_range {
        lines.push(format!(
            "Date range: {} to {}",
            range.first.format("%Y-%m-%d"),
            range.last.format("%Y-%m-%d")
        ));
    }
    lines.push(format!("Messages: {}", conversation.message_count));

    let mut summary = lines.join("\n");
    for msg in conversation.messages.iter().take(SUMMARY_SAMPLE_LIMIT) {
        if summary.chars().count() >= max_length {
            break;
        }
        summary.push('\n');
        summary.push_str(&render_message(msg));
    }

    if summary.chars().count() > max_length {
        summary.chars().take(max_length).collect()
    } else {
        summary
    }
}

/// Produces the retrieval-ready item list for a batch of conversations.
///
/// Per conversation: one optional summary item
/// (`data.is_summary = true`), then one item per chunk, preserving input
/// conversation order and chunk order.
///
/// # Errors
///
/// Propagates [`ConvosiftError::ChunkConfig`] from
/// [`chunk_conversation`].
pub fn embedding_items(
    conversations: &[Conversation],
    options: &EmbeddingOptions,
) -> Result<Vec<EmbeddingItem>> {
    let mut items = Vec::new();

    for conversation in conversations {
        let chunks = chunk_conversation(conversation, &options.chunk_options)?;

        if options.include_full_conversation {
            items.push(EmbeddingItem {
                id: format!("conv_{}_summary", conversation.id),
                item_type: "conversation".to_string(),
                text: conversation_summary(conversation, options.summary_max_length),
                data: EmbeddingData {
                    conversation_id: conversation.id,
                    is_summary: true,
                    chunk: None,
                },
            });
        }

        for chunk in chunks {
            items.push(EmbeddingItem {
                id: chunk.id,
                item_type: "conversation".to_string(),
                text: chunk.text,
                data: EmbeddingData {
                    conversation_id: conversation.id,
                    is_summary: false,
                    chunk: Some(chunk.metadata),
                },
            });
        }
    }

    Ok(items)
}
