//! Response chunker. Splits feedback text into pieces that fit under the
//! platform's per-message ceiling, preferring newline boundaries.

/// Default split length. Leaves headroom for the platform ceiling on the
/// raw text only; relayed chunks are further capped by
/// [`max_wrapped_chunk_chars`].
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 1990;

/// Discord rejects message content longer than this.
pub const MESSAGE_CHAR_LIMIT: usize = 2000;

pub const FEEDBACK_PREFIX: &str = "📄 **Resume Feedback:**\n";

const CODE_FENCE: &str = "```";

/// Longest chunk whose [`Chunk::to_message`] rendering still fits in
/// [`MESSAGE_CHAR_LIMIT`].
pub fn max_wrapped_chunk_chars() -> usize {
    MESSAGE_CHAR_LIMIT - FEEDBACK_PREFIX.chars().count() - 2 * CODE_FENCE.len()
}

/// A contiguous slice of the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub text: &'a str,
    /// Byte offset of `text` within the original string.
    pub offset: usize,
}

impl Chunk<'_> {
    /// Renders the chunk as a feedback message body.
    pub fn to_message(&self) -> String {
        format!("{FEEDBACK_PREFIX}{CODE_FENCE}{}{CODE_FENCE}", self.text)
    }
}

/// Splits `text` into chunks of at most `max_chars` characters.
///
/// While the remainder is longer than `max_chars`, the cut goes at the last
/// `\n` before the boundary, or exactly at the boundary when there is none.
/// Whitespace around each cut is dropped from the following remainder.
/// Always returns at least one chunk. A `max_chars` of 0 is treated as 1.
pub fn split_message(text: &str, max_chars: usize) -> Vec<Chunk<'_>> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    // byte index of the first character past the limit; None once `rest` fits
    while let Some((boundary, _)) = rest.char_indices().nth(max_chars) {
        let cut = rest[..boundary].rfind('\n').unwrap_or(boundary);
        chunks.push(Chunk {
            text: &rest[..cut],
            offset,
        });

        let after = &rest[cut..];
        let trimmed = after.trim_start();
        offset += cut + (after.len() - trimmed.len());
        rest = trimmed.trim_end();
    }

    chunks.push(Chunk { text: rest, offset });
    chunks
}
