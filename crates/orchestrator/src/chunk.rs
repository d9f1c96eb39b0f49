//! Splitting long replies for the channel message-size limit.

/// Marker appended to every chunk except the last.
pub const CONTINUATION_MARKER: &str = "...";

/// Split `text` into sendable pieces.
///
/// Text of at most `max_chars` characters is returned whole. Longer text is
/// cut every `chunk_chars` characters and each non-final piece gets
/// [`CONTINUATION_MARKER`] appended. Lengths count Unicode scalar values, so
/// a code point is never split.
pub fn split_reply(text: &str, max_chars: usize, chunk_chars: usize) -> Vec<String> {
    let total = text.chars().count();
    if total <= max_chars || chunk_chars == 0 {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut chunks: Vec<String> = chars
        .chunks(chunk_chars)
        .map(|piece| piece.iter().collect())
        .collect();

    let last = chunks.len() - 1;
    for chunk in &mut chunks[..last] {
        chunk.push_str(CONTINUATION_MARKER);
    }
    chunks
}
