use unicode_segmentation::UnicodeSegmentation;

/// Number of extended grapheme clusters in `text`.
///
/// Selection thresholds and typing-effect pacing both count user-perceived
/// characters, not bytes or code points.
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Split `text` into chunks of at most `max_graphemes` clusters each.
///
/// Chunk boundaries always fall on grapheme boundaries, so no chunk ever
/// splits a multi-byte sequence or a combining pair. `max_graphemes` of zero
/// is treated as one. Concatenating the chunks reproduces `text` exactly.
pub fn grapheme_chunks(text: &str, max_graphemes: usize) -> Vec<&str> {
    let step = max_graphemes.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.grapheme_indices(true) {
        if count == step {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
