mod normalize;
mod segment;

pub use normalize::normalize_whitespace;
pub use segment::grapheme_chunks;
pub use segment::grapheme_len;
