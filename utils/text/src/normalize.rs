/// Collapse newlines and runs of whitespace into single spaces.
///
/// Streamed fragments carry significant edge whitespace (`"it "` + `"is
/// sunny"` must concatenate to `"it is sunny"`), so a run at either end of
/// the input is preserved as exactly one space rather than trimmed. The
/// collapse is stateless per call; a whitespace run that straddles two
/// fragments therefore survives as one space per fragment.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    if pending_space {
        out.push(' ');
    }
    out
}
