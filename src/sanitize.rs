//! Cleanup of candidate sources that arrive wrapped in Markdown.

/// Return the body of the first fenced code block in `text`, or `text` unchanged when it has none.
///
/// An opening fence may carry an info string (```` ```java ````). An unclosed fence runs to the end of the text.
pub fn strip_code_fences(text: &str) -> &str {
    let Some(open) = find_fence(text, 0) else {
        return text;
    };
    let body_start = match text[open..].find('\n') {
        Some(nl) => open + nl + 1,
        None => return "",
    };
    let body_end = find_fence(text, body_start).unwrap_or(text.len());
    text[body_start..body_end].trim_end_matches(['\n', '\r'])
}

/// Byte offset of the next line (at or after `from`) that starts with a fence, ignoring indentation.
fn find_fence(text: &str, from: usize) -> Option<usize> {
    let mut offset = from;
    for line in text[from..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if line.trim_start().starts_with("```") {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}
