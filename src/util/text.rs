use unicode_segmentation::UnicodeSegmentation;

/// Byte offset of the codepoint at `char_idx`. Clamps to the end of the string.
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

/// Number of codepoints in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `s` at a codepoint offset into (before, after).
pub fn split_at_char(s: &str, char_idx: usize) -> (&str, &str) {
    s.split_at(char_to_byte(s, char_idx))
}

/// Insert `insert` at a codepoint offset, returning the new string.
pub fn insert_at(s: &str, char_idx: usize, insert: &str) -> String {
    let (before, after) = split_at_char(s, char_idx);
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(before);
    out.push_str(insert);
    out.push_str(after);
    out
}

/// Remove the codepoint immediately before `char_idx` (backspace).
/// Returns the new string and the new caret offset.
pub fn remove_before(s: &str, char_idx: usize) -> (String, usize) {
    if char_idx == 0 {
        return (s.to_string(), 0);
    }
    let start = char_to_byte(s, char_idx - 1);
    let end = char_to_byte(s, char_idx);
    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..start]);
    out.push_str(&s[end..]);
    (out, char_idx - 1)
}

/// Codepoint offset of the start of the word before `char_idx`.
pub fn prev_word_start(s: &str, char_idx: usize) -> usize {
    let byte_idx = char_to_byte(s, char_idx);
    let mut best = 0;
    for (start, word) in s.split_word_bound_indices() {
        if start >= byte_idx {
            break;
        }
        if !word.trim().is_empty() {
            best = start;
        }
    }
    s[..best].chars().count()
}

/// Codepoint offset just past the end of the word after `char_idx`.
pub fn next_word_end(s: &str, char_idx: usize) -> usize {
    let byte_idx = char_to_byte(s, char_idx);
    for (start, word) in s.split_word_bound_indices() {
        let end = start + word.len();
        if end > byte_idx && !word.trim().is_empty() {
            return s[..end].chars().count();
        }
    }
    char_len(s)
}
