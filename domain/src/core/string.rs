//! String helpers for displaying agent output in logs and consoles.

/// Collapse all whitespace runs (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_len` bytes, appending `...` when shortened.
///
/// Never splits a UTF-8 character.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let budget = max_len.saturating_sub(3);
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= budget)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..end])
}

/// Shorten LLM output for a one-line log or progress message.
pub fn preview(s: &str, max_len: usize) -> String {
    truncate(&single_line(s), max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_unchanged() {
        assert_eq!(truncate("minimize cost", 20), "minimize cost");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("minimize total cost", 11), "minimize...");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 'é' is 2 bytes; a budget of 3 would land inside the second one
        assert_eq!(truncate("éééé", 7), "éé...");
        assert_eq!(truncate("éééé", 6), "é...");
        assert_eq!(truncate("ééé", 6), "ééé");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\n  b\tc  "), "a b c");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("line one\nline two", 12), "line one ...");
    }
}
