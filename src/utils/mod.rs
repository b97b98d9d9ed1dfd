//! Utility functions and helpers.

pub mod http;

use unicode_segmentation::UnicodeSegmentation;

/// Shorten text to at most `max` user-perceived characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    format!("{}…", graphemes[..max - 1].concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("Dune", 10), "Dune");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate("JavaScript: The Good Parts", 10), "JavaScrip…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_truncate_counts_graphemes() {
        let text = "e\u{301}".repeat(5);
        assert_eq!(truncate(&text, 5), text);
    }
}
