// Utility functions
pub mod sanitize;

/// Case-fold and trim free text before any matching.
pub fn normalize_query(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Length of normalized text in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Onion, Mustard Seeds \n"), "onion, mustard seeds");
        assert_eq!(normalize_query("HI"), "hi");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("dal"), 3);
        assert_eq!(char_len("café"), 4);
        assert_eq!(char_len("जीरा"), 4);
    }
}
