//! Shared utility functions used across multiple modules.

/// Trim text and map blank input to `None`.
pub fn normalize_text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Normalize optional text by trimming whitespace and removing empties.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    normalize_text(&value?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_trims_value() {
        assert_eq!(normalize_text("  coffee \n"), Some("coffee".to_string()));
    }
}
