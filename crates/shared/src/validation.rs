//! Common validation utilities for user-submitted fields.

/// School levels recognised by the association, youngest first.
pub const SCHOOL_LEVELS: &[&str] = &[
    "CP", "CE1", "CE2", "CM1", "CM2", "6e", "5e", "4e", "3e", "2nde", "1ère", "Terminale",
];

/// Returns the trimmed value when non-empty, `None` otherwise.
///
/// Form fields arrive as empty strings rather than nulls; callers that
/// store optional text use this to normalise them.
pub fn trimmed_non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Validates that an inline signature image is a data URL.
///
/// The canvas widget submits `data:image/png;base64,...`; anything else is
/// discarded rather than stored.
pub fn is_signature_data_url(value: &str) -> bool {
    value.starts_with("data:image")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_non_empty() {
        assert_eq!(trimmed_non_empty("  hello  "), Some("hello"));
        assert_eq!(trimmed_non_empty("hello"), Some("hello"));
        assert_eq!(trimmed_non_empty(""), None);
        assert_eq!(trimmed_non_empty("   "), None);
        assert_eq!(trimmed_non_empty("\t\n"), None);
    }

    #[test]
    fn test_is_signature_data_url() {
        assert!(is_signature_data_url("data:image/png;base64,iVBORw0KGgo="));
        assert!(is_signature_data_url("data:image/jpeg;base64,/9j/4AAQ"));
        assert!(!is_signature_data_url("https://example.com/sig.png"));
        assert!(!is_signature_data_url(""));
    }

    #[test]
    fn test_school_levels_order() {
        assert_eq!(SCHOOL_LEVELS.first(), Some(&"CP"));
        assert_eq!(SCHOOL_LEVELS.last(), Some(&"Terminale"));
        assert_eq!(SCHOOL_LEVELS.len(), 12);
    }
}
