//! Identifier validation.
//!
//! An identifier is `[A-Za-z_][A-Za-z0-9_]*`. The tokenizer's word rule is
//! deliberately wider than this, and anything it consumes that fails here
//! is highlighted as invalid instead of being silently accepted.

/// Returns true if `text` is a well-formed identifier.
pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for name in ["x", "_", "_tmp", "total2", "MAX_VALUE", "camelCase"] {
            assert!(is_valid_identifier(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for name in ["", "2x", "9", "café", "a-b", "n²", "has space"] {
            assert!(!is_valid_identifier(name), "{name:?} should be invalid");
        }
    }
}
