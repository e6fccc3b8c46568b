//! Display name acceptance.
//!
//! Gates both directory-provided names and manually typed fallbacks before a
//! row is built. A name must carry two whitespace-separated tokens, and at
//! least one of the first two must have `MIN_TOKEN_CHARS` characters. Initials
//! and separators such as `|` may sit next to a full token.

use crate::model::entry::EntryValidationError;

const MIN_TOKEN_CHARS: usize = 2;

/// Returns whether `candidate` is structurally acceptable as a display name.
pub fn is_acceptable(candidate: &str) -> bool {
    let mut tokens = candidate.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(first), Some(second)) => {
            first.chars().count() >= MIN_TOKEN_CHARS || second.chars().count() >= MIN_TOKEN_CHARS
        }
        _ => false,
    }
}

/// Returns the trimmed candidate when acceptable.
pub fn accept_display_name(candidate: &str) -> Result<String, EntryValidationError> {
    let trimmed = candidate.trim();
    if !is_acceptable(trimmed) {
        return Err(EntryValidationError::NameUnacceptable(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{accept_display_name, is_acceptable};

    #[test]
    fn acceptance_boundaries() {
        assert!(is_acceptable("Ann Li"));
        assert!(!is_acceptable("Ann"));
        assert!(!is_acceptable(""));
        assert!(!is_acceptable("   "));
        assert!(!is_acceptable("A B"));
        assert!(is_acceptable("A Bee"));
        assert!(is_acceptable("Jane | Doe"));
        assert!(is_acceptable(" John  Doe "));
    }

    #[test]
    fn accepted_name_is_trimmed_only() {
        assert_eq!(
            accept_display_name(" John  Doe ").expect("acceptable"),
            "John  Doe"
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(is_acceptable("Zoë Åh"));
        assert!(!is_acceptable("É Ö"));
    }
}
