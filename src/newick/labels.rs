//! Label escaping and unescaping for Newick strings.
//!
//! On output, labels containing `_` or one of `( ) , : ; [ ] '` are wrapped in
//! single quotes, with inner quotes doubled and whitespace written as spaces.
//! In all other labels whitespace becomes `_`.
//! On input, quoted labels are taken literally (apart from doubled quotes) and
//! underscores in unquoted labels are read back as spaces, so every label
//! without line breaks or tabs survives a round trip.

use crate::newick::defs::NEWICK_RESERVED_CHARS;
use std::borrow::Cow;

/// Sanitizes a taxon label for use in a Newick string.
///
/// # Examples
/// ```
/// use phylodist::newick::sanitize_label;
///
/// assert_eq!(sanitize_label("Pukeko"), "Pukeko");
/// assert_eq!(sanitize_label("Australasian Swamphen"), "Australasian_Swamphen");
/// assert_eq!(sanitize_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(sanitize_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(sanitize_label("Porphyrio_melanotus"), "'Porphyrio_melanotus'");
/// ```
pub fn sanitize_label(label: &str) -> Cow<'_, str> {
    let needs_quotes = label.chars().any(|c| c == '_' || NEWICK_RESERVED_CHARS.contains(&c));
    let replacement = if needs_quotes { ' ' } else { '_' };

    let mut sanitized: Cow<'_, str> = if label.chars().any(char::is_whitespace) {
        Cow::Owned(
            label
                .chars()
                .map(|c| if c.is_whitespace() { replacement } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(label)
    };

    if needs_quotes {
        sanitized = Cow::Owned(format!("'{}'", sanitized.replace('\'', "''")));
    }
    sanitized
}

/// Converts an unquoted Newick label back to a taxon label.
pub(crate) fn unescape_unquoted(label: &str) -> String {
    label.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_label_is_borrowed() {
        assert!(matches!(sanitize_label("Takahe"), Cow::Borrowed("Takahe")));
    }

    #[test]
    fn test_tabs_and_newlines_become_underscores() {
        assert_eq!(sanitize_label("a\tb\nc"), "a_b_c");
    }

    #[test]
    fn test_reserved_chars_quote() {
        assert_eq!(sanitize_label("x:y"), "'x:y'");
        assert_eq!(sanitize_label("(a, b)"), "'(a, b)'");
        assert_eq!(sanitize_label("semi;colon"), "'semi;colon'");
    }

    #[test]
    fn test_underscores_quote() {
        assert_eq!(sanitize_label("A_1"), "'A_1'");
        assert_eq!(sanitize_label("x_y z\tw"), "'x_y z w'");
    }

    #[test]
    fn test_unescape_unquoted() {
        assert_eq!(unescape_unquoted("Australasian_Swamphen"), "Australasian Swamphen");
    }
}
