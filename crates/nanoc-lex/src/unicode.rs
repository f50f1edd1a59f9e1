//! Character classification for identifiers.
//!
//! The language is ASCII-only, so these are plain byte-range checks rather
//! than a Unicode identifier table.

/// Whether `c` can start an identifier: a letter or underscore.
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether `c` can continue an identifier: alphanumeric or underscore.
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_cannot_start_identifiers() {
        assert!(!is_ident_start('5'));
        assert!(is_ident_start('_'));
        assert!(is_ident_start('x'));
    }

    #[test]
    fn continue_allows_digits() {
        assert!(is_ident_continue('5'));
        assert!(is_ident_continue('_'));
    }
}
