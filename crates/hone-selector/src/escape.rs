//! CSS identifier escaping.
//!
//! The CSSOM "serialize an identifier" algorithm, used for everything the
//! engine splices into a selector: ids, class names, and quoted attribute
//! values.

use std::fmt::Write;

/// Escaping failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EscapeError {
    /// CSS identifiers cannot contain U+0000 in any form
    #[error("NUL character in CSS identifier")]
    Nul,
}

/// Escape a string so it can be spliced into a CSS selector as an
/// identifier or attribute value. Pure: same input, same output.
pub fn escape_ident(value: &str) -> Result<String, EscapeError> {
    let first = value.chars().next();
    let mut out = String::with_capacity(value.len());

    for (index, c) in value.chars().enumerate() {
        let code = c as u32;
        if code == 0 {
            return Err(EscapeError::Nul);
        }

        let control = (0x0001..=0x001f).contains(&code) || (0x007f..=0x009f).contains(&code);
        let leading_digit = index == 0 && c.is_ascii_digit();
        let digit_after_dash = index == 1 && c.is_ascii_digit() && first == Some('-');

        if control || leading_digit || digit_after_dash {
            // escape as code point, with the terminating space
            let _ = write!(out, "\\{code:x} ");
        } else if index == 1 && c == '-' && first == Some('-') {
            out.push('\\');
            out.push(c);
        } else if code >= 0x0080 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers_pass_through() {
        assert_eq!(escape_ident("submit-btn").unwrap(), "submit-btn");
        assert_eq!(escape_ident("_private").unwrap(), "_private");
        assert_eq!(escape_ident("déjà").unwrap(), "déjà");
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(escape_ident("3d").unwrap(), "\\33 d");
        assert_eq!(escape_ident("99problems").unwrap(), "\\39 9problems");
    }

    #[test]
    fn test_digit_after_leading_dash() {
        assert_eq!(escape_ident("-3").unwrap(), "-\\33 ");
        // position-1 digit is only special when position 0 is a dash
        assert_eq!(escape_ident("a3").unwrap(), "a3");
    }

    #[test]
    fn test_double_dash() {
        assert_eq!(escape_ident("--var").unwrap(), "-\\-var");
        assert_eq!(escape_ident("--3").unwrap(), "-\\-3");
    }

    #[test]
    fn test_specials_are_backslashed() {
        assert_eq!(escape_ident("foo.bar").unwrap(), "foo\\.bar");
        assert_eq!(escape_ident("a b").unwrap(), "a\\ b");
        assert_eq!(escape_ident("x[0]").unwrap(), "x\\[0\\]");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escape_ident("a\u{1}b").unwrap(), "a\\1 b");
        assert_eq!(escape_ident("\u{7f}").unwrap(), "\\7f ");
    }

    #[test]
    fn test_nul_fails() {
        assert_eq!(escape_ident("a\u{0}b"), Err(EscapeError::Nul));
    }
}
