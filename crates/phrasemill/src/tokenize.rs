//! # Line Tokenization
//!
//! Tokenization is a pluggable seam: everything downstream of it accepts
//! any [`LineTokenizer`], so callers can substitute their own splitter
//! without touching the vocabulary or encoding code.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d").expect("digit pattern compilation failed"));

/// A pluggable line tokenizer.
pub trait LineTokenizer {
    /// Split a line into tokens.
    ///
    /// Always total: returns a (possibly empty) token sequence, preserving
    /// the byte content and order of the input fragments.
    fn tokenize<'a>(
        &self,
        line: &'a str,
    ) -> Vec<&'a str>;
}

/// The default tokenizer: split on whitespace, discard empty fragments.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl LineTokenizer for WhitespaceTokenizer {
    fn tokenize<'a>(
        &self,
        line: &'a str,
    ) -> Vec<&'a str> {
        line.split_whitespace().collect()
    }
}

/// Adapter lifting a plain function (or closure) into a [`LineTokenizer`].
#[derive(Debug, Clone, Copy)]
pub struct FnTokenizer<F>(
    /// The wrapped tokenize function.
    pub F,
);

impl<F> LineTokenizer for FnTokenizer<F>
where
    F: for<'a> Fn(&'a str) -> Vec<&'a str>,
{
    fn tokenize<'a>(
        &self,
        line: &'a str,
    ) -> Vec<&'a str> {
        (self.0)(line)
    }
}

/// Replace every digit character in `token` with `'0'`.
///
/// Returns a borrow when the token contains no digits.
pub fn normalize_digits(token: &str) -> Cow<'_, str> {
    DIGIT_RE.replace_all(token, "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tok = WhitespaceTokenizer;
        assert_eq!(tok.tokenize("I have a dog"), vec!["I", "have", "a", "dog"]);
        assert_eq!(tok.tokenize("  padded \t line \n"), vec!["padded", "line"]);
        assert_eq!(tok.tokenize(""), Vec::<&str>::new());
        assert_eq!(tok.tokenize("   "), Vec::<&str>::new());
    }

    #[test]
    fn test_fn_tokenizer() {
        fn comma(line: &str) -> Vec<&str> {
            line.split(',').filter(|s| !s.is_empty()).collect()
        }
        let tok = FnTokenizer(comma);
        assert_eq!(tok.tokenize("a,b,,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_digits() {
        assert_eq!(normalize_digits("1984"), "0000");
        assert_eq!(normalize_digits("b2b"), "b0b");
        assert_eq!(normalize_digits("plain"), "plain");
        assert!(matches!(normalize_digits("plain"), Cow::Borrowed(_)));
    }
}
