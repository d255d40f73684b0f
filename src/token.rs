//! Splitting source lines into tokens.

use lazy_static::lazy_static;
use regex::Regex;

/// A single normalized token.
pub type Token = String;

// Separators that are dropped entirely. Whitespace is dropped as well.
const SEPARATORS: &str = r#"_.,;\~ˇ\^˘°˛`˙˝¨"'"#;

// ASCII punctuation (minus the separators above); each one becomes its own token.
const SYMBOLS: &str = r#"!#$%\&()*+\-/:<=>?@\[\\\]{|}"#;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(&format!(
        r"[{sym}]|\p{{Lu}}[^\s\p{{Lu}}{sep}{sym}]*|[^\s\p{{Lu}}{sep}{sym}]+",
        sep = SEPARATORS,
        sym = SYMBOLS,
    ))
    .unwrap();
}

/// Splits `text` into lowercased tokens.
///
/// Words are split on whitespace and on the separator characters `_.,;~^'"` (plus a handful of
/// spacing diacritics), which are discarded. A word is also split in front of every uppercase
/// letter, so `HelloWorld` becomes `hello`, `world`. Any other ASCII punctuation forms a token on
/// its own, so `a/=1` becomes `a`, `/`, `=`, `1`.
///
/// Blank input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
