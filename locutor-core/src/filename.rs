//! Deterministic audio filenames derived from row ordinal and source text.
//!
//! The token derivation mirrors the rest of the pipeline's idempotence
//! contract: the same text in the same row always maps to the same path, so
//! a pre-existing file can be detected by name alone.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of the sanitized token, in characters.
pub const MAX_TOKEN_LEN: usize = 50;

/// Extension requested from every backend. Backends that cannot produce it
/// rewrite it and return the real path.
pub const DEFAULT_EXTENSION: &str = "mp3";

static STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static COLLAPSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// Reduce text to a short filesystem-safe token: drop everything outside
/// letters/digits/underscore/whitespace/hyphen, collapse whitespace and
/// hyphen runs to single underscores, truncate to `max_len` characters.
/// Accented letters survive, so "adiós" stays recognizable.
pub fn sanitize_token(text: &str, max_len: usize) -> String {
    let stripped = STRIP.replace_all(text, "");
    let collapsed = COLLAPSE.replace_all(stripped.trim(), "_");
    collapsed.chars().take(max_len).collect()
}

/// Candidate audio path for a row: `<output_dir>/row<N>_<token>.mp3` with a
/// 1-based row ordinal.
pub fn audio_path(output_dir: &Path, row_ordinal: usize, text: &str) -> PathBuf {
    let token = sanitize_token(text, MAX_TOKEN_LEN);
    output_dir.join(format!("row{row_ordinal}_{token}.{DEFAULT_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hola", "hola")]
    #[case("¡Hola, amigo!   ¿Qué tal?", "Hola_amigo_Qué_tal")]
    #[case("buenos días", "buenos_días")]
    #[case("bien - gracias", "bien_gracias")]
    #[case("  adiós  ", "adiós")]
    fn sanitizes_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_token(input, MAX_TOKEN_LEN), expected);
    }

    #[test]
    fn token_contains_only_safe_characters() {
        let token = sanitize_token("¡Hola, amigo!   ¿Qué tal?", MAX_TOKEN_LEN);
        assert!(token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn truncates_to_max_length_on_char_boundary() {
        let long = "días ".repeat(30);
        let token = sanitize_token(&long, MAX_TOKEN_LEN);
        assert_eq!(token.chars().count(), MAX_TOKEN_LEN);
    }

    #[test]
    fn audio_path_uses_one_based_ordinal() {
        let path = audio_path(Path::new("audio_files"), 3, "adiós");
        assert_eq!(path, PathBuf::from("audio_files/row3_adiós.mp3"));
    }
}
