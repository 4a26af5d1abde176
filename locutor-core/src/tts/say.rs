//! macOS `say` backend.
//!
//! `say` emits AIFF natively. When the caller asked for another container
//! and ffmpeg is on PATH the AIFF is converted and removed; otherwise the
//! render still succeeds, a warning is logged, and the AIFF path is returned
//! so the caller records the file that really exists.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::find_in_path;
use super::provider::{SpeechBackend, Voice};
use crate::error::ConfigError;

pub struct MacosSay {
    voice: String,
    rate_wpm: u32,
}

impl MacosSay {
    pub fn new(voice: String, rate_wpm: u32) -> Result<Self, ConfigError> {
        if !cfg!(target_os = "macos") {
            return Err(ConfigError::UnsupportedPlatform);
        }
        Ok(Self { voice, rate_wpm })
    }
}

#[async_trait]
impl SpeechBackend for MacosSay {
    fn name(&self) -> &'static str {
        "say"
    }

    async fn render(&self, text: &str, destination: &Path) -> Result<PathBuf> {
        let aiff = destination.with_extension("aiff");

        let mut cmd = Command::new("say");
        cmd.arg("-v")
            .arg(&self.voice)
            .arg("-r")
            .arg(self.rate_wpm.to_string())
            .arg("-o")
            .arg(&aiff)
            .arg(text);
        debug!(command = ?cmd, "Running say");
        let output = cmd.output().await.context("Failed to run say")?;
        if !output.status.success() {
            anyhow::bail!("say failed: {}", String::from_utf8_lossy(&output.stderr));
        }

        if aiff == destination {
            return Ok(aiff);
        }

        let Some(ffmpeg) = find_in_path("ffmpeg") else {
            warn!("ffmpeg not found; keeping AIFF output at {aiff:?}");
            return Ok(aiff);
        };

        let convert = Command::new(ffmpeg)
            .arg("-i")
            .arg(&aiff)
            .arg("-y")
            .arg(destination)
            .output()
            .await
            .context("Failed to run ffmpeg")?;
        if !convert.status.success() {
            warn!(
                "ffmpeg conversion failed, keeping AIFF output at {aiff:?}: {}",
                String::from_utf8_lossy(&convert.stderr)
            );
            return Ok(aiff);
        }

        std::fs::remove_file(&aiff)
            .with_context(|| format!("Failed to remove intermediate file {aiff:?}"))?;
        Ok(destination.to_path_buf())
    }

    /// Parse `say -v ?`, keeping voices with a Spanish locale or description.
    async fn list_voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new("say")
            .arg("-v")
            .arg("?")
            .output()
            .await
            .context("Failed to run say -v ?")?;
        if !output.status.success() {
            anyhow::bail!(
                "say -v ? failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().filter_map(parse_voice_line).collect())
    }
}

/// Lines look like `Monica    es_ES    # ¡Hola! Me llamo Monica.`; voice
/// names may themselves contain spaces, so split at the locale token.
fn parse_voice_line(line: &str) -> Option<Voice> {
    if !(line.contains("es_") || line.to_lowercase().contains("spanish")) {
        return None;
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let locale_pos = tokens
        .iter()
        .position(|t| t.contains('_') && t.len() >= 4)?;
    let name = tokens[..locale_pos].join(" ");
    if name.is_empty() {
        return None;
    }
    Some(Voice {
        id: name.clone(),
        name,
        language: tokens[locale_pos].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spanish_voice_lines() {
        let voice = parse_voice_line("Monica              es_ES    # ¡Hola! Me llamo Monica.")
            .unwrap();
        assert_eq!(voice.name, "Monica");
        assert_eq!(voice.language, "es_ES");
    }

    #[test]
    fn skips_non_spanish_lines() {
        assert!(parse_voice_line("Alex                en_US    # Hello, my name is Alex.")
            .is_none());
    }

    #[test]
    fn keeps_multi_word_voice_names() {
        let voice =
            parse_voice_line("Juan Enhanced       es_MX    # ¡Hola! Me llamo Juan.").unwrap();
        assert_eq!(voice.name, "Juan Enhanced");
        assert_eq!(voice.language, "es_MX");
    }
}
