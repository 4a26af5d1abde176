//! Offline espeak-ng backend.
//!
//! Voice selection scans the installed voice list for a Spanish marker in
//! the language code or voice name and falls back to the engine default when
//! nothing matches. Output is always WAV, so the destination extension is
//! rewritten.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::find_in_path;
use super::provider::{SpeechBackend, Voice};

pub struct Espeak {
    bin: PathBuf,
    voice: Option<String>,
    rate_wpm: u32,
    volume: f32,
}

impl Espeak {
    /// Locate the engine binary and pick a Spanish voice once, up front.
    pub async fn new(rate_wpm: u32, volume: f32) -> Result<Self> {
        let bin = find_in_path("espeak-ng")
            .or_else(|| find_in_path("espeak"))
            .context("espeak-ng not found on PATH")?;

        let voices = installed_voices(&bin).await?;
        let voice = voices
            .iter()
            .find(|v| is_spanish(v))
            .map(|v| v.id.clone());
        match &voice {
            Some(id) => info!("Selected espeak voice '{id}'"),
            None => info!("No Spanish espeak voice installed, using engine default"),
        }

        Ok(Self {
            bin,
            voice,
            rate_wpm,
            volume,
        })
    }
}

fn is_spanish(voice: &Voice) -> bool {
    voice.language.starts_with("es") || voice.name.to_lowercase().contains("spanish")
}

/// Parse `espeak-ng --voices` output. Columns after the header line are
/// `Pty Language Age/Gender VoiceName File Other Languages`.
async fn installed_voices(bin: &Path) -> Result<Vec<Voice>> {
    let output = Command::new(bin)
        .arg("--voices")
        .output()
        .await
        .context("Failed to run espeak-ng --voices")?;
    if !output.status.success() {
        anyhow::bail!(
            "espeak-ng --voices failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let voices = stdout
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let language = fields.get(1)?;
            let name = fields.get(3)?;
            Some(Voice {
                id: language.to_string(),
                name: name.to_string(),
                language: language.to_string(),
            })
        })
        .collect();
    Ok(voices)
}

#[async_trait]
impl SpeechBackend for Espeak {
    fn name(&self) -> &'static str {
        "espeak"
    }

    async fn render(&self, text: &str, destination: &Path) -> Result<PathBuf> {
        // The engine only writes WAV.
        let out = destination.with_extension("wav");

        let amplitude = (self.volume.clamp(0.0, 1.0) * 200.0).round() as u32;
        let mut cmd = Command::new(&self.bin);
        if let Some(voice) = &self.voice {
            cmd.arg("-v").arg(voice);
        }
        cmd.arg("-s")
            .arg(self.rate_wpm.to_string())
            .arg("-a")
            .arg(amplitude.to_string())
            .arg("-w")
            .arg(&out)
            .arg(text);

        debug!(command = ?cmd, "Running espeak-ng");
        let output = cmd.output().await.context("Failed to run espeak-ng")?;
        if !output.status.success() {
            anyhow::bail!(
                "espeak-ng failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(out)
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        let voices = installed_voices(&self.bin).await?;
        Ok(voices.into_iter().filter(is_spanish).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_detection_matches_language_prefix_and_name() {
        let by_lang = Voice {
            id: "es-419".to_string(),
            name: "Latin_American".to_string(),
            language: "es-419".to_string(),
        };
        let by_name = Voice {
            id: "x".to_string(),
            name: "Spanish_Castilian".to_string(),
            language: "other".to_string(),
        };
        let neither = Voice {
            id: "en".to_string(),
            name: "English".to_string(),
            language: "en-GB".to_string(),
        };
        assert!(is_spanish(&by_lang));
        assert!(is_spanish(&by_name));
        assert!(!is_spanish(&neither));
    }
}
