//! Azure Cognitive Services speech synthesis backend.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::provider::{SpeechBackend, Voice};

/// Castilian Spanish; other regional locales exist (es-MX, es-AR, ...) but
/// synthesis is pinned to one for deterministic output.
const LOCALE: &str = "es-ES";
const VOICE_NAME: &str = "es-ES-ElviraNeural";
const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub subscription_key: String,
    pub region: String,
}

pub struct Azure {
    config: AzureConfig,
    client: Client,
}

impl Azure {
    pub fn new(config: AzureConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn synthesis_url(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.config.region
        )
    }

    fn voices_url(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/voices/list",
            self.config.region
        )
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureVoice {
    short_name: String,
    display_name: String,
    locale: String,
}

#[async_trait]
impl SpeechBackend for Azure {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn render(&self, text: &str, destination: &Path) -> Result<PathBuf> {
        let ssml = format!(
            "<speak version='1.0' xml:lang='{LOCALE}'>\
             <voice xml:lang='{LOCALE}' name='{VOICE_NAME}'>{}</voice>\
             </speak>",
            escape_xml(text)
        );

        let response = self
            .client
            .post(self.synthesis_url())
            .header("Ocp-Apim-Subscription-Key", &self.config.subscription_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(ssml)
            .send()
            .await
            .context("Failed to send request to Azure TTS")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Azure TTS API error {status}: {body}");
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read audio bytes")?;
        std::fs::write(destination, &bytes)
            .with_context(|| format!("Failed to write audio file {destination:?}"))?;

        Ok(destination.to_path_buf())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        let response = self
            .client
            .get(self.voices_url())
            .header("Ocp-Apim-Subscription-Key", &self.config.subscription_key)
            .send()
            .await
            .context("Failed to list voices from Azure")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Azure TTS API error {status}: {body}");
        }

        let voices: Vec<AzureVoice> = response
            .json()
            .await
            .context("Failed to parse voices response")?;

        Ok(voices
            .into_iter()
            .filter(|v| v.locale.starts_with("es"))
            .map(|v| Voice {
                id: v.short_name,
                name: v.display_name,
                language: v.locale,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_xml("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }
}
