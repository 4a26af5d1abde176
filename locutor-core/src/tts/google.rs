//! Google Translate text-to-speech backend (free tier, network required).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::provider::{SpeechBackend, Voice};

const ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Spanish dialect tags the endpoint accepts.
const DIALECTS: &[(&str, &str)] = &[
    ("es", "Spanish (Spain)"),
    ("es-MX", "Spanish (Mexico)"),
    ("es-AR", "Spanish (Argentina)"),
    ("es-CO", "Spanish (Colombia)"),
];

pub struct GoogleTranslate {
    client: Client,
    lang: String,
}

impl GoogleTranslate {
    pub fn new(lang: String) -> Self {
        Self {
            client: Client::new(),
            lang,
        }
    }
}

#[async_trait]
impl SpeechBackend for GoogleTranslate {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn render(&self, text: &str, destination: &Path) -> Result<PathBuf> {
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", text),
            ])
            .send()
            .await
            .context("Failed to send request to Google Translate TTS")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Google Translate TTS error {status}");
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
        Ok(DIALECTS
            .iter()
            .map(|(tag, name)| Voice {
                id: tag.to_string(),
                name: name.to_string(),
                language: tag.to_string(),
            })
            .collect())
    }
}
