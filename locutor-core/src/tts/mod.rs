//! Text-to-speech backends.
//!
//! One backend is selected per run from [`BackendConfig`]; all four satisfy
//! the same [`SpeechBackend`] contract and are interchangeable from the
//! pipeline's point of view.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::BackendConfig;

pub mod azure;
pub mod espeak;
pub mod google;
pub mod provider;
pub mod say;

pub use provider::{SpeechBackend, Voice};

/// Construct the configured backend. Platform and credential problems
/// surface here, before any row is processed.
pub async fn build_backend(config: &BackendConfig) -> Result<Box<dyn SpeechBackend>> {
    let backend: Box<dyn SpeechBackend> = match config {
        BackendConfig::Google { lang } => Box::new(google::GoogleTranslate::new(lang.clone())),
        BackendConfig::Espeak { rate_wpm, volume } => {
            Box::new(espeak::Espeak::new(*rate_wpm, *volume).await?)
        }
        BackendConfig::Say { voice, rate_wpm } => {
            Box::new(say::MacosSay::new(voice.clone(), *rate_wpm)?)
        }
        BackendConfig::Azure {
            subscription_key,
            region,
        } => Box::new(azure::Azure::new(azure::AzureConfig {
            subscription_key: subscription_key.clone(),
            region: region.clone(),
        })),
    };
    Ok(backend)
}

/// Search PATH for an executable, portably.
pub(crate) fn find_in_path(bin: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|candidate| candidate.is_file())
}
