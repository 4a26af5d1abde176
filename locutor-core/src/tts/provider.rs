use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A voice a backend can synthesize with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub language: String,
}

/// Trait for text-to-speech backends.
///
/// Each call is independent; backends hold no per-row state. A successful
/// render produces exactly one audio file and returns its path, which may
/// differ from `destination` when the engine cannot produce the requested
/// container (espeak-ng emits WAV, `say` may leave AIFF behind).
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Short backend name for logs and the run summary.
    fn name(&self) -> &'static str;

    /// Synthesize `text` into an audio file at (or derived from)
    /// `destination`. Returns the path of the file actually written.
    async fn render(&self, text: &str, destination: &Path) -> Result<PathBuf>;

    /// List the Spanish voices this backend can use.
    async fn list_voices(&self) -> Result<Vec<Voice>>;
}
