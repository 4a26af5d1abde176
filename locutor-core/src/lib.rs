pub mod config;
pub mod error;
pub mod filename;
pub mod pipeline;
pub mod sheet;
pub mod tts;

pub use config::{BackendConfig, ColumnRef, RunConfig};
pub use error::ConfigError;
pub use pipeline::{RunReport, AUDIO_COLUMN_SUFFIX, FAILURE_SENTINEL};
pub use tts::{build_backend, SpeechBackend, Voice};
