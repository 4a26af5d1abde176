use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sheet::table::Table;

/// Reference to the spreadsheet column holding the source text. Parsed once
/// from user input: an all-digit string is a zero-based ordinal, anything
/// else a literal column name.
///
/// Known limitation: a column whose name consists only of digits cannot be
/// addressed by name under this rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl FromStr for ColumnRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<usize>() {
            Ok(index) => Ok(ColumnRef::Index(index)),
            Err(_) => Ok(ColumnRef::Name(s.to_string())),
        }
    }
}

impl ColumnRef {
    /// Resolve this reference against a table's column list.
    pub fn resolve(&self, table: &Table) -> Result<usize, ConfigError> {
        match self {
            ColumnRef::Index(index) => {
                let count = table.columns().len();
                if *index < count {
                    Ok(*index)
                } else {
                    Err(ConfigError::ColumnIndexOutOfRange {
                        index: *index,
                        count,
                    })
                }
            }
            ColumnRef::Name(name) => table
                .column_index(name)
                .ok_or_else(|| ConfigError::ColumnNotFound(name.clone())),
        }
    }
}

/// Backend selection plus per-backend settings. Deserialized with a type tag
/// so profiles on disk stay readable; the pipeline never dispatches on
/// strings, only on this enum, once, at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Google Translate TTS, free tier. Requires network reachability.
    Google {
        /// Spanish dialect tag, e.g. "es", "es-MX", "es-AR".
        #[serde(default = "default_lang")]
        lang: String,
    },
    /// Local espeak-ng engine. Picks a Spanish-flagged installed voice when
    /// one exists, otherwise the engine default.
    Espeak {
        /// Speaking rate in words per minute.
        #[serde(default = "default_espeak_rate")]
        rate_wpm: u32,
        /// Volume, 0.0 to 1.0.
        #[serde(default = "default_espeak_volume")]
        volume: f32,
    },
    /// macOS `say` utility. Only constructible on macOS.
    Say {
        #[serde(default = "default_say_voice")]
        voice: String,
        #[serde(default = "default_say_rate")]
        rate_wpm: u32,
    },
    /// Azure Cognitive Services speech synthesis.
    Azure {
        subscription_key: String,
        region: String,
    },
}

fn default_lang() -> String {
    "es".to_string()
}

fn default_espeak_rate() -> u32 {
    150
}

fn default_espeak_volume() -> f32 {
    0.9
}

fn default_say_voice() -> String {
    "Monica".to_string()
}

fn default_say_rate() -> u32 {
    200
}

/// Immutable configuration for one conversion run, built once from parsed
/// arguments and passed by reference everywhere it is needed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the input spreadsheet (.csv, .xlsx or .xls).
    pub input: PathBuf,
    /// Which column holds the source Spanish text.
    pub column: ColumnRef,
    /// Directory that receives the generated audio files.
    pub output_dir: PathBuf,
    /// Whether to save the augmented spreadsheet next to the input.
    pub save_spreadsheet: bool,
    /// Selected synthesis backend.
    pub backend: BackendConfig,
}

impl RunConfig {
    pub fn new(input: PathBuf, backend: BackendConfig) -> Self {
        Self {
            input,
            column: ColumnRef::Index(0),
            output_dir: PathBuf::from("audio_files"),
            save_spreadsheet: true,
            backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_parse_as_ordinal() {
        let r: ColumnRef = "0".parse().unwrap();
        assert_eq!(r, ColumnRef::Index(0));
        let r: ColumnRef = "12".parse().unwrap();
        assert_eq!(r, ColumnRef::Index(12));
    }

    #[test]
    fn non_digits_parse_as_name() {
        let r: ColumnRef = "Spanish_Words".parse().unwrap();
        assert_eq!(r, ColumnRef::Name("Spanish_Words".to_string()));
    }

    #[test]
    fn resolve_index_and_name() {
        let table = Table::new(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(ColumnRef::Index(0).resolve(&table).unwrap(), 0);
        assert_eq!(
            ColumnRef::Name("B".to_string()).resolve(&table).unwrap(),
            1
        );
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let table = Table::new(vec!["A".to_string()]);
        let err = ColumnRef::Name("Missing".to_string())
            .resolve(&table)
            .unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn resolve_out_of_range_index_fails() {
        let table = Table::new(vec!["A".to_string()]);
        assert!(ColumnRef::Index(3).resolve(&table).is_err());
    }

    #[test]
    fn backend_config_deserializes_from_type_tag() {
        let cfg: BackendConfig =
            serde_json::from_str(r#"{"type":"espeak","rate_wpm":120,"volume":0.5}"#).unwrap();
        match cfg {
            BackendConfig::Espeak { rate_wpm, volume } => {
                assert_eq!(rate_wpm, 120);
                assert_eq!(volume, 0.5);
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn backend_config_fills_defaults() {
        let cfg: BackendConfig = serde_json::from_str(r#"{"type":"google"}"#).unwrap();
        match cfg {
            BackendConfig::Google { lang } => assert_eq!(lang, "es"),
            other => panic!("unexpected backend: {other:?}"),
        }
    }
}
