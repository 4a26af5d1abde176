use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use locutor_core::config::{BackendConfig, ColumnRef, RunConfig};
use locutor_core::error::ConfigError;
use locutor_core::sheet;
use locutor_core::tts::build_backend;
use locutor_core::pipeline;

#[derive(Parser, Debug)]
#[command(name = "locutor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate Spanish audio files from a spreadsheet column")]
struct Args {
    /// Path to the CSV (.csv) or Excel (.xlsx, .xls) file containing Spanish text
    file_path: PathBuf,

    /// Spanish text column: zero-based index or column name
    #[arg(short, long, default_value = "0")]
    column: ColumnRef,

    /// Text-to-speech backend
    #[arg(short = 'm', long, value_enum, default_value = "google")]
    backend: Backend,

    /// Directory to save audio files into
    #[arg(short, long, default_value = "audio_files")]
    output_dir: PathBuf,

    /// Do not save the updated spreadsheet with audio paths
    #[arg(long)]
    no_save: bool,

    /// Spanish dialect tag for the google backend (es, es-MX, es-AR, ...)
    #[arg(long, default_value = "es")]
    lang: String,

    /// Speaking rate in words per minute for the espeak backend
    #[arg(long, default_value_t = 150)]
    rate: u32,

    /// Volume (0.0 to 1.0) for the espeak backend
    #[arg(long, default_value_t = 0.9)]
    volume: f32,

    /// Voice name for the macOS say backend
    #[arg(long, default_value = "Monica")]
    say_voice: String,

    /// Speaking rate in words per minute for the macOS say backend
    #[arg(long, default_value_t = 200)]
    say_rate: u32,

    /// Azure Speech Services subscription key (required for the azure backend)
    #[arg(long)]
    azure_key: Option<String>,

    /// Azure Speech Services region, e.g. eastus (required for the azure backend)
    #[arg(long)]
    azure_region: Option<String>,

    /// List the selected backend's Spanish voices and exit
    #[arg(long)]
    list_voices: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Google,
    Espeak,
    Say,
    Azure,
}

impl Args {
    fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        match self.backend {
            Backend::Google => Ok(BackendConfig::Google {
                lang: self.lang.clone(),
            }),
            Backend::Espeak => Ok(BackendConfig::Espeak {
                rate_wpm: self.rate,
                volume: self.volume,
            }),
            Backend::Say => Ok(BackendConfig::Say {
                voice: self.say_voice.clone(),
                rate_wpm: self.say_rate,
            }),
            Backend::Azure => match (&self.azure_key, &self.azure_region) {
                (Some(key), Some(region)) => Ok(BackendConfig::Azure {
                    subscription_key: key.clone(),
                    region: region.clone(),
                }),
                _ => Err(ConfigError::MissingAzureCredentials),
            },
        }
    }
}

fn main() -> Result<()> {
    setup_tracing();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    // Fatal configuration checks, all before any row is touched.
    if !args.file_path.exists() {
        return Err(ConfigError::InputNotFound(args.file_path.clone()).into());
    }
    sheet::detect_format(&args.file_path)?;
    let backend_config = args.backend_config()?;
    let backend = build_backend(&backend_config).await?;

    if args.list_voices {
        let voices = backend.list_voices().await?;
        for voice in &voices {
            println!("{:<24} {:<8} {}", voice.name, voice.language, voice.id);
        }
        if voices.is_empty() {
            println!("No Spanish voices available for the {} backend", backend.name());
        }
        return Ok(());
    }

    let config = RunConfig {
        input: args.file_path.clone(),
        column: args.column.clone(),
        output_dir: args.output_dir.clone(),
        save_spreadsheet: !args.no_save,
        backend: backend_config,
    };

    info!(
        input = ?config.input,
        column = ?config.column,
        backend = backend.name(),
        output_dir = ?config.output_dir,
        "Starting conversion"
    );

    let report = pipeline::run(&config, backend.as_ref()).await?;

    println!(
        "Completed! Successfully generated: {}, Failed: {}",
        report.succeeded, report.failed
    );
    if !args.no_save {
        println!(
            "Updated spreadsheet: {}",
            sheet::output_path(&config.input).display()
        );
    }
    println!("Audio files saved in: {}", config.output_dir.display());

    Ok(())
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
