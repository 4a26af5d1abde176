//! Sequential row-conversion pipeline.
//!
//! Load the spreadsheet, resolve the target column, walk rows in order,
//! render or reuse one audio file per non-blank cell, annotate the adjacent
//! column, optionally save. One bad row never loses the work already done on
//! the others.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::{ColumnRef, RunConfig};
use crate::error::ConfigError;
use crate::filename;
use crate::sheet::{self, Table};
use crate::tts::SpeechBackend;

/// Marker written to the output column when a row fails to convert.
pub const FAILURE_SENTINEL: &str = "FAILED";

/// Suffix appended to the target column's name to form the output column.
pub const AUDIO_COLUMN_SUFFIX: &str = "_Audio_Path";

/// Per-run counters, informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Rows with a recorded audio path (freshly rendered or reused).
    pub succeeded: usize,
    /// Rows marked with the failure sentinel.
    pub failed: usize,
    /// Rows with blank source text, never sent to the backend.
    pub skipped: usize,
}

/// Execute one full run: load, convert, optionally save.
pub async fn run(config: &RunConfig, backend: &dyn SpeechBackend) -> Result<RunReport> {
    if !config.input.exists() {
        return Err(ConfigError::InputNotFound(config.input.clone()).into());
    }
    let format = sheet::detect_format(&config.input)?;
    let mut table = sheet::load(&config.input, format)
        .with_context(|| format!("Failed to load spreadsheet {:?}", config.input))?;

    let report = convert_rows(&mut table, &config.column, &config.output_dir, backend).await?;

    if config.save_spreadsheet {
        let out = sheet::output_path(&config.input);
        sheet::save(&table, &out, format)?;
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        skipped = report.skipped,
        "Run complete"
    );
    Ok(report)
}

/// Convert every row of the target column, recording results in the audio
/// path column (inserted right after the target column when absent).
pub async fn convert_rows(
    table: &mut Table,
    column: &ColumnRef,
    output_dir: &Path,
    backend: &dyn SpeechBackend,
) -> Result<RunReport> {
    let col_idx = column.resolve(table)?;
    let target_name = table.columns()[col_idx].clone();

    let audio_col_name = format!("{target_name}{AUDIO_COLUMN_SUFFIX}");
    let audio_idx = match table.column_index(&audio_col_name) {
        Some(idx) => idx,
        None => {
            table.insert_column(col_idx + 1, &audio_col_name);
            col_idx + 1
        }
    };

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {output_dir:?}"))?;

    let mut report = RunReport::default();
    for row_idx in 0..table.row_count() {
        let text = table.cell(row_idx, col_idx).trim().to_string();
        if text.is_empty() {
            report.skipped += 1;
            continue;
        }

        // Idempotence is keyed on the filename, not file content.
        let candidate = filename::audio_path(output_dir, row_idx + 1, &text);
        if candidate.exists() {
            info!("Using existing file {candidate:?}");
            table.set_cell(row_idx, audio_idx, candidate.to_string_lossy().into_owned());
            report.succeeded += 1;
            continue;
        }

        info!("Generating audio for '{text}' -> {candidate:?}");
        match backend.render(&text, &candidate).await {
            Ok(actual) => {
                if actual != candidate {
                    debug!("Backend produced {actual:?} instead of {candidate:?}");
                }
                table.set_cell(row_idx, audio_idx, actual.to_string_lossy().into_owned());
                report.succeeded += 1;
            }
            Err(error) => {
                warn!("Failed to synthesize '{text}': {error:#}");
                table.set_cell(row_idx, audio_idx, FAILURE_SENTINEL.to_string());
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
