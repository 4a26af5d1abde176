//! Loading and saving spreadsheets in the two supported container formats.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::info;

use crate::error::ConfigError;
use crate::sheet::table::Table;

/// Suffix inserted before the extension when saving the augmented table.
pub const OUTPUT_SUFFIX: &str = "_with_audio_paths";

/// The two supported container format families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

/// Map a file extension to a format, rejecting anything unsupported.
pub fn detect_format(path: &Path) -> Result<SheetFormat, ConfigError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => Ok(SheetFormat::Csv),
        "xlsx" | "xls" => Ok(SheetFormat::Workbook),
        _ => Err(ConfigError::UnsupportedExtension(format!(".{ext}"))),
    }
}

/// Load a spreadsheet into memory. The first row is taken as the header.
pub fn load(path: &Path, format: SheetFormat) -> Result<Table> {
    match format {
        SheetFormat::Csv => load_csv(path),
        SheetFormat::Workbook => load_workbook(path),
    }
}

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {path:?}"))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {path:?}"))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read CSV row from {path:?}"))?;
        table.push_row(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Failed to open workbook {path:?}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Workbook has no sheets")?
        .with_context(|| format!("Failed to read first sheet of {path:?}"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .context("Workbook sheet is empty")?
        .iter()
        .map(cell_to_string)
        .collect();

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_to_string).collect());
    }
    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Derive `<stem>_with_audio_paths<extension>` next to the input file.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spreadsheet");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("");
    let name = if ext.is_empty() {
        format!("{stem}{OUTPUT_SUFFIX}")
    } else {
        format!("{stem}{OUTPUT_SUFFIX}.{ext}")
    };
    input.with_file_name(name)
}

/// Persist the table in the same format family as the input. Workbook output
/// is always written as xlsx content regardless of the original extension.
pub fn save(table: &Table, path: &Path, format: SheetFormat) -> Result<()> {
    match format {
        SheetFormat::Csv => save_csv(table, path)?,
        SheetFormat::Workbook => save_workbook(table, path)?,
    }
    info!("Updated spreadsheet saved as {path:?}");
    Ok(())
}

fn save_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {path:?}"))?;
    writer
        .write_record(table.columns())
        .context("Failed to write CSV header")?;
    for row in table.rows() {
        writer.write_record(row).context("Failed to write CSV row")?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file {path:?}"))?;
    Ok(())
}

fn save_workbook(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name)
            .context("Failed to write workbook header")?;
    }
    for (row_idx, row) in table.rows().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string((row_idx + 1) as u32, col as u16, cell)
                .context("Failed to write workbook cell")?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats_case_insensitively() {
        assert_eq!(
            detect_format(Path::new("words.CSV")).unwrap(),
            SheetFormat::Csv
        );
        assert_eq!(
            detect_format(Path::new("words.xlsx")).unwrap(),
            SheetFormat::Workbook
        );
        assert_eq!(
            detect_format(Path::new("words.xls")).unwrap(),
            SheetFormat::Workbook
        );
        assert!(detect_format(Path::new("words.txt")).is_err());
        assert!(detect_format(Path::new("words")).is_err());
    }

    #[test]
    fn output_path_inserts_suffix_before_extension() {
        assert_eq!(
            output_path(Path::new("/data/words.csv")),
            PathBuf::from("/data/words_with_audio_paths.csv")
        );
        assert_eq!(
            output_path(Path::new("words.xlsx")),
            PathBuf::from("words_with_audio_paths.xlsx")
        );
    }

    #[test]
    fn csv_round_trip_preserves_columns_and_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");
        std::fs::write(&path, "Word,Meaning\nhola,hello\nadiós,goodbye\n").unwrap();

        let table = load(&path, SheetFormat::Csv).unwrap();
        assert_eq!(table.columns(), &["Word", "Meaning"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), "adiós");

        let out = dir.path().join("out.csv");
        save(&table, &out, SheetFormat::Csv).unwrap();
        let round = load(&out, SheetFormat::Csv).unwrap();
        assert_eq!(round, table);
    }
}
