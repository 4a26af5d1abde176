//! Spreadsheet model and I/O.

pub mod io;
pub mod table;

pub use io::{detect_format, load, output_path, save, SheetFormat};
pub use table::Table;
