/// In-memory spreadsheet: ordered column names plus row-major cells. Cells
/// are stored as strings; an empty string is an empty cell. Rows are always
/// padded to the column count, so indexing by (row, column) never goes out
/// of bounds for a valid column index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Append a row, padding or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Position of a column by exact name match.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Insert an empty column at `at`, shifting later columns right.
    pub fn insert_column(&mut self, at: usize, name: &str) {
        self.columns.insert(at, name.to_string());
        for row in &mut self.rows {
            row.insert(at, String::new());
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        self.rows[row][column] = value;
    }
}
