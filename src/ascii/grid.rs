//! The character grid produced by the quantizer.

use std::fmt;

/// Rows of characters, all of the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiGrid {
    cells: Vec<char>,
    columns: usize,
    rows: usize,
}

impl AsciiGrid {
    /// Build a grid from row-major cells.
    ///
    /// Returns `None` when `cells.len() != columns * rows`.
    pub fn from_cells(cells: Vec<char>, columns: usize, rows: usize) -> Option<Self> {
        if cells.len() != columns * rows {
            return None;
        }
        Some(Self {
            cells,
            columns,
            rows,
        })
    }

    pub(super) fn from_sampled(cells: Vec<char>, columns: usize, rows: usize) -> Self {
        debug_assert_eq!(cells.len(), columns * rows);
        Self {
            cells,
            columns,
            rows,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Character at `(column, row)`.
    pub fn get(&self, column: usize, row: usize) -> Option<char> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// Iterate over rows as character slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks() panics on a zero chunk size
        self.cells.chunks(self.columns.max(1))
    }

    /// Rows as owned strings.
    pub fn lines(&self) -> Vec<String> {
        self.iter_rows().map(|row| row.iter().collect()).collect()
    }
}

impl fmt::Display for AsciiGrid {
    /// Rows joined with `\n`, no trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for ch in row {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
