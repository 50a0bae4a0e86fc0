//! Core tabular data structures.
//!
//! A [`Row`] is the unit exchanged with a tabular source or sink: an ordered
//! sequence of [`Cell`]s, each carrying its raw text and the line it came from.

use std::ops::Index;

/// A single raw value and the line number it was read from (or written to)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    value: Option<String>,
    line_number: usize,
}

impl Cell {
    /// Create a cell holding a value
    pub fn new(value: impl Into<String>, line_number: usize) -> Self {
        Self {
            value: Some(value.into()),
            line_number,
        }
    }

    /// Create a cell with no value
    pub fn empty(line_number: usize) -> Self {
        Self {
            value: None,
            line_number,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// True when the cell has no value or only whitespace
    pub fn is_blank(&self) -> bool {
        self.value.as_deref().is_none_or(|v| v.trim().is_empty())
    }
}

/// One physical row of a tabular source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Remove all cells, keeping the allocation for the next physical row
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Line number of the row, taken from its first cell
    pub fn line_number(&self) -> Option<usize> {
        self.cells.first().map(Cell::line_number)
    }

    /// Cell values as owned strings, with missing values as empty strings
    pub fn values(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|cell| cell.value().unwrap_or_default().to_string())
            .collect()
    }

    /// A row holding exactly one blank cell.
    ///
    /// Sources report a trailing newline this way; it must not be mistaken for
    /// a short data row.
    pub fn is_blank_line(&self) -> bool {
        self.cells.len() == 1 && self.cells[0].is_blank()
    }
}

impl Index<usize> for Row {
    type Output = Cell;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl FromIterator<Cell> for Row {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
