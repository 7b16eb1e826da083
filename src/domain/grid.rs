//! Rectangular two-dimensional arrays
//!
//! Jagged arrays are plain `Vec<Vec<T>>`. A [`Grid`] additionally
//! guarantees that every row has the same length, and refuses to
//! deserialize from ragged input.

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Row-major rectangular array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a grid from row-major cells. Returns `None` if the cell
    /// count does not equal `rows * cols`.
    ///
    /// A grid without rows has no columns either, since `[]` cannot carry
    /// a width.
    pub fn new(rows: usize, cols: usize, cells: Vec<T>) -> Option<Self> {
        if rows.checked_mul(cols)? != cells.len() {
            return None;
        }
        let cols = if rows == 0 { 0 } else { cols };
        Some(Self { rows, cols, cells })
    }

    /// Creates a grid from rows. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }

        let row_count = rows.len();
        let cells = rows.into_iter().flatten().collect();
        Some(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cell at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Returns one row as a slice
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Iterates over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).filter_map(move |r| self.row(r))
    }

    /// Splits the grid back into rows
    pub fn into_rows(self) -> Vec<Vec<T>> {
        let cols = self.cols;
        let mut cells = self.cells.into_iter();
        (0..self.rows)
            .map(|_| cells.by_ref().take(cols).collect())
            .collect()
    }
}

impl<T: Serialize> Serialize for Grid<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self.iter_rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grid<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Grid::from_rows(rows).ok_or_else(|| D::Error::custom("rows have different lengths"))
    }
}
