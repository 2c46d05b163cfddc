//! Raw tabular input and the grid cleaner.
//!
//! Motion-capture exports arrive as loosely structured row/column grids:
//! ragged rows, stray text in numeric columns, repeated rows. The cleaner
//! validates and repairs the grid before any semantic interpretation so the
//! parser downstream only ever sees a rectangular, type-consistent table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::Result;

/// A single untyped cell: numeric or textual until the cleaner has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
}

impl RawCell {
    /// A blank cell: empty or whitespace-only text. Blank is not the same
    /// as bad; blanks survive cleaning and are skipped when columns are
    /// gathered.
    #[inline]
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Number(_) => false,
            RawCell::Text(s) => s.trim().is_empty(),
        }
    }

    /// Numeric view of the cell, coercing numeric-looking text.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(n) => Some(*n),
            RawCell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawCell::Number(_) => None,
            RawCell::Text(s) => Some(s),
        }
    }

    /// Exact identity key, usable for duplicate-row detection. Numbers are
    /// compared by bit pattern so that e.g. 0.0 and -0.0 stay distinct.
    fn identity(&self) -> CellKey {
        match self {
            RawCell::Number(n) => CellKey::Number(n.to_bits()),
            RawCell::Text(s) => CellKey::Text(s.clone()),
        }
    }

    #[inline]
    fn blank() -> Self {
        RawCell::Text(String::new())
    }
}

impl From<f64> for RawCell {
    #[inline]
    fn from(n: f64) -> Self {
        RawCell::Number(n)
    }
}

impl From<&str> for RawCell {
    #[inline]
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

impl From<String> for RawCell {
    #[inline]
    fn from(s: String) -> Self {
        RawCell::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Number(u64),
    Text(String),
}

/// Expected type of data-row cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Number,
    Text,
}

/// Options for [`clean_in_place`] / [`clean`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Reject a grid with no header row.
    pub non_empty: bool,
    /// Extend rows shorter than the header to the header's width with
    /// blank cells.
    pub extend_rows: bool,
    /// Remove later rows that are cell-for-cell identical to an earlier
    /// data row.
    pub remove_duplicate_rows: bool,
    /// Expected type of every non-blank data cell.
    pub value_type: CellType,
    /// Replacement for a cell that fails the type expectation.
    pub fill_bad_cells_with: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            non_empty: true,
            extend_rows: true,
            remove_duplicate_rows: true,
            value_type: CellType::Number,
            fill_bad_cells_with: 0.0,
        }
    }
}

/// Validate and repair a grid in place.
///
/// Single pass over the data rows after the structural check: rows are
/// squared to the header's width, fully blank rows and duplicate rows are
/// dropped, and non-blank cells failing the type expectation are replaced
/// by the configured fallback. The header row is exempt from type checks.
pub fn clean_in_place(grid: &mut Vec<Vec<RawCell>>, options: &CleanOptions) -> Result<()> {
    if grid.is_empty() || grid[0].is_empty() {
        if options.non_empty {
            log::error!("refusing to clean an empty grid");
            return Err(TableError::EmptyGrid);
        }
        return Ok(());
    }

    let width = grid[0].len();
    let mut seen: HashSet<Vec<CellKey>> = HashSet::new();
    let mut row_index = 0usize;

    grid.retain_mut(|row| {
        row_index += 1;
        if row_index == 1 {
            // Header row: square it but leave its cells untouched.
            row.truncate(width);
            return true;
        }

        row.truncate(width);
        if options.extend_rows {
            while row.len() < width {
                row.push(RawCell::blank());
            }
        }

        if row.iter().all(RawCell::is_blank) {
            return false;
        }

        if options.value_type == CellType::Number {
            for cell in row.iter_mut() {
                if cell.is_blank() {
                    continue;
                }
                match cell.as_number() {
                    Some(n) => *cell = RawCell::Number(n),
                    None => {
                        log::warn!(
                            "row {}: replacing non-numeric cell {:?} with {}",
                            row_index - 1,
                            cell,
                            options.fill_bad_cells_with
                        );
                        *cell = RawCell::Number(options.fill_bad_cells_with);
                    }
                }
            }
        }

        if options.remove_duplicate_rows {
            let key: Vec<CellKey> = row.iter().map(RawCell::identity).collect();
            if !seen.insert(key) {
                log::warn!("row {}: removing duplicate row", row_index - 1);
                return false;
            }
        }

        true
    });

    Ok(())
}

/// Copying variant of [`clean_in_place`]: the input grid is left untouched.
pub fn clean(grid: &[Vec<RawCell>], options: &CleanOptions) -> Result<Vec<Vec<RawCell>>> {
    let mut copy = grid.to_vec();
    clean_in_place(&mut copy, options)?;
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[RawCell]]) -> Vec<Vec<RawCell>> {
        rows.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_empty_grid_rejected() {
        let mut empty: Vec<Vec<RawCell>> = Vec::new();
        let err = clean_in_place(&mut empty, &CleanOptions::default()).unwrap_err();
        assert_eq!(err, TableError::EmptyGrid);

        let mut lax = CleanOptions::default();
        lax.non_empty = false;
        assert!(clean_in_place(&mut Vec::new(), &lax).is_ok());
    }

    #[test]
    fn test_short_rows_extended() {
        let mut g = grid(&[
            &["time".into(), "j1".into()],
            &[RawCell::from(0.0)], // one cell short
        ]);
        clean_in_place(&mut g, &CleanOptions::default()).unwrap();
        assert_eq!(g[1].len(), 2);
        assert!(g[1][1].is_blank());
    }

    #[test]
    fn test_blank_rows_dropped() {
        let mut g = grid(&[
            &["time".into(), "j1".into()],
            &["".into(), "  ".into()],
            &[RawCell::from(1.0), RawCell::from(2.0)],
        ]);
        clean_in_place(&mut g, &CleanOptions::default()).unwrap();
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_bad_cells_filled() {
        let mut g = grid(&[
            &["time".into(), "j1".into()],
            &[RawCell::from(0.0), "not a number".into()],
            &[RawCell::from(1.0), "2.5".into()], // numeric text coerces
        ]);
        let mut options = CleanOptions::default();
        options.fill_bad_cells_with = -1.0;
        clean_in_place(&mut g, &options).unwrap();
        assert_eq!(g[1][1], RawCell::Number(-1.0));
        assert_eq!(g[2][1], RawCell::Number(2.5));
    }

    #[test]
    fn test_duplicate_rows_removed() {
        let mut g = grid(&[
            &["time".into(), "j1".into()],
            &[RawCell::from(5.0), RawCell::from(1.0)],
            &[RawCell::from(5.0), RawCell::from(1.0)],
            &[RawCell::from(6.0), RawCell::from(1.0)],
        ]);
        clean_in_place(&mut g, &CleanOptions::default()).unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(g[2][0], RawCell::Number(6.0));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let g = grid(&[
            &["time".into(), "j1".into()],
            &[RawCell::from(0.0), "x".into()],
            &[RawCell::from(0.0), "x".into()],
            &[RawCell::from(1.0)],
        ]);
        let once = clean(&g, &CleanOptions::default()).unwrap();
        let twice = clean(&once, &CleanOptions::default()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_leaves_input_untouched() {
        let g = grid(&[&["time".into()], &["junk".into()]]);
        let cleaned = clean(&g, &CleanOptions::default()).unwrap();
        assert_eq!(g[1][0], RawCell::Text("junk".to_string()));
        assert_eq!(cleaned[1][0], RawCell::Number(0.0));
    }

    #[test]
    fn test_untagged_cell_serde() {
        let row: Vec<RawCell> = serde_json::from_str(r#"["time", 0.25, ""]"#).unwrap();
        assert_eq!(row[0], RawCell::Text("time".to_string()));
        assert_eq!(row[1], RawCell::Number(0.25));
        assert!(row[2].is_blank());
    }
}
