//! Error types for the motion-table engine

use serde::{Deserialize, Serialize};

use crate::grid::RawCell;

/// Structured error for every fatal parse condition.
///
/// Construction of a table is all-or-nothing: any of these aborts the parse
/// and nothing partially built escapes to the caller. Recoverable
/// data-quality issues (duplicate timestamps, short rows, bad cells) are
/// repaired in place and logged instead of surfacing here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TableError {
    /// The input grid had no rows (or no header row) when one was required
    #[error("The table is empty: at least a header row is required")]
    EmptyGrid,

    /// A header cell was not text
    #[error("Header of column {column} is {value:?} rather than text! Every cell of the first row must name its column")]
    NonStringHeader { column: usize, value: RawCell },

    /// A data cell under a header was not numeric
    #[error("On row {row} of column \"{column}\", the value {value:?} is not a number")]
    NonNumericCell {
        row: usize,
        column: String,
        value: RawCell,
    },

    /// Both a "time" and a "timestamp" column were present
    #[error("The table cannot have both a \"time\" column and a \"timestamp\" column; remove one of them")]
    AmbiguousTimeColumn,

    /// Neither a "time" nor a "timestamp" column was present
    #[error("There is no \"time\" or \"timestamp\" column in the table")]
    MissingTimeColumn,

    /// More than `limit` consecutive descending time values
    #[error("{count} consecutive values of the time column were descending, so the rest are assumed to be as well")]
    DescendingTimeRun { count: usize },

    /// A time-series pair was not index-aligned or strictly increasing
    #[error("Invalid time series: {reason}")]
    InvalidSeries { reason: String },

    /// A persisted record could not be decoded
    #[error("Deserialization error: {reason}")]
    Deserialize { reason: String },
}

impl TableError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyGrid
            | Self::NonStringHeader { .. }
            | Self::NonNumericCell { .. }
            | Self::InvalidSeries { .. } => "structure",
            Self::AmbiguousTimeColumn | Self::MissingTimeColumn | Self::DescendingTimeRun { .. } => {
                "time-axis"
            }
            Self::Deserialize { .. } => "serialization",
        }
    }

    /// Check if callers may retry with repaired input
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousTimeColumn | Self::MissingTimeColumn | Self::DescendingTimeRun { .. }
        )
    }
}

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialize {
            reason: err.to_string(),
        }
    }
}
