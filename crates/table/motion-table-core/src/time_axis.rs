//! Time-axis extraction, repair and normalization.
//!
//! Capture files carry their timeline in whatever unit the exporter used
//! (seconds through nanoseconds) and the rows are not guaranteed to be
//! clean: duplicate timestamps and the occasional out-of-order row are
//! common. The builder removes those rows from every column of the working
//! grid, scales the timeline to seconds (auto-detecting the unit when it
//! was not declared) and shifts it so the first sample sits at exactly 0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::Result;

/// A run of more than this many consecutive descending timestamps aborts
/// the parse; the tail is assumed unsalvageable.
pub const MAX_DESCENDING_RUN: usize = 5;

/// Unit of the raw time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Raw ticks per second for this unit.
    #[inline]
    pub fn factor(&self) -> f64 {
        match self {
            Self::Second => 1.0,
            Self::Millisecond => 1e3,
            Self::Microsecond => 1e6,
            Self::Nanosecond => 1e9,
        }
    }
}

/// Recoverable data-quality issue found while building the time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimeWarning {
    /// A timestamp was lower than its predecessor; its row was removed.
    DescendingTime { index: usize, value: f64 },
}

impl std::fmt::Display for TimeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DescendingTime { index, value } => write!(
                f,
                "time column must contain only ascending values, but row {index} went back to {value}; removing it"
            ),
        }
    }
}

/// Build the normalized time axis from the working column map.
///
/// Row removals during the monotonicity repair hit every column in the map
/// so index alignment survives; after a removal the same index is examined
/// again rather than advancing past the row that slid into its place. The
/// repaired time column is then scaled to seconds and zero-based. The raw
/// time column is left in the map; the caller discards it.
///
/// Output invariant: strictly increasing, first element exactly 0.
pub fn build_time_axis(
    columns: &mut BTreeMap<String, Vec<f64>>,
    time_key: &str,
    unit: Option<TimeUnit>,
) -> Result<(Vec<f64>, Vec<TimeWarning>)> {
    if !columns.contains_key(time_key) {
        return Err(TableError::MissingTimeColumn);
    }

    let mut warnings = Vec::new();
    let mut descending_run = 0usize;
    let mut i = 1usize;

    loop {
        let times = match columns.get(time_key) {
            Some(times) if i < times.len() => times,
            _ => break,
        };
        let prev = times[i - 1];
        let curr = times[i];

        let remove = if prev > curr {
            let warning = TimeWarning::DescendingTime {
                index: i,
                value: curr,
            };
            log::warn!("{warning}");
            warnings.push(warning);
            descending_run += 1;
            if descending_run > MAX_DESCENDING_RUN {
                log::error!(
                    "{descending_run} consecutive descending time values; giving up on the tail"
                );
                return Err(TableError::DescendingTimeRun {
                    count: descending_run,
                });
            }
            true
        } else if prev == curr {
            log::debug!("removing duplicate timestamp at row {i}");
            true
        } else {
            descending_run = 0;
            false
        };

        if remove {
            for column in columns.values_mut() {
                if i < column.len() {
                    column.remove(i);
                }
            }
            // do not advance: re-examine the value now occupying index i
        } else {
            i += 1;
        }
    }

    let raw = columns.get(time_key).cloned().unwrap_or_default();
    Ok((scale_to_seconds(&raw, unit), warnings))
}

/// Zero-base a repaired raw time column and convert it to seconds.
fn scale_to_seconds(raw: &[f64], unit: Option<TimeUnit>) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let start = raw[0];

    let divisor = match unit {
        Some(unit) => unit.factor(),
        None => {
            // Auto-detect from the total raw duration: each threshold the
            // span crosses means the ticks are a thousand times finer.
            let total = raw[raw.len() - 1] - start;
            let mut divisor = 1.0;
            if total > 1e3 {
                divisor *= 1e3;
            }
            if total > 1e6 {
                divisor *= 1e3;
            }
            if total > 1e9 {
                divisor *= 1e3;
            }
            divisor
        }
    };

    raw.iter().map(|t| (t - start) / divisor).collect()
}

/// An ordered sequence of (time, value) pairs kept as two index-aligned
/// arrays. This is the shape plotting consumers read single columns in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series, checking alignment and strict time ordering.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if times.len() != values.len() {
            return Err(TableError::InvalidSeries {
                reason: format!(
                    "times ({}) and values ({}) differ in length",
                    times.len(),
                    values.len()
                ),
            });
        }
        if let Some(i) = (1..times.len()).find(|&i| times[i] <= times[i - 1]) {
            return Err(TableError::InvalidSeries {
                reason: format!("times must be strictly increasing (violated at index {i})"),
            });
        }
        Ok(Self { times, values })
    }

    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
