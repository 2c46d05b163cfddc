//! Motion Table Core (renderer-agnostic)
//!
//! The motion-table engine behind the capture visualizer: ingests
//! loosely-structured tabular motion-capture data (arbitrary column
//! naming, mixed time units, ragged rows, out-of-order timestamps) and
//! exposes it as a normalized, continuously queryable time-indexed signal
//! with point-in-time interpolation (linear for scalars, spherical for
//! rotations), per-actor overrides and lossless round-trip serialization.
//!
//! Parsing and sampling are synchronous, CPU-bound and allocation-light;
//! tables are immutable after construction, so no locking is needed to
//! sample one from a render loop.

pub mod coords;
pub mod error;
pub mod frame;
pub mod grid;
pub mod headers;
pub mod table;
pub mod time_axis;
pub mod value;

// Re-exports for consumers (loaders, panels, actors)
pub use error::TableError;
pub use frame::{Frame, FrameApplier};
pub use grid::{clean, clean_in_place, CellType, CleanOptions, RawCell};
pub use headers::{CanonicalField, ResolvedHeader};
pub use table::{MotionTable, SerializedMotionTable, TableId};
pub use time_axis::{TimeSeries, TimeUnit, TimeWarning};
pub use value::{Vector3, Vector4};

/// Motion table result type
pub type Result<T> = core::result::Result<T, TableError>;
