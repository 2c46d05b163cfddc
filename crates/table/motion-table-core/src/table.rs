//! The motion table: normalized parallel columns behind a time-indexed,
//! continuously queryable sampling API.
//!
//! A table is built from a cleaned grid and holds three kinds of data in
//! index-aligned arrays: the zero-based time axis, the descriptor columns
//! (headers recognized as canonical transform fields, possibly scoped to
//! one actor by a name prefix) and the angle columns (every other header,
//! keyed by joint/actuator name). Index `i` across every array refers to
//! the same captured instant; arrays are permitted to differ in *length*,
//! with reads past an array's end clamping to its final element.
//!
//! A table is immutable once constructed. The sanctioned exceptions are
//! explicit by name: [`MotionTable::set_name`], [`MotionTable::set_from_urdf`]
//! and the donor-mutating [`MotionTable::rehydrate_into`]. Use
//! [`MotionTable::duplicate`] for a copy that can evolve independently.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coords;
use crate::error::TableError;
use crate::frame::Frame;
use crate::grid::{clean, CleanOptions, RawCell};
use crate::headers::{self, CanonicalField};
use crate::time_axis::{build_time_axis, TimeSeries, TimeUnit};
use crate::value::{slerp, Vector3, Vector4};
use crate::Result;

const DEFAULT_NAME: &str = "Unnamed Motion";

/// Unique identifier for a motion table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(Uuid);

impl TableId {
    /// Generate a new table ID
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a table ID from a UUID string
    #[inline]
    pub fn from_string(id: impl AsRef<str>) -> Result<Self> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| TableError::Deserialize {
                reason: format!("Invalid table ID: {}", id.as_ref()),
            })
    }

    /// Get the underlying UUID
    #[inline]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted/exchanged form of a motion table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedMotionTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub name: String,
    pub id: String,
    pub table: Vec<Vec<RawCell>>,
}

/// A normalized motion-capture table.
///
/// Constructed only by [`MotionTable::parse`] or
/// [`MotionTable::deserialize`]; construction is all-or-nothing and a
/// failed parse never yields a partially populated table.
#[derive(Debug, PartialEq)]
pub struct MotionTable {
    id: TableId,
    name: String,
    url: Option<String>,

    // Parallel arrays: index i in one corresponds to index i in the
    // others, i.e. one captured instant per index.
    time: Vec<f64>,
    descriptors: BTreeMap<String, Vec<f64>>,
    angles: BTreeMap<String, Vec<f64>>,
    actor_names: BTreeSet<String>,

    /// Values use the URDF/Gazebo (Z-up) convention and need axis
    /// remapping before use in the scene.
    from_urdf: bool,
}

fn fail(error: TableError) -> TableError {
    log::error!("Failed to turn a grid into a motion table: {error}");
    error
}

/// Linear interpolation.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// The `index`th value of `values`, clamped to the array's bounds; the
/// default when the array is empty.
#[inline]
fn get_i(values: &[f64], index: usize, default: f64) -> f64 {
    match values.len() {
        0 => default,
        len if index >= len => values[len - 1],
        _ => values[index],
    }
}

impl MotionTable {
    /// Parse a raw row/column grid into a table.
    ///
    /// The first row must name the columns; exactly one of `time` /
    /// `timestamp` must be present. A header may scope itself to an actor
    /// with the `actorName-fieldName` convention; the delimiter is
    /// stripped and the actor name recorded. Values should be angles in
    /// radians. When `unit` is `None` the time unit is auto-detected from
    /// the total duration.
    ///
    /// The grid is cleaned first (short rows extended, duplicate rows
    /// removed, non-numeric cells zeroed), then the time axis is repaired,
    /// scaled to seconds and zero-based. Any structural problem aborts
    /// with a [`TableError`]; nothing partially built is returned.
    pub fn parse(rows: &[Vec<RawCell>], unit: Option<TimeUnit>) -> Result<MotionTable> {
        let grid = clean(rows, &CleanOptions::default()).map_err(fail)?;

        let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut actor_names: BTreeSet<String> = BTreeSet::new();

        let header_row = &grid[0];
        for (column_index, header_cell) in header_row.iter().enumerate() {
            let header = match header_cell.as_text() {
                Some(text) => text,
                None => {
                    return Err(fail(TableError::NonStringHeader {
                        column: column_index,
                        value: header_cell.clone(),
                    }))
                }
            };

            // Gather the column's data cells, skipping blanks.
            let mut values: Vec<f64> = Vec::with_capacity(grid.len() - 1);
            for (row_index, row) in grid.iter().enumerate().skip(1) {
                let cell = match row.get(column_index) {
                    Some(cell) => cell,
                    None => continue,
                };
                if cell.is_blank() {
                    continue;
                }
                match cell.as_number() {
                    Some(value) => values.push(value),
                    None => {
                        return Err(fail(TableError::NonNumericCell {
                            row: row_index,
                            column: header.to_string(),
                            value: cell.clone(),
                        }))
                    }
                }
            }

            let trimmed = header.trim().replace(' ', "_");
            let (actor, key) = match trimmed.split_once('-') {
                Some((actor, field)) => (actor.to_string(), format!("{actor}{field}")),
                None => (trimmed.clone(), trimmed.clone()),
            };
            actor_names.insert(actor);
            columns.insert(key, values);
        }

        let time_key = match (columns.contains_key("time"), columns.contains_key("timestamp")) {
            (true, true) => return Err(fail(TableError::AmbiguousTimeColumn)),
            (true, false) => "time",
            (false, true) => "timestamp",
            (false, false) => return Err(fail(TableError::MissingTimeColumn)),
        };

        let (time, _warnings) = build_time_axis(&mut columns, time_key, unit).map_err(fail)?;
        columns.remove(time_key);

        // Whatever normalizes to a canonical field is a descriptor; the
        // rest are joint angle columns.
        let mut descriptors: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut angles: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (key, values) in columns {
            match headers::resolve(&key) {
                Some(resolved) => {
                    descriptors.insert(resolved.key(), values);
                }
                None => {
                    angles.insert(key, values);
                }
            }
        }

        actor_names.remove("time");

        Ok(MotionTable {
            id: TableId::new(),
            name: DEFAULT_NAME.to_string(),
            url: None,
            time,
            descriptors,
            angles,
            actor_names,
            from_urdf: false,
        })
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Actor names discovered while parsing column prefixes.
    pub fn actor_names(&self) -> &BTreeSet<String> {
        &self.actor_names
    }

    pub fn from_urdf(&self) -> bool {
        self.from_urdf
    }

    pub fn set_from_urdf(&mut self, from_urdf: bool) {
        self.from_urdf = from_urdf;
    }

    /// The zero-based time axis, in seconds.
    pub fn times(&self) -> &[f64] {
        &self.time
    }

    pub fn descriptor_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn angle_names(&self) -> impl Iterator<Item = &str> {
        self.angles.keys().map(String::as_str)
    }

    /// A single named column (descriptor or angle) paired with the time
    /// axis, truncated to the shorter of the two.
    pub fn series(&self, name: &str) -> Option<TimeSeries> {
        let values = self
            .descriptors
            .get(name)
            .or_else(|| self.angles.get(name))?;
        let len = values.len().min(self.time.len());
        TimeSeries::new(self.time[..len].to_vec(), values[..len].to_vec()).ok()
    }

    /// Time of the first sample (0 once parsed; 0 for an empty table).
    pub fn start_time(&self) -> f64 {
        get_i(&self.time, 0, 0.0)
    }

    /// Time of the last sample, 0 for an empty table.
    pub fn end_time(&self) -> f64 {
        get_i(&self.time, self.time.len().saturating_sub(1), 0.0)
    }

    /// Sample every field at `query_time`, interpolating between the
    /// bracketing rows.
    ///
    /// Queries at or before the first sample return the first value of
    /// every column; queries at or past the last time return each
    /// column's own final value — the terminal index is the maximum
    /// length over all descriptor and angle columns, so columns shorter
    /// than the time axis clamp independently and the "final frame" can
    /// mix per-field values that were not captured at one instant.
    /// In between, columns are linearly interpolated, except rotation,
    /// which gathers the bracketing quaternions and slerps them.
    ///
    /// With `actor` given, actor-scoped descriptor columns win over the
    /// unscoped ones, and every `actor`-prefixed angle key is re-emitted
    /// under its stripped suffix, overwriting a same-named default.
    pub fn frame(&self, query_time: f64, actor: Option<&str>) -> Frame {
        if query_time <= self.start_time() {
            self.sample(query_time, actor, 0, 0, 0.0)
        } else if query_time >= self.end_time() {
            let max_len = self
                .descriptors
                .values()
                .chain(self.angles.values())
                .map(Vec::len)
                .max()
                .unwrap_or(0);
            self.sample(query_time, actor, max_len, max_len, 0.0)
        } else {
            // First index whose time is >= query_time; the query falls
            // strictly inside the axis, so 1 <= i < len and the bracket
            // times are distinct.
            let i = self.time.partition_point(|&t| t < query_time);
            let last = get_i(&self.time, i - 1, 0.0);
            let curr = get_i(&self.time, i, 0.0);
            let t = (query_time - last) / (curr - last);
            self.sample(query_time, actor, i - 1, i, t)
        }
    }

    /// Assemble a frame from the rows at `curr`/`next`, blended by `t`.
    fn sample(&self, time: f64, actor: Option<&str>, curr: usize, next: usize, t: f64) -> Frame {
        let mut angles: HashMap<String, f64> = HashMap::with_capacity(self.angles.len());
        for (joint, values) in &self.angles {
            let value = lerp(get_i(values, curr, 0.0), get_i(values, next, 0.0), t);
            angles.insert(joint.clone(), value);
        }

        if let Some(actor) = actor {
            // Re-emit actor-prefixed joints under their bare suffix so the
            // actor can look its joints up without the prefix; this
            // overwrites the unprefixed default, which is the point.
            let overrides: Vec<(String, f64)> = angles
                .iter()
                .filter_map(|(joint, value)| {
                    joint
                        .strip_prefix(actor)
                        .map(|suffix| (suffix.to_string(), *value))
                })
                .collect();
            for (joint, value) in overrides {
                angles.insert(joint, value);
            }
        }

        let position = self.axis_triplet(actor, &CanonicalField::POSITION, curr, next, t);
        let scale = self.axis_triplet(actor, &CanonicalField::SCALE, curr, next, t);

        let rotation = match (self.rotation_at(actor, curr), self.rotation_at(actor, next)) {
            (Some(a), Some(b)) => slerp(&a, &b, t),
            _ => Vector4::identity(),
        };

        let mut frame = Frame {
            position,
            scale,
            rotation: Some(rotation),
            angles,
            time,
        };

        if self.from_urdf {
            let (position, rotation) = coords::urdf_to_scene(
                frame.position.unwrap_or_else(Vector3::zero),
                frame.rotation.unwrap_or_else(Vector4::identity),
            );
            frame.position = Some(position);
            frame.rotation = Some(rotation);
        }

        frame
    }

    /// Actor-scoped descriptor column if present, else the unscoped one.
    fn resolve_column(&self, actor: Option<&str>, field: CanonicalField) -> Option<&[f64]> {
        if let Some(actor) = actor {
            let scoped = format!("{}{}", actor, field.key());
            if let Some(values) = self.descriptors.get(&scoped) {
                return Some(values);
            }
        }
        self.descriptors.get(field.key()).map(Vec::as_slice)
    }

    fn field_lerp(
        &self,
        actor: Option<&str>,
        field: CanonicalField,
        curr: usize,
        next: usize,
        t: f64,
    ) -> Option<f64> {
        let values = self.resolve_column(actor, field)?;
        Some(lerp(get_i(values, curr, 0.0), get_i(values, next, 0.0), t))
    }

    /// Resolve three axes into a vector; `None` when no axis has data.
    fn axis_triplet(
        &self,
        actor: Option<&str>,
        fields: &[CanonicalField; 3],
        curr: usize,
        next: usize,
        t: f64,
    ) -> Option<Vector3> {
        let x = self.field_lerp(actor, fields[0], curr, next, t);
        let y = self.field_lerp(actor, fields[1], curr, next, t);
        let z = self.field_lerp(actor, fields[2], curr, next, t);
        if x.is_none() && y.is_none() && z.is_none() {
            return None;
        }
        Some(Vector3::new(
            x.unwrap_or(0.0),
            y.unwrap_or(0.0),
            z.unwrap_or(0.0),
        ))
    }

    /// The quaternion stored at one sample index, or `None` when any
    /// rotation component has no column (Euler-only tables included).
    fn rotation_at(&self, actor: Option<&str>, index: usize) -> Option<Vector4> {
        let mut components = [0.0f64; 4];
        for (slot, field) in CanonicalField::ROTATION.iter().enumerate() {
            let values = self.resolve_column(actor, *field)?;
            components[slot] = get_i(values, index, 0.0);
        }
        Some(Vector4::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }

    /// Rebuild the table as rows: a header row (time, descriptors,
    /// angles) plus one data row per sample index up to the longest
    /// column, short columns repeating their final value (0 when empty).
    pub fn to_rows(&self) -> Vec<Vec<RawCell>> {
        let mut columns: Vec<(&str, &[f64])> = Vec::new();
        columns.push(("time", self.time.as_slice()));
        for (header, values) in &self.descriptors {
            columns.push((header.as_str(), values.as_slice()));
        }
        for (header, values) in &self.angles {
            columns.push((header.as_str(), values.as_slice()));
        }

        let data_rows = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);

        let mut rows: Vec<Vec<RawCell>> = Vec::with_capacity(data_rows + 1);
        rows.push(columns.iter().map(|(header, _)| RawCell::from(*header)).collect());
        for row_index in 0..data_rows {
            rows.push(
                columns
                    .iter()
                    .map(|(_, values)| {
                        let value = values
                            .get(row_index)
                            .or_else(|| values.last())
                            .copied()
                            .unwrap_or(0.0);
                        RawCell::Number(value)
                    })
                    .collect(),
            );
        }
        rows
    }

    /// Produce the persisted record form.
    pub fn serialize(&self) -> SerializedMotionTable {
        SerializedMotionTable {
            url: self.url.clone(),
            name: self.name.clone(),
            id: self.id.to_string(),
            table: self.to_rows(),
        }
    }

    /// Reconstruct a table from its persisted record.
    pub fn deserialize(record: &SerializedMotionTable, unit: Option<TimeUnit>) -> Result<MotionTable> {
        let mut table = MotionTable::parse(&record.table, unit)?;
        if !record.name.is_empty() {
            table.name = record.name.clone();
        }
        // A foreign record may carry an id in some other scheme; keep the
        // freshly generated one in that case.
        if let Ok(id) = TableId::from_string(&record.id) {
            table.id = id;
        }
        if record.url.is_some() {
            table.url = record.url.clone();
        }
        Ok(table)
    }

    /// Re-parse a record *into* an existing table, preserving the donor's
    /// object identity for everything holding a reference to it.
    ///
    /// This is the one sanctioned bulk mutation of a constructed table
    /// and must not be interleaved with sampling calls. On error the
    /// donor is left untouched.
    pub fn rehydrate_into(
        record: &SerializedMotionTable,
        donor: &mut MotionTable,
        unit: Option<TimeUnit>,
    ) -> Result<()> {
        let parsed = MotionTable::parse(&record.table, unit)?;
        donor.time = parsed.time;
        donor.descriptors = parsed.descriptors;
        donor.angles = parsed.angles;
        if !record.name.is_empty() {
            donor.name = record.name.clone();
        }
        if let Ok(id) = TableId::from_string(&record.id) {
            donor.id = id;
        }
        if record.url.is_some() {
            donor.url = record.url.clone();
        }
        Ok(())
    }

    /// A fully independent deep copy under a fresh identity.
    pub fn duplicate(&self) -> MotionTable {
        MotionTable {
            id: TableId::new(),
            name: self.name.clone(),
            url: self.url.clone(),
            time: self.time.clone(),
            descriptors: self.descriptors.clone(),
            angles: self.angles.clone(),
            actor_names: self.actor_names.clone(),
            from_urdf: self.from_urdf,
        }
    }
}
