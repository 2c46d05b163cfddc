//! Sampled frames and the consumer-facing applier contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value::{Vector3, Vector4};

/// An ephemeral snapshot of every animated field at one query time,
/// produced fresh by [`crate::MotionTable::frame`].
///
/// A `None` position or scale means the table holds no data for that
/// field, which is distinct from a present zero. Rotation is always
/// emitted, defaulting to the identity when no rotation columns exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vector4>,
    /// Joint/actuator name to interpolated angle value.
    pub angles: HashMap<String, f64>,
    /// The query time the frame was sampled at, in seconds.
    pub time: f64,
}

/// Contract by which a posable actor consumes sampled frames.
///
/// The engine drives playback by sampling a table at the clock time and
/// handing the frame to the actor; how the actor represents its own
/// transform and joint state internally is its business.
pub trait FrameApplier {
    /// Apply a sampled frame to the actor's transform and joint state.
    fn apply_frame(&mut self, frame: &Frame);
}
