//! Coordinate remapping between the URDF/Gazebo convention and the scene.
//!
//! Capture tables exported from a ROS/Gazebo pipeline express poses in a
//! Z-up, X-forward frame; the scene is Y-up. The remap is the cyclic axis
//! permutation (x, y, z) -> (y, z, x) — a proper rotation, so handedness
//! survives — applied to positions directly and to rotations by
//! conjugation with the permutation's quaternion.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion};
use once_cell::sync::Lazy;

use crate::value::{Vector3, Vector4};

// Rows: scene x = source y, scene y = source z, scene z = source x.
static FRAME_SWAP: Lazy<UnitQuaternion<f64>> = Lazy::new(|| {
    let permutation = Matrix3::new(
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0,
    );
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(permutation))
});

/// Remap a URDF/Gazebo-frame pose into the scene frame.
pub fn urdf_to_scene(position: Vector3, rotation: Vector4) -> (Vector3, Vector4) {
    let remapped_position = Vector3::new(position.y, position.z, position.x);
    let remapped_rotation =
        *FRAME_SWAP * rotation.as_unit_quaternion() * FRAME_SWAP.inverse();
    (remapped_position, remapped_rotation.into())
}
