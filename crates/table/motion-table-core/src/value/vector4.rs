use nalgebra::{Quaternion, UnitQuaternion, Vector4 as NVector4};
use serde::{Deserialize, Serialize};

/// 4D vector type, also used as an (x, y, z, w) quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn one() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    /// The identity rotation.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::zero()
        }
    }

    /// View as a nalgebra unit quaternion, normalizing on the way in.
    pub fn as_unit_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::new_normalize(Quaternion::new(self.w, self.x, self.y, self.z))
    }
}

/// Performs spherical linear interpolation (SLERP) between two quaternions,
/// taking the shorter arc. Components are (x, y, z, w) on both sides.
pub fn slerp(a: &Vector4, b: &Vector4, t: f64) -> Vector4 {
    let qa = a.as_unit_quaternion();
    let qb = b.as_unit_quaternion();
    // slerp_quaternions takes the shorter arc; plain slerp panics on
    // antipodal inputs.
    let out = qa.try_slerp(&qb, t, 1e-9).unwrap_or(qa);
    Vector4::new(out.i, out.j, out.k, out.w)
}

impl From<NVector4<f64>> for Vector4 {
    fn from(v: NVector4<f64>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4> for NVector4<f64> {
    fn from(v: Vector4) -> Self {
        NVector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<UnitQuaternion<f64>> for Vector4 {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Self::new(q.i, q.j, q.k, q.w)
    }
}
