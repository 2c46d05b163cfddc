//! Value types for sampled motion data

pub mod vector3;
pub mod vector4;

pub use vector3::*;
pub use vector4::*;
