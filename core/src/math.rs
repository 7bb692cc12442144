//! Math type aliases and the equality rules used by header diffs.
//!
//! Vectors and rotations compare by value, component by component.
//! Components that are bit-identical are also equal, so NaN equals itself
//! and a value always compares equal to its own copy. `Header`'s
//! `PartialEq` and its diff both go through [`vec3_eq`] and [`quat_eq`].

pub use nalgebra;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Construct with `Quaternion::new(w, x, y, z)`; no normalization is implied.
pub type Quat = nalgebra::Quaternion<f32>;

fn components_eq(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x == y || x.to_bits() == y.to_bits())
}

/// Returns `true` if every component of `a` equals the one in `b`.
pub fn vec3_eq(a: &Vec3, b: &Vec3) -> bool {
    components_eq(a.as_slice(), b.as_slice())
}

/// Returns `true` if the quaternions have equal components.
///
/// `q` and `-q` are different values even though they describe the same
/// rotation; non-unit quaternions are compared as stored.
pub fn quat_eq(a: &Quat, b: &Quat) -> bool {
    components_eq(a.coords.as_slice(), b.coords.as_slice())
}

/// Identity rotation.
pub fn quat_identity() -> Quat {
    Quat::identity()
}

/// Create a quaternion from rotation around the Y axis.
pub fn quat_from_rotation_y(angle: f32) -> Quat {
    nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Vector3::y_axis(), angle).into_inner()
}
