//! Forward kinematics helpers.
//!
//! Every leg is a serial chain: one yaw joint at the root (about Z)
//! followed by two pitch joints (about X).  Each segment vector is
//! rotated by the product of all joint rotations proximal to it.

use nalgebra::{Matrix3, Vector3};

use crate::joint::Angle;

/// Rotation about the X axis by `angle` degrees.
pub fn rot_x(angle: Angle) -> Matrix3<f32> {
    let (s, c) = angle.to_radians().sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, c, -s, //
        0.0, s, c,
    )
}

/// Rotation about the Z axis by `angle` degrees.
pub fn rot_z(angle: Angle) -> Matrix3<f32> {
    let (s, c) = angle.to_radians().sin_cos();
    Matrix3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Tip of a yaw–pitch–pitch chain in the leg's local frame.
pub fn chain_endpoint(angles: &[Angle; 3], segments: &[Vector3<f32>; 3]) -> Vector3<f32> {
    let r1 = rot_z(angles[0]);
    let r12 = r1 * rot_x(angles[1]);
    let r123 = r12 * rot_x(angles[2]);

    r1 * segments[0] + r12 * segments[1] + r123 * segments[2]
}

/// Place a leg-local point into the body frame: shift by the anchor,
/// then turn by the leg's mounting azimuth.
pub fn to_body_frame(local: &Vector3<f32>, anchor: &Vector3<f32>, azimuth: Angle) -> Vector3<f32> {
    rot_z(azimuth) * (local + anchor)
}
