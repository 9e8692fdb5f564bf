//! Quaternion and vector helpers on plain arrays.
//! - quaternions are (x, y, z, w), right-handed, unit length
//! - `quat_mul(a, b)` applies `b` first, then `a` (Hamilton product)

use crate::{Quat, Vec3};

pub const QUAT_IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn dot4(a: Quat, b: Quat) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion; a zero quaternion normalizes to identity.
pub fn normalize_quat(q: Quat) -> Quat {
    let mag = dot4(q, q).sqrt();
    if mag == 0.0 {
        QUAT_IDENTITY
    } else {
        [q[0] / mag, q[1] / mag, q[2] / mag, q[3] / mag]
    }
}

/// Hamilton product `a * b`.
#[inline]
pub fn quat_mul(a: Quat, b: Quat) -> Quat {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

/// Rotation of `radians` about a unit `axis`.
pub fn quat_from_axis_angle(axis: Vec3, radians: f32) -> Quat {
    if radians == 0.0 {
        return QUAT_IDENTITY;
    }
    let half = radians * 0.5;
    let s = half.sin();
    [axis[0] * s, axis[1] * s, axis[2] * s, half.cos()]
}

/// Angle between two unit quaternions in radians (0 when equal up to sign).
pub fn quat_angle(a: Quat, b: Quat) -> f32 {
    let d = dot4(normalize_quat(a), normalize_quat(b)).abs().min(1.0);
    2.0 * d.acos()
}

#[inline]
pub fn vec3_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn vec3_scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}
