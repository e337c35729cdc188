//! Small angle helpers for corner orientations (defined modulo pi).

use std::f32::consts::PI;

/// Absolute difference between two angles, normalized into `[0, pi]`.
pub fn angle_diff_abs(a: f32, b: f32) -> f32 {
    let two_pi = 2.0 * PI;
    let mut diff = (b - a).rem_euclid(two_pi);
    if diff >= PI {
        diff -= two_pi;
    }
    diff.abs()
}

/// Whether two directions are approximately orthogonal within `tolerance`.
pub fn is_orthogonal(reference_angle: f32, other_angle: f32, tolerance: f32) -> bool {
    let diff_abs = angle_diff_abs(reference_angle, other_angle);
    (std::f32::consts::FRAC_PI_2 - diff_abs).abs() <= tolerance.abs()
}

/// Angle between an undirected axis (modulo pi) and a directed vector angle,
/// in `[0, pi/2]`.
pub fn axis_vec_diff(axis_angle: f32, vec_angle: f32) -> f32 {
    let two_pi = 2.0 * PI;
    let mut diff = (vec_angle - axis_angle).rem_euclid(two_pi);
    if diff >= PI {
        diff -= two_pi;
    }
    let diff_abs = diff.abs();
    // The axis is undirected: theta and theta + pi describe the same line.
    diff_abs.min(PI - diff_abs)
}
