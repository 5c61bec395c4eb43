//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec2` inputs, making them straightforward to unit-test.

use std::f32::consts::PI;

use bevy::prelude::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Linear interpolation written as `a * (1 - t) + b * t`.
///
/// Unlike `a + (b - a) * t`, this form returns exactly `a` at `t = 0` and
/// exactly `b` at `t = 1`, so phase endpoints land on their declared values.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Component-wise [`lerp`] for 2D points.
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Cubic ease-in curve: slow start, sharp finish. Returns `t^3`.
pub fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

/// Cubic ease-out curve: fast start, gentle deceleration.
///
/// `t` should be in `[0, 1]`. Returns `1 - (1 - t)^3`.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out: accelerates through the first half, decelerates
/// through the second.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Impact strength during the clash: `sin(t·π)`.
///
/// Pinned to exactly `0.0` at and beyond both ends, where `sin(π)` in
/// floating point would otherwise leave a tiny residue.
pub fn clash_power(t: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        0.0
    } else {
        (t * PI).sin()
    }
}

/// Where an actor must stand so its blade meets `clash` at half blade length.
///
/// Walks from `clash` toward `approach` by `half_length`. Returns `None` when
/// `approach` coincides with `clash` and no direction exists.
pub fn clash_end_point(clash: Vec2, approach: Vec2, half_length: f32) -> Option<Vec2> {
    let dir = (approach - clash).try_normalize()?;
    Some(clash + dir * half_length)
}

/// Rotation around the view axis that turns a blade's local `+Y` toward `target`.
pub fn aim_angle(from: Vec2, target: Vec2) -> f32 {
    let d = target - from;
    (-d.x).atan2(d.y)
}

/// Small floating roll applied to the title, keyed to absolute time.
pub fn title_roll(now_ms: f64, amplitude: f32, rate_per_ms: f64) -> f32 {
    amplitude * (now_ms * rate_per_ms).sin() as f32
}

/// Uniformly scattered star positions inside a cube of `half_extent`.
///
/// Deterministic for a given `seed` so runs look the same.
pub fn star_positions(count: usize, half_extent: f32, seed: u64) -> Vec<[f32; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-half_extent..half_extent),
                rng.gen_range(-half_extent..half_extent),
                rng.gen_range(-half_extent..half_extent),
            ]
        })
        .collect()
}
