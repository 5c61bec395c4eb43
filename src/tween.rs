//! Time-based scalar tweens.
//!
//! A [`Tween`] turns elapsed milliseconds into an eased progress value in
//! `[0, 1]`. It knows nothing about what it animates: owners read the value
//! each tick and write it wherever it belongs. Time that runs past the end is
//! handed back as overflow so the owner can feed it into whatever comes next.

use bevy::prelude::*;

use crate::math;

/// Easing curve applied to normalized tween time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// `t^3`.
    CubicIn,
    /// `1 - (1 - t)^3`.
    CubicOut,
    /// Cubic in for the first half, cubic out for the second.
    CubicInOut,
}

impl Easing {
    /// Maps normalized time `t ∈ [0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::CubicIn => math::ease_in_cubic(t),
            Self::CubicOut => math::ease_out_cubic(t),
            Self::CubicInOut => math::ease_in_out_cubic(t),
        }
    }
}

/// Outcome of a single [`Tween::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenStep {
    /// Eased progress after this step.
    pub value: f32,
    /// `true` on the step that finished the tween.
    pub finished: bool,
    /// Milliseconds left over past the end; zero unless `finished`.
    pub overflow_ms: f32,
}

/// Scalar progress driven from 0 to 1 over a fixed duration.
///
/// With [`Tween::yoyo`], every odd pass runs the curve mirrored, so the value
/// climbs back down the way it went up.
#[derive(Clone, Debug)]
pub struct Tween {
    duration_ms: f32,
    easing: Easing,
    yoyo: bool,
    repeats: u32,
    elapsed_ms: f32,
    pass: u32,
    running: bool,
}

impl Tween {
    /// A stopped tween over `duration_ms` with the given easing.
    pub fn new(duration_ms: f32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
            yoyo: false,
            repeats: 0,
            elapsed_ms: 0.0,
            pass: 0,
            running: false,
        }
    }

    /// Plays the curve forward, then `repeats` more passes alternating
    /// mirrored and forward.
    pub fn yoyo(mut self, repeats: u32) -> Self {
        self.yoyo = true;
        self.repeats = repeats;
        self
    }

    /// Rewinds to zero and starts running.
    pub fn start(&mut self) {
        self.reset();
        self.running = true;
    }

    /// Rewinds to zero and stops.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.pass = 0;
        self.running = false;
    }

    /// Whether the tween is between `start` and its final step.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Raw (uneased) progress through the current pass.
    pub fn progress(&self) -> f32 {
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased progress, mirrored on odd yoyo passes.
    pub fn value(&self) -> f32 {
        let t = self.progress();
        if self.yoyo && self.pass % 2 == 1 {
            self.easing.apply(1.0 - t)
        } else {
            self.easing.apply(t)
        }
    }

    /// Moves the tween forward by `delta_ms`.
    ///
    /// A stopped tween does not move and reports `finished: false`.
    pub fn advance(&mut self, delta_ms: f32) -> TweenStep {
        if !self.running {
            return TweenStep {
                value: self.value(),
                finished: false,
                overflow_ms: 0.0,
            };
        }

        self.elapsed_ms += delta_ms;
        let mut finished = false;
        let mut overflow_ms = 0.0;
        while self.elapsed_ms >= self.duration_ms {
            if self.pass < self.repeats {
                self.elapsed_ms -= self.duration_ms;
                self.pass += 1;
            } else {
                overflow_ms = self.elapsed_ms - self.duration_ms;
                self.elapsed_ms = self.duration_ms;
                self.running = false;
                finished = true;
                break;
            }
        }

        TweenStep {
            value: self.value(),
            finished,
            overflow_ms,
        }
    }
}
