//! Clash flash: light and beam burst fired when the blades strike.

use super::FlashSettings;
use super::entities::FlashState;
use crate::math;
use crate::tween::{Easing, Tween};

/// Independent timed task writing only [`FlashState`].
#[derive(Clone, Debug)]
pub struct FlashEffect {
    tween: Tween,
    settings: FlashSettings,
}

impl FlashEffect {
    /// An idle flash: ease-out up, mirrored back down.
    pub fn new(settings: FlashSettings) -> Self {
        Self {
            tween: Tween::new(settings.pass_ms, Easing::CubicOut).yoyo(1),
            settings,
        }
    }

    /// Starts (or restarts) the burst from rest.
    pub fn trigger(&mut self, state: &mut FlashState) {
        self.tween.start();
        self.write(0.0, state);
    }

    /// Whether a burst is in progress.
    pub fn is_running(&self) -> bool {
        self.tween.is_running()
    }

    /// Moves the burst forward; settles on the exact rest state when done.
    pub fn advance(&mut self, delta_ms: f32, state: &mut FlashState) {
        if !self.tween.is_running() {
            return;
        }
        let step = self.tween.advance(delta_ms);
        if step.finished {
            *state = FlashState::rest(self.settings.rest_beam_scale);
        } else {
            self.write(step.value, state);
        }
    }

    fn write(&self, t: f32, state: &mut FlashState) {
        let s = &self.settings;
        state.intensity = math::lerp(0.0, s.peak_intensity, t);
        state.beam_scale = math::lerp(s.rest_beam_scale, s.peak_beam_scale, t);
        state.beam_opacity = math::lerp(0.0, s.peak_beam_opacity, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::SequenceConfig;

    fn flash() -> FlashEffect {
        FlashEffect::new(SequenceConfig::default().flash)
    }

    #[test]
    fn trigger_starts_from_rest() {
        let mut fx = flash();
        let mut state = FlashState {
            intensity: 3.0,
            beam_scale: 0.5,
            beam_opacity: 0.4,
        };
        fx.trigger(&mut state);
        assert_eq!(state, FlashState::rest(0.01));
        assert!(fx.is_running());
    }

    #[test]
    fn peak_hits_declared_values() {
        let mut fx = flash();
        let mut state = FlashState::default();
        fx.trigger(&mut state);
        fx.advance(180.0, &mut state);
        assert_eq!(state.intensity, 6.0);
        assert_eq!(state.beam_scale, 1.0);
        assert_eq!(state.beam_opacity, 0.9);
    }

    #[test]
    fn climb_and_fall_are_mirrored() {
        let mut fx = flash();
        let mut state = FlashState::default();
        fx.trigger(&mut state);
        fx.advance(60.0, &mut state);
        let up = state;
        fx.advance(240.0, &mut state);
        assert!((state.intensity - up.intensity).abs() < 1e-5);
        assert!((state.beam_opacity - up.beam_opacity).abs() < 1e-5);
    }

    #[test]
    fn rest_state_is_exact_after_every_burst() {
        let mut fx = flash();
        let mut state = FlashState::default();
        for _ in 0..5 {
            fx.trigger(&mut state);
            for _ in 0..37 {
                fx.advance(10.0, &mut state);
            }
            assert!(!fx.is_running());
            assert_eq!(
                state,
                FlashState {
                    intensity: 0.0,
                    beam_scale: 0.01,
                    beam_opacity: 0.0,
                }
            );
        }
    }

    #[test]
    fn idle_flash_leaves_state_alone() {
        let mut fx = flash();
        let mut state = FlashState::default();
        fx.advance(500.0, &mut state);
        assert_eq!(state, FlashState::default());
    }
}
