//! Clash animation sequencer.
//!
//! Runs the fixed phase chain Clash → Exit → TitleIn → TitleHold → TitleOut
//! forever, with the clash flash running alongside Exit. All phase logic works
//! on the plain [`Stage`] resource; the `Apply` set copies it onto entities.

mod entities;
mod flash;
mod sequencer;
mod systems;

pub use entities::{Phase, Side, Stage, Title};
pub use sequencer::Sequencer;

use bevy::prelude::*;
use thiserror::Error;

/// Update ordering: phase logic first, then scene writes.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceSet {
    /// Advances the sequencer by the frame delta.
    Advance,
    /// Copies the stage onto blades, camera, flash and title.
    Apply,
}

/// Timing and geometry for the whole animation loop.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct SequenceConfig {
    /// Phase durations in milliseconds.
    pub timing: PhaseTimings,
    /// Blade start, clash and exit geometry.
    pub blades: BladeSettings,
    /// Camera shake while the blades clash.
    pub shake: ShakeSettings,
    /// Title scale/opacity targets and floating roll.
    pub title: TitleMotion,
    /// Flash light and beam parameters.
    pub flash: FlashSettings,
}

/// Duration of each main-chain phase (ms).
#[derive(Clone, Debug, Reflect)]
pub struct PhaseTimings {
    /// Approach and impact.
    pub clash_ms: f32,
    /// Blades fly offscreen.
    pub exit_ms: f32,
    /// Title grows and fades in.
    pub title_in_ms: f32,
    /// Title holds.
    pub title_hold_ms: f32,
    /// Title grows and fades out.
    pub title_out_ms: f32,
}

/// Blade geometry on the view plane.
#[derive(Clone, Debug, Reflect)]
pub struct BladeSettings {
    /// Full blade length; actors stop at half of it from the clash point.
    pub length: f32,
    /// Where the blades meet.
    pub clash_point: Vec2,
    /// Offscreen starting positions, indexed by [`Side`].
    pub start: [Vec2; 2],
    /// Points that set each blade's approach direction into the clash.
    pub approach: [Vec2; 2],
    /// Offscreen exit positions.
    pub exit: [Vec2; 2],
    /// Peak rotation jitter at impact (radians).
    pub jitter: f32,
}

/// Camera shake during the clash.
#[derive(Clone, Debug, Reflect)]
pub struct ShakeSettings {
    /// Peak x/y offset in world units.
    pub amplitude: f32,
    /// Angular frequency of the x wobble over clash progress.
    pub frequency_x: f32,
    /// Angular frequency of the y wobble over clash progress.
    pub frequency_y: f32,
}

/// Title animation targets.
#[derive(Clone, Debug, Reflect)]
pub struct TitleMotion {
    /// Scale while hidden or just shown.
    pub hidden_scale: f32,
    /// Scale reached at the end of TitleIn.
    pub shown_scale: f32,
    /// Scale reached at the end of TitleOut.
    pub exit_scale: f32,
    /// Peak roll of the floating wobble (radians).
    pub roll_amplitude: f32,
    /// Wobble rate against absolute time (radians per ms).
    pub roll_rate_per_ms: f64,
}

/// Clash flash parameters.
#[derive(Clone, Debug, Reflect)]
pub struct FlashSettings {
    /// Duration of one pass; the flash plays up then back down.
    pub pass_ms: f32,
    /// Light intensity at the peak (scene units, scaled at apply time).
    pub peak_intensity: f32,
    /// Beam uniform scale at rest.
    pub rest_beam_scale: f32,
    /// Beam uniform scale at the peak.
    pub peak_beam_scale: f32,
    /// Beam opacity at the peak.
    pub peak_beam_opacity: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            timing: PhaseTimings {
                clash_ms: 1600.0,
                exit_ms: 700.0,
                title_in_ms: 1300.0,
                title_hold_ms: 1200.0,
                title_out_ms: 1000.0,
            },
            blades: BladeSettings {
                length: 4.0,
                clash_point: Vec2::new(0.0, 1.0),
                start: [Vec2::new(-6.0, -3.0), Vec2::new(6.0, -3.0)],
                approach: [Vec2::new(-1.3, -1.2), Vec2::new(1.3, -1.2)],
                exit: [Vec2::new(-10.0, -6.0), Vec2::new(10.0, -6.0)],
                jitter: 0.08,
            },
            shake: ShakeSettings {
                amplitude: 0.08,
                frequency_x: 40.0,
                frequency_y: 35.0,
            },
            title: TitleMotion {
                hidden_scale: 0.001,
                shown_scale: 1.1,
                exit_scale: 1.5,
                roll_amplitude: 0.03,
                roll_rate_per_ms: 0.002,
            },
            flash: FlashSettings {
                pass_ms: 180.0,
                peak_intensity: 6.0,
                rest_beam_scale: 0.01,
                peak_beam_scale: 1.0,
                peak_beam_opacity: 0.9,
            },
        }
    }
}

impl PhaseTimings {
    /// Duration of `phase` in milliseconds.
    pub fn duration_ms(&self, phase: Phase) -> f32 {
        match phase {
            Phase::Clash => self.clash_ms,
            Phase::Exit => self.exit_ms,
            Phase::TitleIn => self.title_in_ms,
            Phase::TitleHold => self.title_hold_ms,
            Phase::TitleOut => self.title_out_ms,
        }
    }

    /// Length of one full loop.
    pub fn cycle_ms(&self) -> f32 {
        Phase::ALL.iter().map(|&p| self.duration_ms(p)).sum()
    }
}

/// Rejected [`SequenceConfig`] values.
#[derive(Debug, Error, PartialEq)]
pub enum SequenceError {
    /// A phase would never advance.
    #[error("{phase:?} duration must be positive, got {duration_ms} ms")]
    NonPositiveDuration {
        /// Offending phase.
        phase: Phase,
        /// Configured duration.
        duration_ms: f32,
    },
    /// The flash would never finish.
    #[error("flash pass duration must be positive, got {0} ms")]
    NonPositiveFlash(f32),
    /// Blades need a length to meet at the clash point.
    #[error("blade length must be positive, got {0}")]
    NonPositiveBladeLength(f32),
    /// No direction exists from the clash point to the approach target.
    #[error("{side:?} approach target coincides with the clash point")]
    DegenerateApproach {
        /// Blade whose approach is degenerate.
        side: Side,
    },
}

fn non_positive(v: f32) -> bool {
    v.is_nan() || v <= 0.0
}

impl SequenceConfig {
    /// Checks every value the sequencer divides by or normalizes.
    pub fn validate(&self) -> Result<(), SequenceError> {
        for phase in Phase::ALL {
            let duration_ms = self.timing.duration_ms(phase);
            if non_positive(duration_ms) {
                return Err(SequenceError::NonPositiveDuration { phase, duration_ms });
            }
        }
        if non_positive(self.flash.pass_ms) {
            return Err(SequenceError::NonPositiveFlash(self.flash.pass_ms));
        }
        if non_positive(self.blades.length) {
            return Err(SequenceError::NonPositiveBladeLength(self.blades.length));
        }
        for side in Side::BOTH {
            let dir = self.blades.approach[side.index()] - self.blades.clash_point;
            if dir.try_normalize().is_none() {
                return Err(SequenceError::DegenerateApproach { side });
            }
        }
        Ok(())
    }
}

/// Drives the clash loop. Scene and title plugins write the [`Stage`] onto
/// entities in [`SequenceSet::Apply`].
pub struct SequencePlugin(pub SequenceConfig);

impl Plugin for SequencePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SequenceConfig>()
            .insert_resource(self.0.clone())
            .register_type::<Stage>()
            .init_resource::<Stage>()
            .configure_sets(Update, (SequenceSet::Advance, SequenceSet::Apply).chain())
            .add_systems(Startup, systems::start_sequence)
            .add_systems(
                Update,
                systems::advance_sequence.in_set(SequenceSet::Advance),
            );

        match Sequencer::new(self.0.clone()) {
            Ok(sequencer) => {
                app.insert_resource(sequencer);
            }
            Err(err) => error!("sequence disabled: {err}"),
        }
    }
}
