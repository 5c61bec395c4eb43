//! Phase state machine.
//!
//! One [`Tween`] per [`Phase`] holds that phase's progress. [`Sequencer::advance`]
//! moves the active tween, runs the phase update with the eased value, and on
//! completion hands any overflow time to the next phase, so a single long
//! frame still passes through every phase boundary in order.

use bevy::prelude::*;

use super::entities::{FrameClock, Phase, Side, Stage};
use super::flash::FlashEffect;
use super::{SequenceConfig, SequenceError};
use crate::math;
use crate::tween::{Easing, Tween};

/// Drives the clash loop over a [`Stage`].
#[derive(Resource, Clone, Debug)]
pub struct Sequencer {
    cfg: SequenceConfig,
    tweens: [Tween; 5],
    active: Option<Phase>,
    /// Clash end points, fixed by the config.
    clash_end: [Vec2; 2],
    /// Where each blade was when the clash finished.
    exit_start: [Vec2; 2],
    flash: FlashEffect,
    cycles: u64,
}

fn easing(phase: Phase) -> Easing {
    match phase {
        Phase::Clash => Easing::CubicInOut,
        Phase::Exit => Easing::CubicIn,
        Phase::TitleIn => Easing::CubicOut,
        Phase::TitleHold => Easing::Linear,
        Phase::TitleOut => Easing::CubicIn,
    }
}

impl Sequencer {
    /// Validates `cfg` and precomputes the clash end points.
    pub fn new(cfg: SequenceConfig) -> Result<Self, SequenceError> {
        cfg.validate()?;

        let half = cfg.blades.length / 2.0;
        let mut clash_end = [Vec2::ZERO; 2];
        for side in Side::BOTH {
            let approach = cfg.blades.approach[side.index()];
            clash_end[side.index()] =
                math::clash_end_point(cfg.blades.clash_point, approach, half)
                    .ok_or(SequenceError::DegenerateApproach { side })?;
        }

        let tweens =
            Phase::ALL.map(|phase| Tween::new(cfg.timing.duration_ms(phase), easing(phase)));

        Ok(Self {
            flash: FlashEffect::new(cfg.flash.clone()),
            tweens,
            active: None,
            exit_start: clash_end,
            clash_end,
            cycles: 0,
            cfg,
        })
    }

    /// Enters the first phase. Calling it again restarts the loop.
    pub fn start(&mut self, stage: &mut Stage) {
        for tween in &mut self.tweens {
            tween.reset();
        }
        self.enter(Phase::Clash, stage);
    }

    /// The running phase, `None` before [`Sequencer::start`].
    pub fn active(&self) -> Option<Phase> {
        self.active
    }

    /// Raw progress of `phase`; zero for phases that have been reset.
    pub fn progress(&self, phase: Phase) -> f32 {
        self.tweens[phase.index()].progress()
    }

    /// Number of completed loops.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advances the flash and the main chain by one frame.
    pub fn advance(&mut self, clock: FrameClock, stage: &mut Stage) {
        let Some(mut phase) = self.active else {
            return;
        };

        if self.flash.is_running() {
            self.flash.advance(clock.delta_ms, &mut stage.flash);
        }

        let mut remaining = clock.delta_ms;
        loop {
            let step = self.tweens[phase.index()].advance(remaining);
            self.update(phase, step.value, clock.now_ms, stage);
            if !step.finished {
                break;
            }
            self.complete(phase, step.overflow_ms, stage);
            phase = phase.next();
            self.enter(phase, stage);
            remaining = step.overflow_ms;
        }
    }

    fn enter(&mut self, phase: Phase, stage: &mut Stage) {
        self.active = Some(phase);
        self.tweens[phase.index()].start();
        let motion = &self.cfg.title;

        match phase {
            Phase::Clash => self.reset_actors(stage),
            Phase::Exit | Phase::TitleHold => {}
            Phase::TitleIn => {
                if let Some(title) = stage.title.as_mut() {
                    title.visible = true;
                    title.scale = motion.hidden_scale;
                    title.opacity = 0.0;
                }
            }
            Phase::TitleOut => {
                if let Some(title) = stage.title.as_mut() {
                    title.scale = motion.shown_scale;
                    title.opacity = 1.0;
                }
            }
        }
    }

    fn update(&self, phase: Phase, t: f32, now_ms: f64, stage: &mut Stage) {
        let blades = &self.cfg.blades;
        let motion = &self.cfg.title;

        match phase {
            Phase::Clash => {
                let power = math::clash_power(t);
                for side in Side::BOTH {
                    let i = side.index();
                    let position = math::lerp_vec2(blades.start[i], self.clash_end[i], t);
                    let actor = stage.actor_mut(side);
                    actor.position = position;
                    actor.rotation = math::aim_angle(position, blades.clash_point)
                        + side.jitter_sign() * power * blades.jitter;
                }
                let shake = &self.cfg.shake;
                stage.camera_offset = Vec2::new(
                    (t * shake.frequency_x).sin() * shake.amplitude * power,
                    (t * shake.frequency_y).cos() * shake.amplitude * power,
                );
            }
            Phase::Exit => {
                for side in Side::BOTH {
                    let i = side.index();
                    stage.actor_mut(side).position =
                        math::lerp_vec2(self.exit_start[i], blades.exit[i], t);
                }
            }
            Phase::TitleIn => {
                if let Some(title) = stage.title.as_mut() {
                    title.scale = math::lerp(motion.hidden_scale, motion.shown_scale, t);
                    title.opacity = math::lerp(0.0, 1.0, t);
                    title.roll =
                        math::title_roll(now_ms, motion.roll_amplitude, motion.roll_rate_per_ms);
                }
            }
            Phase::TitleHold => {
                if let Some(title) = stage.title.as_mut() {
                    title.roll =
                        math::title_roll(now_ms, motion.roll_amplitude, motion.roll_rate_per_ms);
                }
            }
            Phase::TitleOut => {
                if let Some(title) = stage.title.as_mut() {
                    title.scale = math::lerp(motion.shown_scale, motion.exit_scale, t);
                    title.opacity = math::lerp(1.0, 0.0, t);
                }
            }
        }
    }

    fn complete(&mut self, phase: Phase, overflow_ms: f32, stage: &mut Stage) {
        match phase {
            Phase::Clash => {
                for side in Side::BOTH {
                    self.exit_start[side.index()] = stage.actor(side).position;
                }
                self.flash.trigger(&mut stage.flash);
                self.flash.advance(overflow_ms, &mut stage.flash);
            }
            Phase::TitleOut => {
                if let Some(title) = stage.title.as_mut() {
                    title.visible = false;
                    title.scale = self.cfg.title.hidden_scale;
                }
                self.reset_actors(stage);
                self.tweens[Phase::Clash.index()].reset();
                self.tweens[Phase::Exit.index()].reset();
                self.cycles += 1;
                debug!("clash loop completed cycle {}", self.cycles);
            }
            Phase::Exit | Phase::TitleIn | Phase::TitleHold => {}
        }
    }

    fn reset_actors(&self, stage: &mut Stage) {
        for side in Side::BOTH {
            let actor = stage.actor_mut(side);
            actor.position = self.cfg.blades.start[side.index()];
            actor.rotation = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Title;

    const BLUE_START: Vec2 = Vec2::new(-6.0, -3.0);
    const RED_START: Vec2 = Vec2::new(6.0, -3.0);
    const CLASH_POINT: Vec2 = Vec2::new(0.0, 1.0);

    fn started(with_title: bool) -> (Sequencer, Stage) {
        let mut seq = Sequencer::new(SequenceConfig::default()).unwrap();
        let mut stage = Stage::default();
        if with_title {
            stage.title = Some(Title::hidden(0.001));
        }
        seq.start(&mut stage);
        (seq, stage)
    }

    /// Steps `ms` of simulated time in fixed frames, tracking absolute time.
    fn run(seq: &mut Sequencer, stage: &mut Stage, now: &mut f64, ms: u32, frame: u32) {
        let mut left = ms;
        while left > 0 {
            let d = left.min(frame);
            *now += d as f64;
            seq.advance(
                FrameClock {
                    delta_ms: d as f32,
                    now_ms: *now,
                },
                stage,
            );
            left -= d;
        }
    }

    fn title(stage: &Stage) -> Title {
        stage.title.unwrap()
    }

    #[test]
    fn advance_before_start_is_a_no_op() {
        let mut seq = Sequencer::new(SequenceConfig::default()).unwrap();
        let mut stage = Stage::default();
        seq.advance(
            FrameClock {
                delta_ms: 500.0,
                now_ms: 500.0,
            },
            &mut stage,
        );
        assert_eq!(seq.active(), None);
        assert_eq!(stage.actors, Stage::default().actors);
    }

    #[test]
    fn start_places_blades_offscreen_unrotated() {
        let (seq, stage) = started(true);
        assert_eq!(seq.active(), Some(Phase::Clash));
        assert_eq!(stage.actor(Side::Blue).position, BLUE_START);
        assert_eq!(stage.actor(Side::Red).position, RED_START);
        assert_eq!(stage.actor(Side::Blue).rotation, 0.0);
        assert_eq!(stage.actor(Side::Red).rotation, 0.0);
    }

    #[test]
    fn phases_follow_fixed_order() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        let mut seen = vec![seq.active().unwrap()];
        for _ in 0..1200 {
            run(&mut seq, &mut stage, &mut now, 10, 10);
            let phase = seq.active().unwrap();
            if *seen.last().unwrap() != phase {
                seen.push(phase);
            }
        }
        let expected: Vec<Phase> = Phase::ALL.iter().cycle().take(seen.len()).copied().collect();
        assert_eq!(seen, expected);
        assert_eq!(seq.cycles(), 2);
    }

    #[test]
    fn clash_ends_at_half_blade_from_clash_point() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 1600, 10);
        assert_eq!(seq.active(), Some(Phase::Exit));
        for side in Side::BOTH {
            let d = stage.actor(side).position.distance(CLASH_POINT);
            assert!((d - 2.0).abs() < 1e-5, "{side:?} at distance {d}");
        }
        assert_eq!(stage.camera_offset.length(), 0.0);
    }

    #[test]
    fn jitter_is_equal_and_opposite_during_clash() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        let cfg = SequenceConfig::default();
        for _ in 0..159 {
            run(&mut seq, &mut stage, &mut now, 10, 10);
            let t = Easing::CubicInOut.apply(seq.progress(Phase::Clash));
            let power = math::clash_power(t);
            let mut jitter = [0.0; 2];
            for side in Side::BOTH {
                let actor = stage.actor(side);
                jitter[side.index()] =
                    actor.rotation - math::aim_angle(actor.position, cfg.blades.clash_point);
            }
            assert!((jitter[0] + jitter[1]).abs() < 1e-5);
            assert!((jitter[0] - power * 0.08).abs() < 1e-5);
        }
    }

    #[test]
    fn camera_shakes_only_mid_clash() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 800, 10);
        assert!(stage.camera_offset.length() > 0.0);
        assert!(stage.camera_offset.length() <= 0.08 * std::f32::consts::SQRT_2);
        run(&mut seq, &mut stage, &mut now, 800, 10);
        let settled = stage.camera_offset;
        assert_eq!(settled.length(), 0.0);
        run(&mut seq, &mut stage, &mut now, 3000, 10);
        assert_eq!(stage.camera_offset, settled);
    }

    #[test]
    fn exit_lands_on_exit_points() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 2300, 10);
        assert_eq!(seq.active(), Some(Phase::TitleIn));
        assert_eq!(stage.actor(Side::Blue).position, Vec2::new(-10.0, -6.0));
        assert_eq!(stage.actor(Side::Red).position, Vec2::new(10.0, -6.0));
    }

    #[test]
    fn exit_starts_where_clash_ended() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 1600, 10);
        let clash_end = stage.actors;
        run(&mut seq, &mut stage, &mut now, 1, 1);
        for side in Side::BOTH {
            let moved = stage.actor(side).position.distance(clash_end[side.index()].position);
            assert!(moved < 1e-3);
        }
    }

    #[test]
    fn title_fades_in_holds_and_fades_out() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;

        run(&mut seq, &mut stage, &mut now, 2290, 10);
        assert!(!title(&stage).visible);

        run(&mut seq, &mut stage, &mut now, 10, 10);
        let t = title(&stage);
        assert!(t.visible);
        assert_eq!(t.opacity, 0.0);
        assert_eq!(t.scale, 0.001);

        run(&mut seq, &mut stage, &mut now, 1300, 10);
        let t = title(&stage);
        assert_eq!(seq.active(), Some(Phase::TitleHold));
        assert_eq!(t.opacity, 1.0);
        assert_eq!(t.scale, 1.1);

        run(&mut seq, &mut stage, &mut now, 1200, 10);
        let t = title(&stage);
        assert_eq!(seq.active(), Some(Phase::TitleOut));
        assert_eq!((t.scale, t.opacity), (1.1, 1.0));
        assert!(t.roll.abs() <= 0.03);

        run(&mut seq, &mut stage, &mut now, 990, 10);
        let t = title(&stage);
        assert!(t.visible);
        assert!(t.scale > 1.1 && t.scale < 1.5);
        assert!(t.opacity > 0.0 && t.opacity < 1.0);
    }

    #[test]
    fn loop_closes_back_onto_first_cycle() {
        let (mut seq, mut stage) = started(true);
        let initial = stage.actors;
        let mut now = 0.0;

        run(&mut seq, &mut stage, &mut now, 5800, 10);
        assert_eq!(seq.cycles(), 1);
        assert_eq!(seq.active(), Some(Phase::Clash));
        assert_eq!(seq.progress(Phase::Clash), 0.0);
        assert_eq!(seq.progress(Phase::Exit), 0.0);
        for side in Side::BOTH {
            assert_eq!(stage.actor(side).position, initial[side.index()].position);
        }
        let t = title(&stage);
        assert!(!t.visible);
        assert_eq!(t.opacity, 0.0);
        assert_eq!(t.scale, 0.001);
    }

    #[test]
    fn every_cycle_replays_the_first() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 1000, 10);
        let first = stage.actors;
        run(&mut seq, &mut stage, &mut now, 5800 * 3, 10);
        assert_eq!(seq.cycles(), 3);
        assert_eq!(stage.actors, first);
    }

    #[test]
    fn flash_fires_once_per_clash_and_rests_exactly() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;

        run(&mut seq, &mut stage, &mut now, 1600 + 180, 10);
        assert_eq!(stage.flash.intensity, 6.0);
        assert_eq!(seq.active(), Some(Phase::Exit));

        run(&mut seq, &mut stage, &mut now, 180, 10);
        assert_eq!(stage.flash.intensity, 0.0);
        assert_eq!(stage.flash.beam_scale, 0.01);
        assert_eq!(stage.flash.beam_opacity, 0.0);

        for _ in 0..4 {
            run(&mut seq, &mut stage, &mut now, 5800, 10);
            assert_eq!(stage.flash.intensity, 0.0);
            assert_eq!(stage.flash.beam_scale, 0.01);
            assert_eq!(stage.flash.beam_opacity, 0.0);
        }
    }

    #[test]
    fn flash_does_not_delay_exit() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 1700, 10);
        assert_eq!(seq.active(), Some(Phase::Exit));
        assert!(stage.flash.intensity > 0.0);
        assert!(seq.progress(Phase::Exit) > 0.0);
    }

    #[test]
    fn frame_rate_does_not_change_the_outcome() {
        let (mut fine, mut fine_stage) = started(true);
        let (mut coarse, mut coarse_stage) = started(true);
        let (mut odd, mut odd_stage) = started(true);
        let (mut a, mut b, mut c) = (0.0, 0.0, 0.0);

        run(&mut fine, &mut fine_stage, &mut a, 2300, 1);
        run(&mut coarse, &mut coarse_stage, &mut b, 2300, 2300);
        run(&mut odd, &mut odd_stage, &mut c, 2300, 33);

        for stage in [&coarse_stage, &odd_stage] {
            assert_eq!(stage.actors[0].position, fine_stage.actors[0].position);
            assert_eq!(stage.actors[1].position, fine_stage.actors[1].position);
        }
        assert_eq!(fine.active(), coarse.active());
        assert_eq!(fine.active(), odd.active());
    }

    #[test]
    fn frame_rate_does_not_change_mid_phase_state() {
        // 1000 ms lands inside Clash, 2000 ms inside Exit after a crossing.
        for at in [1000, 2000] {
            let (mut reference, mut want) = started(true);
            let mut now = 0.0;
            run(&mut reference, &mut want, &mut now, at, 1);

            for frame in [7, 33, at] {
                let (mut seq, mut stage) = started(true);
                let mut now = 0.0;
                run(&mut seq, &mut stage, &mut now, at, frame);

                assert_eq!(seq.active(), reference.active(), "{frame} ms frames");
                let phase = seq.active().unwrap();
                assert!((seq.progress(phase) - reference.progress(phase)).abs() < 1e-5);
                assert!(seq.progress(phase) > 0.0 && seq.progress(phase) < 1.0);
                for side in Side::BOTH {
                    let (got, exp) = (stage.actor(side), want.actor(side));
                    assert!(
                        got.position.distance(exp.position) < 1e-4,
                        "{side:?} at {at} ms with {frame} ms frames: {} vs {}",
                        got.position,
                        exp.position
                    );
                    assert!((got.rotation - exp.rotation).abs() < 1e-4);
                }
                assert!(stage.camera_offset.distance(want.camera_offset) < 1e-4);
            }
        }
    }

    #[test]
    fn one_huge_frame_passes_every_boundary() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 5800 * 2 + 1600, 5800 * 2 + 1600);
        assert_eq!(seq.cycles(), 2);
        assert_eq!(seq.active(), Some(Phase::Exit));
        assert!(stage.flash.intensity == 0.0 && stage.flash.beam_opacity == 0.0);
    }

    #[test]
    fn missing_title_is_tolerated() {
        let (mut seq, mut stage) = started(false);
        let mut now = 0.0;
        run(&mut seq, &mut stage, &mut now, 5800 * 2, 16);
        assert!(stage.title.is_none());
        assert_eq!(seq.cycles(), 2);
    }

    #[test]
    fn late_title_joins_the_next_cycle() {
        let (mut seq, mut stage) = started(false);
        let mut now = 0.0;

        run(&mut seq, &mut stage, &mut now, 3000, 10);
        stage.title = Some(Title::hidden(0.001));
        run(&mut seq, &mut stage, &mut now, 600, 10);
        assert!(!title(&stage).visible);

        run(&mut seq, &mut stage, &mut now, 2200 + 2300, 10);
        let t = title(&stage);
        assert!(t.visible);
        assert_eq!(t.opacity, 0.0);
    }

    #[test]
    fn end_to_end_timeline() {
        let (mut seq, mut stage) = started(true);
        let mut now = 0.0;

        assert_eq!(stage.actor(Side::Blue).position, BLUE_START);
        assert_eq!(stage.actor(Side::Red).position, RED_START);

        run(&mut seq, &mut stage, &mut now, 1600, 16);
        for side in Side::BOTH {
            assert!((stage.actor(side).position.distance(CLASH_POINT) - 2.0).abs() < 1e-5);
        }

        run(&mut seq, &mut stage, &mut now, 700, 16);
        assert_eq!(stage.actor(Side::Blue).position, Vec2::new(-10.0, -6.0));
        assert_eq!(stage.actor(Side::Red).position, Vec2::new(10.0, -6.0));
        assert!(title(&stage).visible);

        run(&mut seq, &mut stage, &mut now, 1300, 16);
        assert_eq!(title(&stage).opacity, 1.0);

        run(&mut seq, &mut stage, &mut now, 2200, 16);
        assert_eq!(title(&stage).opacity, 0.0);
        assert_eq!(stage.actor(Side::Blue).position, BLUE_START);
        assert_eq!(stage.actor(Side::Red).position, RED_START);
        assert_eq!(seq.active(), Some(Phase::Clash));
        assert_eq!(seq.progress(Phase::Clash), 0.0);
    }
}
