use bevy::prelude::*;

use super::SequenceConfig;
use super::entities::{FrameClock, Phase, Stage};
use super::sequencer::Sequencer;

/// Enters the first phase once the scene exists.
pub fn start_sequence(
    sequencer: Option<ResMut<Sequencer>>,
    mut stage: ResMut<Stage>,
    cfg: Res<SequenceConfig>,
) {
    let Some(mut sequencer) = sequencer else {
        return;
    };
    stage.flash.beam_scale = cfg.flash.rest_beam_scale;
    sequencer.start(&mut stage);
    info!(
        "clash loop started, {} ms per cycle",
        cfg.timing.cycle_ms()
    );
}

/// Feeds the frame delta and absolute time into the sequencer.
///
/// Uses `Local<Option<Phase>>` to log phase transitions without a resource.
pub fn advance_sequence(
    time: Res<Time>,
    sequencer: Option<ResMut<Sequencer>>,
    mut stage: ResMut<Stage>,
    mut last_phase: Local<Option<Phase>>,
) {
    let Some(mut sequencer) = sequencer else {
        return;
    };

    let clock = FrameClock {
        delta_ms: time.delta_secs() * 1000.0,
        now_ms: time.elapsed_secs_f64() * 1000.0,
    };
    sequencer.advance(clock, &mut stage);

    let phase = sequencer.active();
    if phase != *last_phase {
        if let Some(p) = phase {
            debug!(
                "entered {p:?} (cycle {}, {:.2} in)",
                sequencer.cycles(),
                sequencer.progress(p)
            );
        }
        *last_phase = phase;
    }
}
