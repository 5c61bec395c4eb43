use bevy::prelude::*;

/// Which blade an actor or entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Side {
    /// Enters from the left.
    Blue,
    /// Enters from the right.
    Red,
}

impl Side {
    /// Both sides in index order.
    pub const BOTH: [Side; 2] = [Side::Blue, Side::Red];

    /// Index into per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Blue => 0,
            Self::Red => 1,
        }
    }

    /// `+1` for blue, `-1` for red; mirrors the impact jitter.
    pub fn jitter_sign(self) -> f32 {
        match self {
            Self::Blue => 1.0,
            Self::Red => -1.0,
        }
    }
}

/// Main-chain phases in loop order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Phase {
    /// Blades approach and strike.
    Clash,
    /// Blades fly offscreen.
    Exit,
    /// Title grows in.
    TitleIn,
    /// Title floats.
    TitleHold,
    /// Title grows out and the loop resets.
    TitleOut,
}

impl Phase {
    /// All phases in loop order.
    pub const ALL: [Phase; 5] = [
        Phase::Clash,
        Phase::Exit,
        Phase::TitleIn,
        Phase::TitleHold,
        Phase::TitleOut,
    ];

    /// The phase entered when this one completes.
    pub fn next(self) -> Phase {
        match self {
            Self::Clash => Self::Exit,
            Self::Exit => Self::TitleIn,
            Self::TitleIn => Self::TitleHold,
            Self::TitleHold => Self::TitleOut,
            Self::TitleOut => Self::Clash,
        }
    }

    /// Index into per-phase arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Clash => 0,
            Self::Exit => 1,
            Self::TitleIn => 2,
            Self::TitleHold => 3,
            Self::TitleOut => 4,
        }
    }
}

/// Frame timing handed to the sequencer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    /// Wall-clock time since the previous frame.
    pub delta_ms: f32,
    /// Absolute time since startup.
    pub now_ms: f64,
}

/// One blade's pose on the view plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Actor {
    /// Hilt position (x, y).
    pub position: Vec2,
    /// Rotation around the view axis (radians).
    pub rotation: f32,
}

/// Title group state. Only exists once the font has loaded.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct Title {
    /// Whether the title is drawn at all.
    pub visible: bool,
    /// Uniform scale.
    pub scale: f32,
    /// Shared opacity of both lines.
    pub opacity: f32,
    /// Roll around the view axis (radians).
    pub roll: f32,
}

impl Title {
    /// A freshly loaded title: hidden, shrunk, transparent.
    pub fn hidden(scale: f32) -> Self {
        Self {
            visible: false,
            scale,
            opacity: 0.0,
            roll: 0.0,
        }
    }
}

/// Clash light and beam state, written only by the flash.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct FlashState {
    /// Clash light intensity in scene units.
    pub intensity: f32,
    /// Beam uniform scale.
    pub beam_scale: f32,
    /// Beam opacity.
    pub beam_opacity: f32,
}

impl FlashState {
    /// Dark, shrunk and invisible.
    pub fn rest(beam_scale: f32) -> Self {
        Self {
            intensity: 0.0,
            beam_scale,
            beam_opacity: 0.0,
        }
    }
}

impl Default for FlashState {
    fn default() -> Self {
        Self::rest(0.01)
    }
}

/// Everything the phases animate, in one place.
///
/// Phases receive `&mut Stage`; scene systems read it after the sequencer has
/// run and copy it onto entities.
#[derive(Resource, Clone, Debug, Default, Reflect)]
pub struct Stage {
    /// Blade poses, indexed by [`Side`].
    pub actors: [Actor; 2],
    /// Camera x/y offset from its rest position.
    pub camera_offset: Vec2,
    /// `None` until the title font resolves.
    pub title: Option<Title>,
    /// Clash light and beam.
    pub flash: FlashState,
}

impl Stage {
    /// Pose of one blade.
    pub fn actor(&self, side: Side) -> &Actor {
        &self.actors[side.index()]
    }

    /// Mutable pose of one blade.
    pub fn actor_mut(&mut self, side: Side) -> &mut Actor {
        &mut self.actors[side.index()]
    }
}
