use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::text::Font;

/// Title group; carries visibility, scale and roll.
#[derive(Component, Reflect)]
pub struct TitleRoot;

/// One extruded text line under [`TitleRoot`].
#[derive(Component)]
pub struct TitleLine;

/// Translucent material shared by every line; carries the title opacity.
#[derive(Resource)]
pub struct TitleMaterial(pub Handle<StandardMaterial>);

/// Where the title font load stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStatus {
    /// Still loading.
    Pending,
    /// Loaded and the title has been spawned.
    Ready,
    /// Failed; the title stays absent for this session.
    Failed,
}

/// Handle to the title font plus its resolution status.
#[derive(Resource)]
pub struct TitleFont {
    /// Asset handle; keeps the font alive.
    pub handle: Handle<Font>,
    /// Set once, never reset.
    pub status: FontStatus,
}

/// Asset stores the title build reads from and writes into.
#[derive(SystemParam)]
pub struct TitleAssets<'w> {
    pub(super) fonts: Res<'w, Assets<Font>>,
    pub(super) meshes: ResMut<'w, Assets<Mesh>>,
    pub(super) materials: ResMut<'w, Assets<StandardMaterial>>,
}
