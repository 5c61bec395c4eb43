//! Scene setup and per-frame scene writes.
//!
//! Spawns the camera, lights, starfield, both blades and the clash flash
//! props at startup. Every frame it spins the starfield and copies the
//! sequencer's [`Stage`](crate::sequence::Stage) onto those entities.

mod entities;
mod startup_systems;
mod systems;

pub use entities::{Blade, Starfield};

use bevy::prelude::*;

use crate::sequence::SequenceSet;

/// Configuration for everything the scene spawns.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct SceneConfig {
    /// Camera placement, lens and post-processing.
    pub camera: CameraSettings,
    /// Ambient, key and clash lighting.
    pub lighting: LightingSettings,
    /// Background point cloud.
    pub starfield: StarfieldSettings,
    /// Blade and hilt look.
    pub blades: BladeLook,
    /// Where the clash light and beam sit on the view plane.
    pub flash_point: Vec2,
    /// Background clear color.
    pub clear_color: Color,
}

/// Camera lens and rest position.
#[derive(Clone, Debug, Reflect)]
pub struct CameraSettings {
    /// Rest position; the clash shake offsets x/y from here.
    pub position: Vec3,
    /// Vertical field of view (degrees).
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Bloom post-processing intensity.
    pub bloom_intensity: f32,
}

/// Light colors and strengths.
#[derive(Clone, Debug, Reflect)]
pub struct LightingSettings {
    /// Ambient fill color.
    pub ambient_color: Color,
    /// Ambient brightness.
    pub ambient_brightness: f32,
    /// Key point light position.
    pub key_position: Vec3,
    /// Key point light intensity in scene units.
    pub key_intensity: f32,
    /// Key point light range.
    pub key_range: f32,
    /// Clash light range.
    pub clash_range: f32,
    /// Converts scene intensity units to point-light lumens.
    pub lumens_per_unit: f32,
}

/// Starfield shape and motion.
#[derive(Clone, Debug, Reflect)]
pub struct StarfieldSettings {
    /// Number of stars.
    pub count: usize,
    /// Half the edge of the cube stars are scattered in.
    pub half_extent: f32,
    /// RNG seed for star placement.
    pub seed: u64,
    /// Spin around Y (radians per second of absolute time).
    pub spin_rate: f32,
}

/// Blade and hilt dimensions and colors.
#[derive(Clone, Debug, Reflect)]
pub struct BladeLook {
    /// Blade cylinder radius.
    pub blade_radius: f32,
    /// Blade base and emissive colors, indexed by [`Side`](crate::sequence::Side).
    pub colors: [(Color, LinearRgba); 2],
    /// Hilt radius at the blade end.
    pub hilt_radius_top: f32,
    /// Hilt radius at the pommel.
    pub hilt_radius_bottom: f32,
    /// Hilt length.
    pub hilt_length: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings {
                position: Vec3::new(0.0, 0.0, 10.0),
                fov_degrees: 65.0,
                near: 0.1,
                far: 2000.0,
                bloom_intensity: 0.3,
            },
            lighting: LightingSettings {
                ambient_color: Color::srgb_u8(0x40, 0x40, 0x40),
                ambient_brightness: 300.0,
                key_position: Vec3::new(5.0, 5.0, 10.0),
                key_intensity: 2.0,
                key_range: 50.0,
                clash_range: 8.0,
                lumens_per_unit: 250_000.0,
            },
            starfield: StarfieldSettings {
                count: 1000,
                half_extent: 80.0,
                seed: 7,
                spin_rate: 0.1,
            },
            blades: BladeLook {
                blade_radius: 0.08,
                colors: [
                    (Color::srgb_u8(0x66, 0xaa, 0xff), LinearRgba::rgb(1.2, 4.0, 18.0)),
                    (Color::srgb_u8(0xff, 0x66, 0x66), LinearRgba::rgb(18.0, 1.2, 1.2)),
                ],
                hilt_radius_top: 0.12,
                hilt_radius_bottom: 0.14,
                hilt_length: 0.6,
            },
            flash_point: Vec2::new(0.0, -2.5),
            clear_color: Color::BLACK,
        }
    }
}

/// Scene construction plus the per-frame scene writes.
pub struct ScenePlugin(pub SceneConfig);

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SceneConfig>()
            .register_type::<Blade>()
            .register_type::<Starfield>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .add_systems(
                Startup,
                (
                    startup_systems::spawn_camera,
                    startup_systems::spawn_lights,
                    startup_systems::spawn_starfield,
                    startup_systems::spawn_blades,
                    startup_systems::spawn_flash_props,
                ),
            )
            .add_systems(Update, (systems::spin_starfield, systems::fit_viewport))
            .add_systems(
                Update,
                (
                    systems::apply_blades,
                    systems::apply_camera,
                    systems::apply_flash,
                )
                    .in_set(SequenceSet::Apply),
            );
    }
}
