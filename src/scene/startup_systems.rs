use std::f32::consts::FRAC_PI_2;

use bevy::asset::RenderAssetUsages;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::render::view::Hdr;

use super::SceneConfig;
use super::entities::{Blade, ClashBeam, ClashLight, MainCamera, Starfield};
use crate::math;
use crate::sequence::{SequenceConfig, Side};

// ── Startup ─────────────────────────────────────────────────────────

/// Spawns the HDR camera with bloom, aimed at the origin.
pub fn spawn_camera(mut commands: Commands, cfg: Res<SceneConfig>) {
    let cam = &cfg.camera;
    let light = &cfg.lighting;
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: cam.fov_degrees.to_radians(),
            near: cam.near,
            far: cam.far,
            ..default()
        }),
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: cam.bloom_intensity,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        AmbientLight {
            color: light.ambient_color,
            brightness: light.ambient_brightness,
            ..default()
        },
        Transform::from_translation(cam.position).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));
}

/// Spawns the key point light.
pub fn spawn_lights(mut commands: Commands, cfg: Res<SceneConfig>) {
    let light = &cfg.lighting;
    commands.spawn((
        Name::new("KeyLight"),
        PointLight {
            intensity: light.key_intensity * light.lumens_per_unit,
            range: light.key_range,
            ..default()
        },
        Transform::from_translation(light.key_position),
    ));
}

/// Builds one point-list mesh from seeded random positions.
pub fn spawn_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<SceneConfig>,
) {
    let s = &cfg.starfield;
    let positions = math::star_positions(s.count, s.half_extent, s.seed);
    let mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions);

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::rgb(2.0, 2.0, 2.0),
        unlit: true,
        ..default()
    });

    commands.spawn((
        Name::new("Starfield"),
        Starfield,
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(material),
        Transform::default(),
    ));
}

/// Spawns both blades: an emissive blade above the hilt origin and a
/// metallic hilt below it.
pub fn spawn_blades(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<SceneConfig>,
    seq: Res<SequenceConfig>,
) {
    let look = &cfg.blades;
    let length = seq.blades.length;

    let blade_mesh = meshes.add(Cylinder::new(look.blade_radius, length));
    let hilt_mesh = meshes.add(ConicalFrustum {
        radius_top: look.hilt_radius_top,
        radius_bottom: look.hilt_radius_bottom,
        height: look.hilt_length,
    });
    let hilt_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xb5, 0xb5, 0xb5),
        metallic: 1.0,
        perceptual_roughness: 0.25,
        ..default()
    });

    for side in Side::BOTH {
        let (base_color, emissive) = look.colors[side.index()];
        let start = seq.blades.start[side.index()];

        let root = commands
            .spawn((
                Name::new(format!("Blade({side:?})")),
                Blade(side),
                Transform::from_xyz(start.x, start.y, 0.0),
                Visibility::default(),
            ))
            .id();

        let blade = commands
            .spawn((
                Mesh3d(blade_mesh.clone()),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color,
                    emissive,
                    ..default()
                })),
                Transform::from_xyz(0.0, length / 2.0, 0.0),
            ))
            .id();
        let hilt = commands
            .spawn((
                Mesh3d(hilt_mesh.clone()),
                MeshMaterial3d(hilt_material.clone()),
                Transform::from_xyz(0.0, -look.hilt_length / 2.0, 0.0),
            ))
            .id();
        commands.entity(root).add_children(&[blade, hilt]);
    }
}

/// Spawns the dark clash light and the shrunk, transparent beam.
pub fn spawn_flash_props(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<SceneConfig>,
    seq: Res<SequenceConfig>,
) {
    let at = cfg.flash_point.extend(0.0);

    commands.spawn((
        Name::new("ClashLight"),
        ClashLight,
        PointLight {
            intensity: 0.0,
            range: cfg.lighting.clash_range,
            ..default()
        },
        Transform::from_translation(at),
    ));

    let beam_mesh = meshes.add(ConicalFrustum {
        radius_top: 0.08,
        radius_bottom: 0.3,
        height: 2.5,
    });
    let beam_material = materials.add(StandardMaterial {
        base_color: Color::srgba_u8(0xff, 0xff, 0xee, 0),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        Name::new("ClashBeam"),
        ClashBeam,
        Mesh3d(beam_mesh),
        MeshMaterial3d(beam_material),
        Transform::from_translation(at)
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2))
            .with_scale(Vec3::splat(seq.flash.rest_beam_scale)),
    ));
}
