use bevy::prelude::*;
use bevy::window::WindowResized;

use super::SceneConfig;
use super::entities::{Blade, ClashBeam, ClashLight, MainCamera, Starfield};
use crate::sequence::Stage;

// ── Update: continuous effects ──────────────────────────────────────

/// Slow constant spin keyed to absolute time, independent of any phase.
pub fn spin_starfield(
    time: Res<Time>,
    cfg: Res<SceneConfig>,
    mut query: Query<&mut Transform, With<Starfield>>,
) {
    let angle = time.elapsed_secs() * cfg.starfield.spin_rate;
    for mut transform in &mut query {
        transform.rotation = Quat::from_rotation_y(angle);
    }
}

/// Keeps the camera aspect ratio in step with the window.
pub fn fit_viewport(
    mut resized: MessageReader<WindowResized>,
    mut query: Query<&mut Projection, With<MainCamera>>,
) {
    let mut latest = None;
    for ev in resized.read() {
        latest = Some((ev.width, ev.height));
    }
    let Some((width, height)) = latest else {
        return;
    };
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    for mut projection in &mut query {
        if let Projection::Perspective(p) = &mut *projection {
            p.aspect_ratio = width / height;
        }
    }
    debug!("viewport resized to {width}x{height}");
}

// ── Update: stage → scene ───────────────────────────────────────────

/// Writes blade poses. The stage's rotation turns the blade's local `+Y`.
pub fn apply_blades(stage: Res<Stage>, mut query: Query<(&Blade, &mut Transform)>) {
    if !stage.is_changed() {
        return;
    }
    for (blade, mut transform) in &mut query {
        let actor = stage.actor(blade.0);
        transform.translation.x = actor.position.x;
        transform.translation.y = actor.position.y;
        transform.rotation = Quat::from_rotation_z(actor.rotation);
    }
}

/// Offsets the camera by the clash shake and re-aims it at the origin.
pub fn apply_camera(
    stage: Res<Stage>,
    cfg: Res<SceneConfig>,
    mut query: Query<&mut Transform, With<MainCamera>>,
) {
    if !stage.is_changed() {
        return;
    }
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    let position = cfg.camera.position + stage.camera_offset.extend(0.0);
    *transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y);
}

/// Writes clash light intensity, beam scale and beam opacity.
pub fn apply_flash(
    stage: Res<Stage>,
    cfg: Res<SceneConfig>,
    mut light_q: Query<&mut PointLight, With<ClashLight>>,
    mut beam_q: Query<(&mut Transform, &MeshMaterial3d<StandardMaterial>), With<ClashBeam>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !stage.is_changed() {
        return;
    }
    let flash = stage.flash;

    if let Ok(mut light) = light_q.single_mut() {
        light.intensity = flash.intensity * cfg.lighting.lumens_per_unit;
    }

    let Ok((mut transform, mat_handle)) = beam_q.single_mut() else {
        return;
    };
    transform.scale = Vec3::splat(flash.beam_scale);
    if let Some(mat) = materials.get_mut(&mat_handle.0) {
        mat.base_color.set_alpha(flash.beam_opacity);
    }
}
