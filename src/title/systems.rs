use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::text::Font;

use super::TitleConfig;
use super::entities::{
    FontStatus, TitleAssets, TitleFont, TitleLine, TitleMaterial, TitleRoot,
};
use super::glyphs::{self, LineGeometry};
use crate::sequence::{SequenceConfig, Stage, Title};

/// Starts the one and only font load.
pub fn load_title_font(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    cfg: Res<TitleConfig>,
) {
    let handle: Handle<Font> = asset_server.load(cfg.font_path.clone());
    commands.insert_resource(TitleFont {
        handle,
        status: FontStatus::Pending,
    });
}

/// Run condition: the font has neither loaded nor failed yet.
pub fn font_pending(font: Option<Res<TitleFont>>) -> bool {
    font.is_some_and(|f| f.status == FontStatus::Pending)
}

/// Maps an asset load state to the status it settles the font into.
fn resolve(state: &LoadState) -> Option<FontStatus> {
    match state {
        LoadState::Loaded => Some(FontStatus::Ready),
        LoadState::Failed(_) => Some(FontStatus::Failed),
        _ => None,
    }
}

/// Vertical offsets of `count` lines, top first, centered on zero.
fn line_offsets(count: usize, spacing: f32) -> Vec<f32> {
    let mid = (count as f32 - 1.0) / 2.0;
    (0..count).map(|i| (mid - i as f32) * spacing).collect()
}

/// Polls the font load. On success builds the title meshes and hands the
/// stage a hidden [`Title`]; on failure logs once and gives up.
pub fn await_title_font(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut assets: TitleAssets,
    mut font: ResMut<TitleFont>,
    mut stage: ResMut<Stage>,
    cfg: Res<TitleConfig>,
    seq: Res<SequenceConfig>,
) {
    let state = asset_server.load_state(font.handle.id());
    match resolve(&state) {
        Some(FontStatus::Ready) => {
            let Some(data) = assets.fonts.get(&font.handle).map(|f| f.data.clone()) else {
                return;
            };
            match glyphs::build_lines(&data, &cfg.lines, &cfg.glyphs) {
                Ok(lines) => {
                    let material = assets.materials.add(StandardMaterial {
                        base_color: cfg.color.with_alpha(0.0),
                        alpha_mode: AlphaMode::Blend,
                        unlit: true,
                        double_sided: true,
                        cull_mode: None,
                        ..default()
                    });
                    spawn_title(
                        &mut commands,
                        &mut assets.meshes,
                        &material,
                        lines,
                        &cfg,
                        &seq,
                    );
                    commands.insert_resource(TitleMaterial(material));
                    stage.title = Some(Title::hidden(seq.title.hidden_scale));
                    font.status = FontStatus::Ready;
                    info!("title font {} loaded", cfg.font_path);
                }
                Err(err) => {
                    warn!(
                        "title font {} unusable, continuing without title: {err}",
                        cfg.font_path
                    );
                    font.status = FontStatus::Failed;
                }
            }
        }
        Some(FontStatus::Failed) => {
            if let LoadState::Failed(err) = state {
                warn!(
                    "title font {} failed to load, continuing without title: {err}",
                    cfg.font_path
                );
            }
            font.status = FontStatus::Failed;
        }
        Some(FontStatus::Pending) | None => {}
    }
}

fn spawn_title(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    lines: Vec<LineGeometry>,
    cfg: &TitleConfig,
    seq: &SequenceConfig,
) {
    let root = commands
        .spawn((
            Name::new("Title"),
            TitleRoot,
            Transform::from_scale(Vec3::splat(seq.title.hidden_scale)),
            Visibility::Hidden,
        ))
        .id();

    let offsets = line_offsets(lines.len(), cfg.line_spacing);
    for ((geo, y), text) in lines.into_iter().zip(offsets).zip(&cfg.lines) {
        debug!("title line {text}: {:.2} x {:.2}", geo.size.x, geo.size.y);
        let line = commands
            .spawn((
                Name::new(format!("TitleLine({text})")),
                TitleLine,
                Mesh3d(meshes.add(geo.into_mesh())),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(0.0, y, cfg.depth_offset),
            ))
            .id();
        commands.entity(root).add_child(line);
    }
}

/// Writes title visibility, scale, roll and the shared material opacity.
pub fn apply_title(
    stage: Res<Stage>,
    material: Option<Res<TitleMaterial>>,
    mut root_q: Query<(&mut Visibility, &mut Transform), With<TitleRoot>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !stage.is_changed() {
        return;
    }
    let Some(title) = stage.title else {
        return;
    };
    let Ok((mut visibility, mut transform)) = root_q.single_mut() else {
        return;
    };

    *visibility = if title.visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    transform.scale = Vec3::splat(title.scale);
    transform.rotation = Quat::from_rotation_z(title.roll);

    let Some(material) = material else {
        return;
    };
    if let Some(mat) = materials.get_mut(&material.0) {
        mat.base_color.set_alpha(title.opacity);
    }
}
