//! Two-line extruded title shown between clash cycles.
//!
//! The font is an asynchronously loaded asset. Until it resolves the stage
//! carries no title and the title phases do nothing; once it loads the glyph
//! meshes are built exactly once. A failed load is logged and never retried.

mod entities;
mod glyphs;
mod systems;

use bevy::prelude::*;

use crate::sequence::SequenceSet;

/// Title text and look.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct TitleConfig {
    /// Font asset path, resolved by the asset server.
    pub font_path: String,
    /// One mesh per line, top to bottom.
    pub lines: Vec<String>,
    /// Material color; the sequencer drives its alpha.
    pub color: Color,
    /// Glyph size and extrusion.
    pub glyphs: GlyphStyle,
    /// Vertical distance between line centers.
    pub line_spacing: f32,
    /// Z offset of the lines inside the title group.
    pub depth_offset: f32,
}

/// How glyph outlines become meshes.
#[derive(Clone, Debug, Reflect)]
pub struct GlyphStyle {
    /// Em size in world units.
    pub size: f32,
    /// Extrusion depth.
    pub depth: f32,
    /// Curve flattening tolerance in world units.
    pub tolerance: f32,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            font_path: "fonts/title.ttf".into(),
            lines: vec!["INFORMATICA".into(), "GRAFICA".into()],
            color: Color::srgb_u8(0xff, 0xee, 0x33),
            glyphs: GlyphStyle {
                size: 1.2,
                depth: 0.25,
                tolerance: 0.005,
            },
            line_spacing: 1.4,
            depth_offset: -2.0,
        }
    }
}

/// Loads the title font and builds the title once it arrives.
pub struct TitlePlugin(pub TitleConfig);

impl Plugin for TitlePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TitleConfig>()
            .register_type::<entities::TitleRoot>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::load_title_font)
            .add_systems(
                Update,
                systems::await_title_font
                    .before(SequenceSet::Advance)
                    .run_if(systems::font_pending),
            )
            .add_systems(Update, systems::apply_title.in_set(SequenceSet::Apply));
    }
}
