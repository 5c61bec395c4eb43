//! Extruded text meshes built from TrueType outlines.
//!
//! Glyph outlines are read with `ttf-parser`, collected into one `lyon` path
//! per line, and tessellated into a front and a back cap. Side walls come
//! from the flattened contours. Each line is centered on its own origin.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use lyon::math::{Point, point};
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, TessellationError,
    VertexBuffers,
};
use thiserror::Error;
use ttf_parser::{Face, FaceParsingError, GlyphId, OutlineBuilder};

use super::GlyphStyle;

/// Why a font could not be turned into title meshes.
#[derive(Debug, Error)]
pub enum GlyphError {
    /// The bytes are not a usable font face.
    #[error("font could not be parsed: {0:?}")]
    Parse(FaceParsingError),
    /// Outlines that lyon refused to fill.
    #[error("glyph outlines could not be tessellated: {0:?}")]
    Tessellation(TessellationError),
}

/// Triangle soup for one extruded text line.
#[derive(Clone, Debug, Default)]
pub struct LineGeometry {
    /// Vertex positions, centered on the line's bounding box.
    pub positions: Vec<[f32; 3]>,
    /// Flat normals, one per vertex.
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Width and height of the line's outline bounds.
    pub size: Vec2,
}

impl LineGeometry {
    /// Converts to a render mesh.
    pub fn into_mesh(self) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
        .with_inserted_indices(Indices::U32(self.indices))
    }

    fn push_vertex(&mut self, at: Vec2, z: f32, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push([at.x, at.y, z]);
        self.normals.push(normal.to_array());
        index
    }

    /// One flat quad between two contour points.
    fn push_wall(&mut self, from: Point, to: Point, half_depth: f32) {
        let (a, b) = (Vec2::new(from.x, from.y), Vec2::new(to.x, to.y));
        let edge = b - a;
        let Some(dir) = edge.try_normalize() else {
            return;
        };
        let normal = Vec3::new(dir.y, -dir.x, 0.0);
        let i0 = self.push_vertex(a, half_depth, normal);
        let i1 = self.push_vertex(b, half_depth, normal);
        let i2 = self.push_vertex(b, -half_depth, normal);
        let i3 = self.push_vertex(a, -half_depth, normal);
        self.indices.extend_from_slice(&[i0, i1, i2, i0, i2, i3]);
    }
}

/// Feeds one glyph's contours into a lyon path, scaled and shifted along
/// the line.
struct GlyphPen<'a> {
    path: &'a mut lyon::path::path::Builder,
    scale: f32,
    origin_x: f32,
    open: bool,
}

impl GlyphPen<'_> {
    fn at(&self, x: f32, y: f32) -> Point {
        point(self.origin_x + x * self.scale, y * self.scale)
    }
}

impl OutlineBuilder for GlyphPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.path.end(true);
        }
        let at = self.at(x, y);
        self.path.begin(at);
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let at = self.at(x, y);
        self.path.line_to(at);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (ctrl, to) = (self.at(x1, y1), self.at(x, y));
        self.path.quadratic_bezier_to(ctrl, to);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1, c2, to) = (self.at(x1, y1), self.at(x2, y2), self.at(x, y));
        self.path.cubic_bezier_to(c1, c2, to);
    }

    fn close(&mut self) {
        if self.open {
            self.path.end(true);
            self.open = false;
        }
    }
}

/// Lays out `text` left to right on the baseline as one path.
fn outline_line(face: &Face, text: &str, size: f32) -> Path {
    let scale = size / f32::from(face.units_per_em());
    let mut builder = Path::builder();
    let mut origin_x = 0.0;

    for c in text.chars() {
        let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
        let mut pen = GlyphPen {
            path: &mut builder,
            scale,
            origin_x,
            open: false,
        };
        if face.outline_glyph(glyph, &mut pen).is_some() && pen.open {
            pen.close();
        }
        origin_x += f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
    }

    builder.build()
}

/// Builds the extruded mesh data for one line of text.
pub fn line_geometry(
    face: &Face,
    text: &str,
    style: &GlyphStyle,
) -> Result<LineGeometry, GlyphError> {
    let path = outline_line(face, text, style.size);

    let mut caps: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::tolerance(style.tolerance).with_fill_rule(FillRule::NonZero),
            &mut BuffersBuilder::new(&mut caps, |v: FillVertex| v.position().to_array()),
        )
        .map_err(GlyphError::Tessellation)?;

    let half_depth = style.depth / 2.0;
    let mut geo = LineGeometry::default();

    // Front cap, then the back cap with every triangle flipped.
    for (z, normal) in [(half_depth, Vec3::Z), (-half_depth, Vec3::NEG_Z)] {
        let base = geo.positions.len() as u32;
        for v in &caps.vertices {
            geo.push_vertex(Vec2::from(*v), z, normal);
        }
        for tri in caps.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] + base, tri[1] + base, tri[2] + base];
            if normal.z > 0.0 {
                geo.indices.extend_from_slice(&[a, b, c]);
            } else {
                geo.indices.extend_from_slice(&[a, c, b]);
            }
        }
    }

    for event in path.iter().flattened(style.tolerance) {
        match event {
            PathEvent::Line { from, to } => geo.push_wall(from, to, half_depth),
            PathEvent::End {
                last,
                first,
                close: true,
            } => geo.push_wall(last, first, half_depth),
            _ => {}
        }
    }

    center(&mut geo);
    Ok(geo)
}

/// Moves the outline bounds' center to the origin and records the size.
fn center(geo: &mut LineGeometry) {
    if geo.positions.is_empty() {
        return;
    }
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for p in &geo.positions {
        min = min.min(Vec2::new(p[0], p[1]));
        max = max.max(Vec2::new(p[0], p[1]));
    }
    let mid = (min + max) / 2.0;
    for p in &mut geo.positions {
        p[0] -= mid.x;
        p[1] -= mid.y;
    }
    geo.size = max - min;
}

/// Parses `font` once and builds every line.
pub fn build_lines(
    font: &[u8],
    lines: &[String],
    style: &GlyphStyle,
) -> Result<Vec<LineGeometry>, GlyphError> {
    let face = Face::parse(font, 0).map_err(GlyphError::Parse)?;
    lines
        .iter()
        .map(|line| line_geometry(&face, line, style))
        .collect()
}
