//! Rasterization of scenes with resvg/tiny-skia.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{self, Paint, PathBuilder, Pixmap, Stroke, Transform};
use resvg::usvg::{Options, Tree};
use thiserror::Error;

use crate::color::{ColorError, parse_color, to_hex};
use crate::icon::GlyphKey;

use super::glyph::{GlyphError, GlyphSet};
use super::scene::{Border, PlacedGlyph, Scene};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Glyph(#[from] GlyphError),

    #[error("failed to parse tinted glyph {key}: {source}")]
    Svg {
        key: GlyphKey,
        #[source]
        source: resvg::usvg::Error,
    },

    /// Failure reported by a renderer other than [`SkiaRenderer`].
    #[error("{0}")]
    Backend(String),
}

/// Turns a [`Scene`] into pixels.
pub trait Renderer {
    /// Rasterizes `scene` at `scale` physical pixels per logical pixel.
    fn rasterize(
        &self,
        scene: &Scene,
        glyphs: &GlyphSet,
        scale: f32,
    ) -> Result<RgbaImage, RenderError>;
}

// ============================================================================
// SkiaRenderer
// ============================================================================

/// Renders with tiny-skia for shapes and resvg for glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaRenderer;

impl Renderer for SkiaRenderer {
    fn rasterize(
        &self,
        scene: &Scene,
        glyphs: &GlyphSet,
        scale: f32,
    ) -> Result<RgbaImage, RenderError> {
        let width = (scene.width as f32 * scale).round() as u32;
        let height = (scene.height as f32 * scale).round() as u32;
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;

        let bg = parse_color(&scene.background)?;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.red, bg.green, bg.blue, 255));

        if let Some(border) = &scene.border {
            stroke_border(&mut pixmap, border, scale)?;
        }

        let options = Options::default();
        for placed in &scene.glyphs {
            draw_glyph(&mut pixmap, placed, glyphs, &options, scale)?;
        }

        Ok(to_straight_rgba(&pixmap))
    }
}

fn stroke_border(pixmap: &mut Pixmap, border: &Border, scale: f32) -> Result<(), RenderError> {
    let color = parse_color(&border.color)?;
    let (x, y) = (border.x * scale, border.y * scale);
    let (w, h) = (border.width * scale, border.height * scale);
    if w <= 0.0 || h <= 0.0 || border.stroke_width <= 0.0 {
        log::debug!("border collapsed to {w}x{h}, skipping");
        return Ok(());
    }
    let radius = (border.radius * scale).min(w / 2.0).min(h / 2.0).max(0.0);
    let Some(path) = rounded_rect(x, y, w, h, radius) else {
        return Ok(());
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color.red, color.green, color.blue, 255);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: border.stroke_width * scale,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    Ok(())
}

/// Builds a rounded rectangle from lines and cubic corner arcs.
fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<tiny_skia::Path> {
    // Control point distance approximating a quarter circle.
    let k = r * 0.552_284_8;
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

fn draw_glyph(
    pixmap: &mut Pixmap,
    placed: &PlacedGlyph,
    glyphs: &GlyphSet,
    options: &Options,
    scale: f32,
) -> Result<(), RenderError> {
    let glyph = glyphs.get(&placed.key)?;
    let color = to_hex(parse_color(&placed.color)?);
    let markup = tint_svg(&glyph.markup, &color);
    let tree = Tree::from_str(&markup, options).map_err(|source| RenderError::Svg {
        key: placed.key.clone(),
        source,
    })?;

    let size = tree.size();
    let s = placed.height * scale / size.height();
    let tx = placed.center_x * scale - size.width() * s / 2.0;
    let ty = placed.center_y * scale - size.height() * s / 2.0;
    resvg::render(&tree, Transform::from_row(s, 0.0, 0.0, s, tx, ty), &mut pixmap.as_mut());
    Ok(())
}

// ============================================================================
// SVG Tinting
// ============================================================================

/// Paint values a tint leaves alone.
const UNPAINTED: [&str; 2] = ["none", "transparent"];

/// Paints a monochrome glyph in `hex_color`.
///
/// Every `fill` and `stroke` value is rewritten in one pass, except
/// [`UNPAINTED`] ones. Glyphs that rely on the inherited default fill get
/// one on the root element.
pub fn tint_svg(svg: &str, hex_color: &str) -> String {
    let mut tinted = String::with_capacity(svg.len() + hex_color.len() + 8);
    let mut rest = svg;
    while let Some(value_at) = next_paint_value(rest) {
        let Some(len) = rest[value_at..].find('"') else {
            break;
        };
        let value = &rest[value_at..value_at + len];
        tinted.push_str(&rest[..value_at]);
        tinted.push_str(if UNPAINTED.contains(&value) { value } else { hex_color });
        rest = &rest[value_at + len..];
    }
    tinted.push_str(rest);
    with_root_fill(tinted, hex_color)
}

/// Offset of the first `fill` or `stroke` attribute value in `svg`.
fn next_paint_value(svg: &str) -> Option<usize> {
    ["fill=\"", "stroke=\""]
        .into_iter()
        .filter_map(|attr| svg.find(attr).map(|at| at + attr.len()))
        .min()
}

fn with_root_fill(mut svg: String, hex_color: &str) -> String {
    let Some(open) = svg.find("<svg") else {
        return svg;
    };
    let Some(close) = svg[open..].find('>').map(|i| open + i) else {
        return svg;
    };
    if !svg[open..close].contains("fill=\"") {
        svg.insert_str(open + "<svg".len(), &format!(" fill=\"{hex_color}\""));
    }
    svg
}

// ============================================================================
// Pixel Conversion
// ============================================================================

/// Copies a pixmap into a straight-alpha image.
///
/// tiny-skia keeps premultiplied pixels in row-major order; PNG wants
/// them demultiplied.
fn to_straight_rgba(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}
