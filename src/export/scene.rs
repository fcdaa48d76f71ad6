//! Resolution-independent draw lists for both composition variants.
//!
//! A [`Scene`] is what a renderer consumes: canvas size, background, an
//! optional rounded border and a list of tinted glyphs, all positioned in
//! logical pixels. The renderer applies the export scale.

use crate::composition::{BannerDocument, LogoDocument};
use crate::config::{BANNER_ITEM_PADDING, EXPORT_BACKGROUND};
use crate::icon::GlyphKey;

use super::glyph::{GlyphError, GlyphSet};

/// A rounded rectangle stroked along its edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub stroke_width: f32,
    pub radius: f32,
    pub color: String,
}

/// One glyph placed on the canvas, centred on `(center_x, center_y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub key: GlyphKey,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

/// Everything needed to draw one composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub border: Option<Border>,
    pub glyphs: Vec<PlacedGlyph>,
}

impl Scene {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: EXPORT_BACKGROUND.to_string(),
            border: None,
            glyphs: Vec::new(),
        }
    }

    /// Lays out a banner: a single centred row of padded items.
    pub fn banner(doc: &BannerDocument, glyphs: &GlyphSet) -> Result<Self, GlyphError> {
        let mut scene = Self::blank(doc.banner_width, doc.banner_height);
        let (width, height) = (doc.banner_width as f32, doc.banner_height as f32);
        let size = doc.icon_size as f32;
        let spacing = doc.icon_spacing as f32;

        let widths = doc
            .selected_icons
            .iter()
            .map(|icon| Ok(size * glyphs.get(&icon.glyph_key())?.aspect()))
            .collect::<Result<Vec<f32>, GlyphError>>()?;

        let gaps = widths.len().saturating_sub(1) as f32 * spacing;
        let row: f32 = widths.iter().map(|w| w + 2.0 * BANNER_ITEM_PADDING).sum::<f32>() + gaps;

        let mut x = (width - row) / 2.0;
        for (icon, glyph_width) in doc.selected_icons.iter().zip(widths) {
            scene.glyphs.push(PlacedGlyph {
                key: icon.glyph_key(),
                center_x: x + BANNER_ITEM_PADDING + glyph_width / 2.0,
                center_y: height / 2.0,
                width: glyph_width,
                height: size,
                color: doc.icon_color.clone(),
            });
            x += glyph_width + 2.0 * BANNER_ITEM_PADDING + spacing;
        }

        if doc.border_width > 0 {
            let stroke = doc.border_width as f32;
            let inset = doc.border_offset as f32 + stroke / 2.0;
            scene.border = Some(Border {
                x: inset,
                y: inset,
                width: width - 2.0 * inset,
                height: height - 2.0 * inset,
                stroke_width: stroke,
                radius: doc.border_radius as f32,
                color: doc.border_color.clone(),
            });
        }

        Ok(scene)
    }

    /// Lays out a logo: a 2x2 grid with holes left empty.
    pub fn logo(doc: &LogoDocument, glyphs: &GlyphSet) -> Result<Self, GlyphError> {
        let mut scene = Self::blank(doc.canvas_width, doc.canvas_height);
        let (width, height) = (doc.canvas_width as f32, doc.canvas_height as f32);
        let spacing = doc.icon_spacing as f32;
        let size = doc.icon_size as f32;
        let cell_w = (width - spacing * 3.0) / 2.0;
        let cell_h = (height - spacing * 3.0) / 2.0;

        for (slot, icon, color) in doc.placed() {
            let key = icon.glyph_key();
            let aspect = glyphs.get(&key)?.aspect();
            let (row, col) = ((slot / 2) as f32, (slot % 2) as f32);
            scene.glyphs.push(PlacedGlyph {
                key,
                center_x: spacing + col * (cell_w + spacing) + cell_w / 2.0,
                center_y: spacing + row * (cell_h + spacing) + cell_h / 2.0,
                width: size * aspect,
                height: size,
                color: color.to_string(),
            });
        }

        let stroke = doc.border_width as f32;
        if stroke > 0.0 {
            scene.border = Some(Border {
                x: stroke / 2.0,
                y: stroke / 2.0,
                width: width - stroke,
                height: height - stroke,
                stroke_width: stroke,
                radius: doc.border_radius as f32,
                color: doc.border_color.clone(),
            });
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{Action, Composition};
    use crate::export::glyph::tests::{SQUARE_GLYPH, WIDE_GLYPH, source_for};
    use crate::icon::tests::selected;

    fn glyphs_for(doc: &impl Composition) -> GlyphSet {
        let source = source_for(&[
            ("a", SQUARE_GLYPH),
            ("b", SQUARE_GLYPH),
            ("c", SQUARE_GLYPH),
            ("w", WIDE_GLYPH),
        ]);
        GlyphSet::load(&source, doc.icons()).unwrap()
    }

    #[test]
    fn banner_row_is_centred() {
        let mut doc = BannerDocument::default();
        for id in ["a", "b"] {
            doc.reduce(Action::AddIcon {
                icon: selected(id),
                slot: None,
            });
        }
        let scene = Scene::banner(&doc, &glyphs_for(&doc)).unwrap();

        // Two 96px items padded by 8 with a 16px gap: 112 + 16 + 112 = 240.
        let left = (600.0 - 240.0) / 2.0;
        assert_eq!(scene.glyphs.len(), 2);
        assert_eq!(scene.glyphs[0].center_x, left + 8.0 + 48.0);
        assert_eq!(scene.glyphs[1].center_x, left + 112.0 + 16.0 + 8.0 + 48.0);
        assert!(scene.glyphs.iter().all(|g| g.center_y == 300.0));
        assert!(scene.glyphs.iter().all(|g| g.color == "#374151"));
    }

    #[test]
    fn banner_glyph_width_follows_aspect() {
        let mut doc = BannerDocument::default();
        doc.reduce(Action::AddIcon {
            icon: selected("w"),
            slot: None,
        });
        let scene = Scene::banner(&doc, &glyphs_for(&doc)).unwrap();
        assert_eq!(scene.glyphs[0].height, 96.0);
        assert_eq!(scene.glyphs[0].width, 120.0);
        assert_eq!(scene.glyphs[0].center_x, 300.0);
    }

    #[test]
    fn banner_border_respects_offset() {
        let mut doc = BannerDocument::default();
        doc.border_offset = 10;
        doc.border_width = 4;
        let scene = Scene::banner(&doc, &GlyphSet::default()).unwrap();
        let border = scene.border.unwrap();
        assert_eq!(border.x, 12.0);
        assert_eq!(border.width, 600.0 - 24.0);
        assert_eq!(border.stroke_width, 4.0);

        doc.border_width = 0;
        assert!(Scene::banner(&doc, &GlyphSet::default()).unwrap().border.is_none());
    }

    #[test]
    fn logo_slots_follow_grid() {
        let mut doc = LogoDocument::default();
        doc.reduce(Action::AddIcon {
            icon: selected("a"),
            slot: Some(0),
        });
        doc.reduce(Action::AddIcon {
            icon: selected("c"),
            slot: Some(3),
        });
        doc.reduce(Action::SetIconColorAt {
            slot: 3,
            color: "#ff0000".into(),
        });
        let scene = Scene::logo(&doc, &glyphs_for(&doc)).unwrap();

        // cell = (512 - 48) / 2 = 232
        assert_eq!(scene.glyphs.len(), 2);
        assert_eq!((scene.glyphs[0].center_x, scene.glyphs[0].center_y), (132.0, 132.0));
        assert_eq!((scene.glyphs[1].center_x, scene.glyphs[1].center_y), (380.0, 380.0));
        assert_eq!(scene.glyphs[1].color, "#ff0000");
    }

    #[test]
    fn logo_border_is_inset_by_half_stroke() {
        let scene = Scene::logo(&LogoDocument::default(), &GlyphSet::default()).unwrap();
        assert!(scene.glyphs.is_empty());
        assert_eq!(scene.background, "#ffffff");
        let border = scene.border.unwrap();
        assert_eq!((border.x, border.y), (1.0, 1.0));
        assert_eq!((border.width, border.height), (510.0, 510.0));
        assert_eq!(border.radius, 16.0);
    }

    #[test]
    fn unloaded_glyph_fails_layout() {
        let mut doc = BannerDocument::default();
        doc.reduce(Action::AddIcon {
            icon: selected("a"),
            slot: None,
        });
        assert!(Scene::banner(&doc, &GlyphSet::default()).is_err());
    }
}
