//! Composition documents and the actions that mutate them.
//!
//! A composition document is the whole persisted editor state: layout
//! parameters plus the chosen icons. Two product variants exist:
//!
//! - [`BannerDocument`]: an ordered, reorderable strip of icons
//! - [`LogoDocument`]: a fixed 2x2 grid with holes and per-slot colours
//!
//! Both implement [`Composition`], which is what the [`Store`](crate::Store),
//! the [`ArrangementSurface`](crate::ArrangementSurface) and the export
//! pipeline are generic over. Every mutation is expressed as an [`Action`]
//! and applied by [`Composition::reduce`], which never fails: actions that do
//! not apply to the current state are ignored.

mod banner;
mod logo;
mod repair;
#[cfg(test)]
mod tests_prop;

pub use banner::BannerDocument;
pub use logo::LogoDocument;

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::export::{GlyphError, GlyphSet, Scene};
use crate::icon::SelectedIcon;

// ============================================================================
// Kinds
// ============================================================================

/// The product variant a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CompositionKind {
    /// Horizontal, reorderable strip.
    Banner,
    /// Fixed 2x2 grid.
    Logo,
}

impl CompositionKind {
    /// Where the export pipeline takes its snapshot from.
    pub fn export_source(self) -> ExportSource {
        match self {
            Self::Banner => ExportSource::Live,
            Self::Logo => ExportSource::Offscreen,
        }
    }
}

impl fmt::Display for CompositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Banner => f.write_str("banner"),
            Self::Logo => f.write_str("logo"),
        }
    }
}

/// Snapshot origin for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSource {
    /// The on-screen preview, as currently mounted.
    Live,
    /// A replica built off-screen from the document values.
    Offscreen,
}

// ============================================================================
// Parameters
// ============================================================================

/// Scalar layout parameters, all in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Parameter {
    IconSize,
    IconSpacing,
    CanvasWidth,
    CanvasHeight,
    BorderWidth,
    BorderRadius,
    /// Inset of the banner border from the canvas edge.
    BorderOffset,
}

impl Parameter {
    pub const ALL: [Parameter; 7] = [
        Self::IconSize,
        Self::IconSpacing,
        Self::CanvasWidth,
        Self::CanvasHeight,
        Self::BorderWidth,
        Self::BorderRadius,
        Self::BorderOffset,
    ];

    /// The range the editing controls accept for this parameter.
    ///
    /// The store does not enforce these; they are input limits only.
    pub fn range(self, kind: CompositionKind) -> RangeInclusive<u32> {
        match self {
            Self::IconSize => match kind {
                CompositionKind::Banner => 16..=96,
                CompositionKind::Logo => 16..=200,
            },
            Self::IconSpacing => 8..=96,
            Self::CanvasWidth => 100..=2000,
            Self::CanvasHeight => 50..=1000,
            Self::BorderWidth => 1..=10,
            Self::BorderRadius => 0..=32,
            Self::BorderOffset => 0..=32,
        }
    }

    /// Clamps a value into [`range`](Self::range).
    pub fn clamp(self, kind: CompositionKind, value: u32) -> u32 {
        let range = self.range(kind);
        value.clamp(*range.start(), *range.end())
    }

    /// Returns true if the variant has this parameter at all.
    pub fn applies_to(self, kind: CompositionKind) -> bool {
        !matches!((self, kind), (Self::BorderOffset, CompositionKind::Logo))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IconSize => "icon-size",
            Self::IconSpacing => "icon-spacing",
            Self::CanvasWidth => "canvas-width",
            Self::CanvasHeight => "canvas-height",
            Self::BorderWidth => "border-width",
            Self::BorderRadius => "border-radius",
            Self::BorderOffset => "border-offset",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// A single atomic mutation of a composition document.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Sets a layout parameter. Values are not range checked.
    SetParameter(Parameter, u32),
    SetBorderColor(String),
    /// Sets the global icon colour and, where per-slot colours exist,
    /// resets all of them to it.
    SetIconColor(String),
    /// Sets one slot's colour without touching the others.
    SetIconColorAt { slot: usize, color: String },
    /// Adds an icon at the end (banner) or into an empty slot (logo).
    /// No-op at capacity.
    AddIcon {
        icon: SelectedIcon,
        slot: Option<usize>,
    },
    /// Removes by index (banner, shifting left) or clears a slot (logo).
    RemoveIcon(usize),
    /// Replaces the icon order wholesale, as committed by a drag gesture.
    /// The sequence is trusted to be a permutation of the current one.
    ReorderIcons(Vec<SelectedIcon>),
    /// Exchanges two positions.
    SwapSlots(usize, usize),
}

// ============================================================================
// Composition Trait
// ============================================================================

/// Behaviour shared by both document variants.
pub trait Composition: Clone + Default + PartialEq + fmt::Debug + Serialize {
    /// Which product variant this document is.
    const KIND: CompositionKind;

    /// Key the document is persisted under.
    const STORAGE_KEY: &'static str;

    /// Rebuilds a document from its persisted JSON.
    ///
    /// Never fails: unreadable input yields [`Default::default`], and each
    /// missing or malformed field is replaced by its default individually.
    fn restore(raw: &str) -> Self;

    /// Applies one action in place.
    fn reduce(&mut self, action: Action);

    /// The placed icons in display order (holes skipped).
    fn icons(&self) -> Vec<&SelectedIcon>;

    /// Canvas size in logical pixels.
    fn canvas_size(&self) -> (u32, u32);

    /// Whether the on-screen arrangement is currently rendered at all.
    fn has_render_target(&self) -> bool;

    /// Builds the draw list for this document.
    fn scene(&self, glyphs: &GlyphSet) -> Result<Scene, GlyphError>;

    /// Number of placed icons.
    fn icon_count(&self) -> usize {
        self.icons().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_ranges_follow_variant() {
        assert_eq!(
            Parameter::IconSize.range(CompositionKind::Banner),
            16..=96
        );
        assert_eq!(Parameter::IconSize.range(CompositionKind::Logo), 16..=200);
        assert_eq!(
            Parameter::CanvasWidth.range(CompositionKind::Logo),
            100..=2000
        );
    }

    #[test]
    fn clamp_pins_to_range() {
        assert_eq!(Parameter::CanvasHeight.clamp(CompositionKind::Banner, 10), 50);
        assert_eq!(Parameter::CanvasHeight.clamp(CompositionKind::Banner, 5000), 1000);
        assert_eq!(Parameter::BorderRadius.clamp(CompositionKind::Logo, 12), 12);
    }

    #[test]
    fn border_offset_is_banner_only() {
        assert!(Parameter::BorderOffset.applies_to(CompositionKind::Banner));
        assert!(!Parameter::BorderOffset.applies_to(CompositionKind::Logo));
        assert!(Parameter::IconSize.applies_to(CompositionKind::Logo));
    }

    #[test]
    fn export_source_per_kind() {
        assert_eq!(CompositionKind::Banner.export_source(), ExportSource::Live);
        assert_eq!(CompositionKind::Logo.export_source(), ExportSource::Offscreen);
    }
}
