//! The banner variant: an ordered strip of up to four icons.

use serde::{Deserialize, Serialize};

use super::repair::{self, Fields};
use super::{Action, Composition, CompositionKind, Parameter};
use crate::config::{
    BANNER_STORAGE_KEY, DEFAULT_BORDER_COLOR, DEFAULT_ICON_COLOR, ICON_CAPACITY,
};
use crate::export::{GlyphError, GlyphSet, Scene};
use crate::icon::SelectedIcon;

/// Persisted state of the banner editor.
///
/// # JSON Format
///
/// ```json
/// {
///   "iconSize": 96,
///   "iconSpacing": 16,
///   "bannerWidth": 600,
///   "bannerHeight": 600,
///   "borderWidth": 2,
///   "borderRadius": 16,
///   "borderColor": "#000000",
///   "iconColor": "#374151",
///   "borderOffset": 0,
///   "selectedIcons": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct BannerDocument {
    pub icon_size: u32,
    pub icon_spacing: u32,
    pub banner_width: u32,
    pub banner_height: u32,
    pub border_width: u32,
    pub border_radius: u32,
    pub border_color: String,
    pub icon_color: String,
    pub border_offset: u32,
    /// Icons in display order; order is user-controlled.
    pub selected_icons: Vec<SelectedIcon>,
}

impl Default for BannerDocument {
    fn default() -> Self {
        Self {
            icon_size: 96,
            icon_spacing: 16,
            banner_width: 600,
            banner_height: 600,
            border_width: 2,
            border_radius: 16,
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            icon_color: DEFAULT_ICON_COLOR.to_string(),
            border_offset: 0,
            selected_icons: Vec::new(),
        }
    }
}

impl BannerDocument {
    fn set_parameter(&mut self, parameter: Parameter, value: u32) {
        let field = match parameter {
            Parameter::IconSize => &mut self.icon_size,
            Parameter::IconSpacing => &mut self.icon_spacing,
            Parameter::CanvasWidth => &mut self.banner_width,
            Parameter::CanvasHeight => &mut self.banner_height,
            Parameter::BorderWidth => &mut self.border_width,
            Parameter::BorderRadius => &mut self.border_radius,
            Parameter::BorderOffset => &mut self.border_offset,
        };
        *field = value;
    }
}

impl Composition for BannerDocument {
    const KIND: CompositionKind = CompositionKind::Banner;
    const STORAGE_KEY: &'static str = BANNER_STORAGE_KEY;

    fn restore(raw: &str) -> Self {
        let Some(fields) = Fields::parse(raw) else {
            return Self::default();
        };
        let d = Self::default();

        let mut selected_icons: Vec<SelectedIcon> = fields
            .array("selectedIcons")
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, value)| repair::element("selectedIcons", i, value))
                    .collect()
            })
            .unwrap_or_default();
        if selected_icons.len() > ICON_CAPACITY {
            log::warn!(
                "persisted banner holds {} icons, keeping the first {ICON_CAPACITY}",
                selected_icons.len()
            );
            selected_icons.truncate(ICON_CAPACITY);
        }

        Self {
            icon_size: fields.get("iconSize", d.icon_size),
            icon_spacing: fields.get("iconSpacing", d.icon_spacing),
            banner_width: fields.get("bannerWidth", d.banner_width),
            banner_height: fields.get("bannerHeight", d.banner_height),
            border_width: fields.get("borderWidth", d.border_width),
            border_radius: fields.get("borderRadius", d.border_radius),
            border_color: fields.get("borderColor", d.border_color),
            icon_color: fields.get("iconColor", d.icon_color),
            border_offset: fields.get("borderOffset", d.border_offset),
            selected_icons,
        }
    }

    fn reduce(&mut self, action: Action) {
        match action {
            Action::SetParameter(parameter, value) => self.set_parameter(parameter, value),
            Action::SetBorderColor(color) => self.border_color = color,
            Action::SetIconColor(color) => self.icon_color = color,
            Action::SetIconColorAt { slot, .. } => {
                log::debug!("banner has no per-slot colours, ignoring colour for slot {slot}");
            }
            Action::AddIcon { icon, .. } => {
                if self.selected_icons.len() < ICON_CAPACITY {
                    self.selected_icons.push(icon);
                } else {
                    log::debug!("banner is full, ignoring {}", icon.record.object_id);
                }
            }
            Action::RemoveIcon(index) => {
                if index < self.selected_icons.len() {
                    self.selected_icons.remove(index);
                }
            }
            Action::ReorderIcons(icons) => self.selected_icons = icons,
            Action::SwapSlots(a, b) => {
                let len = self.selected_icons.len();
                if a < len && b < len {
                    self.selected_icons.swap(a, b);
                }
            }
        }
    }

    fn icons(&self) -> Vec<&SelectedIcon> {
        self.selected_icons.iter().collect()
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.banner_width, self.banner_height)
    }

    /// The preview is only rendered while at least one icon is selected.
    fn has_render_target(&self) -> bool {
        !self.selected_icons.is_empty()
    }

    fn scene(&self, glyphs: &GlyphSet) -> Result<Scene, GlyphError> {
        Scene::banner(self, glyphs)
    }
}
