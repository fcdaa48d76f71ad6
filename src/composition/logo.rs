//! The logo variant: a 2x2 grid of slots, each with its own colour.

use std::array;

use serde::{Deserialize, Serialize};

use super::repair::{self, Fields};
use super::{Action, Composition, CompositionKind, Parameter};
use crate::config::{DEFAULT_BORDER_COLOR, DEFAULT_ICON_COLOR, ICON_CAPACITY, LOGO_STORAGE_KEY};
use crate::export::{GlyphError, GlyphSet, Scene};
use crate::icon::SelectedIcon;

/// Persisted state of the logo editor.
///
/// Slots are positional: removing an icon leaves a hole rather than shifting
/// the others. `icon_colors[i]` is the colour of whatever sits in slot `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LogoDocument {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub icon_size: u32,
    pub icon_spacing: u32,
    pub border_width: u32,
    pub border_radius: u32,
    pub border_color: String,
    pub icon_color: String,
    pub icon_colors: [String; ICON_CAPACITY],
    pub selected_icons: [Option<SelectedIcon>; ICON_CAPACITY],
}

impl Default for LogoDocument {
    fn default() -> Self {
        Self {
            canvas_width: 512,
            canvas_height: 512,
            icon_size: 96,
            icon_spacing: 16,
            border_width: 2,
            border_radius: 16,
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            icon_color: DEFAULT_ICON_COLOR.to_string(),
            icon_colors: array::from_fn(|_| DEFAULT_ICON_COLOR.to_string()),
            selected_icons: Default::default(),
        }
    }
}

impl LogoDocument {
    /// Returns the icon in a slot, if any.
    pub fn slot(&self, slot: usize) -> Option<&SelectedIcon> {
        self.selected_icons.get(slot).and_then(Option::as_ref)
    }

    /// Iterates over `(slot, icon, colour)` for every occupied slot.
    pub fn placed(&self) -> impl Iterator<Item = (usize, &SelectedIcon, &str)> {
        self.selected_icons
            .iter()
            .zip(self.icon_colors.iter())
            .enumerate()
            .filter_map(|(slot, (icon, color))| icon.as_ref().map(|i| (slot, i, color.as_str())))
    }

    fn set_parameter(&mut self, parameter: Parameter, value: u32) {
        let field = match parameter {
            Parameter::IconSize => &mut self.icon_size,
            Parameter::IconSpacing => &mut self.icon_spacing,
            Parameter::CanvasWidth => &mut self.canvas_width,
            Parameter::CanvasHeight => &mut self.canvas_height,
            Parameter::BorderWidth => &mut self.border_width,
            Parameter::BorderRadius => &mut self.border_radius,
            Parameter::BorderOffset => {
                log::debug!("logo has no border offset, ignoring {value}");
                return;
            }
        };
        *field = value;
    }

    fn add_icon(&mut self, icon: SelectedIcon, slot: Option<usize>) {
        let target = match slot {
            Some(slot) => (slot < ICON_CAPACITY && self.selected_icons[slot].is_none()).then_some(slot),
            None => self.selected_icons.iter().position(Option::is_none),
        };
        match target {
            Some(slot) => self.selected_icons[slot] = Some(icon),
            None => log::debug!("no free slot for {}, ignoring", icon.record.object_id),
        }
    }
}

impl Composition for LogoDocument {
    const KIND: CompositionKind = CompositionKind::Logo;
    const STORAGE_KEY: &'static str = LOGO_STORAGE_KEY;

    fn restore(raw: &str) -> Self {
        let Some(fields) = Fields::parse(raw) else {
            return Self::default();
        };
        let d = Self::default();

        let icon_color = fields.get("iconColor", d.icon_color);
        let icon_colors = fields.get(
            "iconColors",
            array::from_fn(|_| icon_color.clone()),
        );

        let selected_icons = match fields.array("selectedIcons") {
            Some(items) if items.len() == ICON_CAPACITY => array::from_fn(|slot| {
                let value = &items[slot];
                if value.is_null() {
                    None
                } else {
                    repair::element("selectedIcons", slot, value)
                }
            }),
            Some(items) => {
                log::warn!(
                    "persisted logo has {} slots, expected {ICON_CAPACITY}; clearing",
                    items.len()
                );
                d.selected_icons
            }
            None => d.selected_icons,
        };

        Self {
            canvas_width: fields.get("canvasWidth", d.canvas_width),
            canvas_height: fields.get("canvasHeight", d.canvas_height),
            icon_size: fields.get("iconSize", d.icon_size),
            icon_spacing: fields.get("iconSpacing", d.icon_spacing),
            border_width: fields.get("borderWidth", d.border_width),
            border_radius: fields.get("borderRadius", d.border_radius),
            border_color: fields.get("borderColor", d.border_color),
            icon_color,
            icon_colors,
            selected_icons,
        }
    }

    fn reduce(&mut self, action: Action) {
        match action {
            Action::SetParameter(parameter, value) => self.set_parameter(parameter, value),
            Action::SetBorderColor(color) => self.border_color = color,
            Action::SetIconColor(color) => {
                self.icon_colors = array::from_fn(|_| color.clone());
                self.icon_color = color;
            }
            Action::SetIconColorAt { slot, color } => {
                if let Some(entry) = self.icon_colors.get_mut(slot) {
                    *entry = color;
                }
            }
            Action::AddIcon { icon, slot } => self.add_icon(icon, slot),
            Action::RemoveIcon(slot) => {
                if slot < ICON_CAPACITY {
                    self.selected_icons[slot] = None;
                    self.icon_colors[slot] = self.icon_color.clone();
                }
            }
            Action::ReorderIcons(icons) => {
                let mut icons = icons.into_iter();
                self.selected_icons = array::from_fn(|_| icons.next());
            }
            Action::SwapSlots(a, b) => {
                if a < ICON_CAPACITY && b < ICON_CAPACITY {
                    self.selected_icons.swap(a, b);
                    self.icon_colors.swap(a, b);
                }
            }
        }
    }

    fn icons(&self) -> Vec<&SelectedIcon> {
        self.selected_icons.iter().flatten().collect()
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// The grid canvas is always mounted, even with every slot empty.
    fn has_render_target(&self) -> bool {
        true
    }

    fn scene(&self, glyphs: &GlyphSet) -> Result<Scene, GlyphError> {
        Scene::logo(self, glyphs)
    }
}
