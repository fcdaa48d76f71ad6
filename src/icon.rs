//! Icon records as returned by the icon search index.
//!
//! This module provides the data contract shared by search, the composition
//! documents and the export pipeline. An [`IconRecord`] describes one glyph
//! and every (family, style) rendering of it; a [`SelectedIcon`] is a record
//! pinned to the single variant the user picked.

use serde::{Deserialize, Serialize};

/// One renderable visual representation of a glyph.
///
/// For example `family = "classic", style = "solid"` or
/// `family = "sharp", style = "light"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconVariant {
    pub family: String,
    pub style: String,
}

impl IconVariant {
    /// Creates a variant from a family and a style name.
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

/// Variants grouped by license tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Membership {
    #[serde(default)]
    pub free: Vec<IconVariant>,
    #[serde(default)]
    pub pro: Vec<IconVariant>,
}

/// A searchable icon.
///
/// Records are immutable once fetched and are identified by
/// [`object_id`](Self::object_id).
///
/// # JSON Format
///
/// ```json
/// {
///   "objectID": "house",
///   "name": "house",
///   "label": "House",
///   "type": "icon",
///   "unicode": "f015",
///   "styles": ["solid", "regular"],
///   "is_free": true,
///   "keywords": ["home", "building"],
///   "categories": ["buildings"],
///   "membership": {
///     "free": [{ "family": "classic", "style": "solid" }],
///     "pro": [{ "family": "classic", "style": "solid" }, { "family": "sharp", "style": "light" }]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconRecord {
    /// Unique identity within the index.
    #[serde(rename = "objectID")]
    pub object_id: String,

    /// Glyph identifier, used to locate the glyph asset.
    pub name: String,

    /// Human readable name.
    pub label: String,

    /// Record type as reported by the index, usually `"icon"`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Codepoint as a hex string.
    #[serde(default)]
    pub unicode: String,

    /// Style names across all families, as the index lists them.
    #[serde(default)]
    pub styles: Vec<String>,

    /// Whether any variant is on the free tier.
    #[serde(default)]
    pub is_free: bool,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub membership: Membership,
}

impl IconRecord {
    /// Iterates over every variant, free tier first, without duplicates.
    pub fn variants(&self) -> impl Iterator<Item = &IconVariant> {
        let free = self.membership.free.iter();
        let pro_only = self
            .membership
            .pro
            .iter()
            .filter(|v| !self.membership.free.contains(v));
        free.chain(pro_only)
    }

    /// Returns true if the variant is available on the free tier.
    pub fn free_in(&self, variant: &IconVariant) -> bool {
        self.membership.free.contains(variant)
    }

    /// Returns true if the record offers the given variant at all.
    pub fn offers(&self, variant: &IconVariant) -> bool {
        self.membership.free.contains(variant) || self.membership.pro.contains(variant)
    }

    /// Pins this record to a single variant.
    ///
    /// The variant is not checked against the membership lists; callers that
    /// need that guarantee should use [`offers`](Self::offers) first.
    pub fn select(&self, variant: &IconVariant) -> SelectedIcon {
        SelectedIcon {
            record: self.clone(),
            family: variant.family.clone(),
            style: variant.style.clone(),
        }
    }
}

/// An [`IconRecord`] with the chosen family and style flattened onto it.
///
/// Created when the user commits a variant and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SelectedIcon {
    #[serde(flatten)]
    pub record: IconRecord,
    pub family: String,
    pub style: String,
}

impl SelectedIcon {
    /// Returns the chosen variant.
    pub fn variant(&self) -> IconVariant {
        IconVariant::new(&self.family, &self.style)
    }

    /// Key used to look up the glyph asset for this icon.
    pub fn glyph_key(&self) -> GlyphKey {
        GlyphKey {
            family: self.family.clone(),
            style: self.style.clone(),
            name: self.record.name.clone(),
        }
    }
}

/// Identifies one glyph asset: a glyph name in a given family and style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphKey {
    pub family: String,
    pub style: String,
    pub name: String,
}

impl std::fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.family, self.style, self.name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(id: &str) -> IconRecord {
        IconRecord {
            object_id: id.to_string(),
            name: id.to_string(),
            label: id.to_string(),
            kind: "icon".to_string(),
            unicode: "f015".to_string(),
            styles: vec!["solid".to_string(), "light".to_string()],
            is_free: true,
            keywords: vec!["home".to_string()],
            categories: vec!["buildings".to_string()],
            membership: Membership {
                free: vec![IconVariant::new("classic", "solid")],
                pro: vec![
                    IconVariant::new("classic", "solid"),
                    IconVariant::new("sharp", "light"),
                ],
            },
        }
    }

    pub(crate) fn selected(id: &str) -> SelectedIcon {
        record(id).select(&IconVariant::new("classic", "solid"))
    }

    #[test]
    fn record_parses_index_hit() {
        let json = r#"{
            "objectID": "house",
            "name": "house",
            "label": "House",
            "unicode": "f015",
            "keywords": ["home"],
            "categories": ["buildings"],
            "membership": { "free": [], "pro": [{ "family": "duotone", "style": "solid" }] },
            "is_free": false
        }"#;
        let record: IconRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.object_id, "house");
        assert_eq!(record.membership.pro[0], IconVariant::new("duotone", "solid"));
        assert!(!record.is_free);
    }

    #[test]
    fn index_metadata_is_kept() {
        let json = r#"{
            "objectID": "house",
            "name": "house",
            "label": "House",
            "type": "icon",
            "styles": ["solid", "regular"],
            "is_free": true
        }"#;
        let record: IconRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, "icon");
        assert_eq!(record.styles, vec!["solid", "regular"]);
        assert!(record.is_free);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "icon");
        assert_eq!(value["styles"][1], "regular");
        assert_eq!(value["is_free"], true);
    }

    #[test]
    fn missing_metadata_defaults_to_empty() {
        let json = r#"{ "objectID": "x", "name": "x", "label": "X" }"#;
        let record: IconRecord = serde_json::from_str(json).unwrap();
        assert!(record.keywords.is_empty());
        assert!(record.kind.is_empty());
        assert!(record.styles.is_empty());
        assert!(!record.is_free);
        assert!(record.membership.free.is_empty());
        assert_eq!(record.variants().count(), 0);
    }

    #[test]
    fn variants_skip_pro_duplicates() {
        let r = record("house");
        let variants: Vec<_> = r.variants().cloned().collect();
        assert_eq!(
            variants,
            vec![
                IconVariant::new("classic", "solid"),
                IconVariant::new("sharp", "light")
            ]
        );
        assert!(r.free_in(&variants[0]));
        assert!(!r.free_in(&variants[1]));
    }

    #[test]
    fn selected_icon_flattens_variant() {
        let icon = record("house").select(&IconVariant::new("sharp", "light"));
        let value = serde_json::to_value(&icon).unwrap();

        assert_eq!(value["objectID"], "house");
        assert_eq!(value["family"], "sharp");
        assert_eq!(value["style"], "light");

        let restored: SelectedIcon = serde_json::from_value(value).unwrap();
        assert_eq!(restored, icon);
        assert_eq!(restored.glyph_key().to_string(), "sharp/light/house");
    }
}
