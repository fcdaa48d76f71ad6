//! Glyph assets and the readiness barrier before rasterization.
//!
//! Every icon is drawn from an SVG glyph. Export loads and parses all of
//! them up front with [`GlyphSet::load`]; rasterizing before that would
//! leave blank boxes where glyphs should be.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use resvg::usvg::{Options, Tree};
use thiserror::Error;

use crate::icon::{GlyphKey, SelectedIcon};

#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("no glyph asset for {key} at {}", path.display())]
    NotFound { key: GlyphKey, path: PathBuf },

    #[error("failed to read glyph {key}: {source}")]
    Io {
        key: GlyphKey,
        #[source]
        source: io::Error,
    },

    #[error("glyph {key} is not valid SVG: {source}")]
    Parse {
        key: GlyphKey,
        #[source]
        source: resvg::usvg::Error,
    },

    #[error("glyph {key} has an empty view box")]
    Empty { key: GlyphKey },

    #[error("glyph {key} was not loaded")]
    Missing { key: GlyphKey },

    #[error("glyph key {key} does not name a file in the kit")]
    InvalidKey { key: GlyphKey },
}

// ============================================================================
// GlyphSource
// ============================================================================

/// Supplies SVG markup for glyphs.
pub trait GlyphSource {
    fn load(&self, key: &GlyphKey) -> Result<String, GlyphError>;
}

/// Glyphs keyed in memory, for embedding and tests.
impl GlyphSource for HashMap<GlyphKey, String> {
    fn load(&self, key: &GlyphKey) -> Result<String, GlyphError> {
        self.get(key).cloned().ok_or_else(|| GlyphError::NotFound {
            key: key.clone(),
            path: PathBuf::new(),
        })
    }
}

/// Reads glyphs from an unpacked icon kit's `svgs/` directory.
///
/// The classic family lives in one directory per style
/// (`solid/house.svg`); other families are prefixed with the family name
/// (`sharp-light/house.svg`). Duotone solid is the plain `duotone/`
/// directory.
#[derive(Debug, Clone)]
pub struct GlyphDirectory {
    root: PathBuf,
}

impl GlyphDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the glyph for `key` is expected at.
    ///
    /// Every key component must be a plain kit name (ASCII letters, digits,
    /// `-` and `_`) so the path stays under the kit root. Only the family
    /// may be empty.
    pub fn path_for(&self, key: &GlyphKey) -> Result<PathBuf, GlyphError> {
        let plain = |part: &str| {
            part.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if !plain(&key.family)
            || key.style.is_empty()
            || !plain(&key.style)
            || key.name.is_empty()
            || !plain(&key.name)
        {
            return Err(GlyphError::InvalidKey { key: key.clone() });
        }
        let dir = match (key.family.as_str(), key.style.as_str()) {
            ("classic" | "", style) => style.to_string(),
            ("duotone", "solid") => "duotone".to_string(),
            (family, style) => format!("{family}-{style}"),
        };
        Ok(self.root.join(dir).join(format!("{}.svg", key.name)))
    }
}

impl GlyphSource for GlyphDirectory {
    fn load(&self, key: &GlyphKey) -> Result<String, GlyphError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(markup) => Ok(markup),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(GlyphError::NotFound {
                key: key.clone(),
                path,
            }),
            Err(source) => Err(GlyphError::Io {
                key: key.clone(),
                source,
            }),
        }
    }
}

// ============================================================================
// GlyphSet
// ============================================================================

/// A parsed glyph and its intrinsic size.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub markup: String,
    pub width: f32,
    pub height: f32,
}

impl Glyph {
    /// Parses markup, checking it is renderable.
    pub fn parse(key: &GlyphKey, markup: String) -> Result<Self, GlyphError> {
        let tree = Tree::from_str(&markup, &Options::default()).map_err(|source| {
            GlyphError::Parse {
                key: key.clone(),
                source,
            }
        })?;
        let size = tree.size();
        if size.width() <= 0.0 || size.height() <= 0.0 {
            return Err(GlyphError::Empty { key: key.clone() });
        }
        Ok(Self {
            markup,
            width: size.width(),
            height: size.height(),
        })
    }

    /// Width per unit of height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// All glyphs needed for one export, loaded and validated.
#[derive(Debug, Clone, Default)]
pub struct GlyphSet {
    glyphs: HashMap<GlyphKey, Glyph>,
}

impl GlyphSet {
    /// Loads every glyph used by `icons`. Fails on the first one that cannot
    /// be loaded or parsed.
    pub fn load<'a, S>(
        source: &S,
        icons: impl IntoIterator<Item = &'a SelectedIcon>,
    ) -> Result<Self, GlyphError>
    where
        S: GlyphSource + ?Sized,
    {
        let mut glyphs = HashMap::new();
        for icon in icons {
            let key = icon.glyph_key();
            if glyphs.contains_key(&key) {
                continue;
            }
            let glyph = Glyph::parse(&key, source.load(&key)?)?;
            log::debug!("loaded glyph {key} ({}x{})", glyph.width, glyph.height);
            glyphs.insert(key, glyph);
        }
        Ok(Self { glyphs })
    }

    pub fn get(&self, key: &GlyphKey) -> Result<&Glyph, GlyphError> {
        self.glyphs
            .get(key)
            .ok_or_else(|| GlyphError::Missing { key: key.clone() })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
