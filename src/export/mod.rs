//! The export pipeline: composition to PNG on disk.
//!
//! Export runs in a fixed order:
//!
//! 1. The filename is sanitized; nothing is written for an unusable name.
//! 2. Every glyph the document uses is loaded ([`GlyphSet::load`]).
//! 3. A [`Scene`] is taken from the live preview (banner) or built
//!    off-screen in a temporary [`Scaffold`](crate::Scaffold) (logo).
//! 4. The [`Renderer`] rasterizes it at [`SUPERSAMPLE`] times the canvas
//!    size, and the PNG goes to the [`ArtifactSink`].
//!
//! Whatever happens, the export dialog is closed and any scaffold is gone
//! afterwards. Failures are reported as [`ExportOutcome::Failed`] and
//! logged; they never propagate as panics or leave state behind.

mod glyph;
mod raster;
mod scene;

pub use glyph::{Glyph, GlyphDirectory, GlyphError, GlyphSet, GlyphSource};
pub use raster::{RenderError, Renderer, SkiaRenderer, tint_svg};
pub use scene::{Border, PlacedGlyph, Scene};

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::composition::{Composition, ExportSource};
use crate::config::SUPERSAMPLE;
use crate::storage::write_atomic;
use crate::surface::ArrangementSurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file name {0:?} has no usable characters")]
    InvalidFilename(String),

    #[error(transparent)]
    Glyph(#[from] GlyphError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to encode png: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of one export attempt.
#[derive(Debug)]
pub enum ExportOutcome {
    /// The PNG was written here.
    Saved(PathBuf),
    /// There was nothing mounted to snapshot.
    Skipped,
    Failed(ExportError),
}

impl ExportOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Reduces a user-entered name to a safe file stem.
///
/// Runs of whitespace become one underscore, then everything except ASCII
/// letters and underscores is dropped and the rest lowercased. Returns
/// `None` if nothing is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    let stem: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (!stem.is_empty()).then_some(stem)
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

// ============================================================================
// ArtifactSink
// ============================================================================

/// Destination for exported files.
pub trait ArtifactSink {
    /// Stores `bytes` as `file_name`, returning where they went.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a directory, replacing same-named files atomically.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(file_name);
        let save_err = |source| ExportError::Save {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(save_err)?;
        let tmp = self.dir.join(format!(".{file_name}.tmp"));
        write_atomic(&tmp, &path, bytes).map_err(save_err)?;
        Ok(path)
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Drives the export pipeline for one glyph source, renderer and sink.
pub struct Exporter<G, R, S> {
    glyphs: G,
    renderer: R,
    sink: S,
    scale: f32,
}

impl<G: GlyphSource, S: ArtifactSink> Exporter<G, SkiaRenderer, S> {
    /// Creates an exporter using the default renderer.
    pub fn new(glyphs: G, sink: S) -> Self {
        Self::with_renderer(glyphs, SkiaRenderer, sink)
    }
}

impl<G: GlyphSource, R: Renderer, S: ArtifactSink> Exporter<G, R, S> {
    pub fn with_renderer(glyphs: G, renderer: R, sink: S) -> Self {
        Self {
            glyphs,
            renderer,
            sink,
            scale: SUPERSAMPLE,
        }
    }

    /// Overrides the supersampling factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Exports the surface's document as `<sanitized filename>.png`.
    ///
    /// The export dialog is closed on every path.
    pub fn export<D: Composition>(
        &mut self,
        surface: &mut ArrangementSurface<D>,
        filename: &str,
    ) -> ExportOutcome {
        let outcome = match self.try_export(surface, filename) {
            Ok(Some(path)) => {
                log::info!("exported {} to {}", D::KIND, path.display());
                ExportOutcome::Saved(path)
            }
            Ok(None) => {
                log::info!("nothing to export: {} preview is not mounted", D::KIND);
                ExportOutcome::Skipped
            }
            Err(err) => {
                log::error!("{} export failed: {err}", D::KIND);
                ExportOutcome::Failed(err)
            }
        };
        surface.close_export();
        outcome
    }

    /// Runs the pipeline, returning `Ok(None)` when there is nothing to
    /// snapshot.
    pub fn try_export<D: Composition>(
        &mut self,
        surface: &mut ArrangementSurface<D>,
        filename: &str,
    ) -> Result<Option<PathBuf>, ExportError> {
        let stem = sanitize_filename(filename)
            .ok_or_else(|| ExportError::InvalidFilename(filename.to_string()))?;

        if D::KIND.export_source() == ExportSource::Live && !surface.is_mounted() {
            return Ok(None);
        }

        let doc = surface.document().clone();
        let (width, height) = doc.canvas_size();
        log::debug!("exporting {width}x{height} {} at {}x", D::KIND, self.scale);
        let glyphs = GlyphSet::load(&self.glyphs, doc.icons())?;
        let scene = doc.scene(&glyphs)?;

        let image = match D::KIND.export_source() {
            ExportSource::Live => self.renderer.rasterize(&scene, &glyphs, self.scale)?,
            ExportSource::Offscreen => {
                let scaffold = surface.scaffold(scene);
                log::debug!("rendering off-screen replica {}", scaffold.id());
                self.renderer
                    .rasterize(scaffold.scene(), &glyphs, self.scale)?
            }
        };

        let bytes = encode_png(&image)?;
        self.sink.save(&format!("{stem}.png"), &bytes).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::composition::{BannerDocument, LogoDocument};
    use crate::icon::GlyphKey;
    use crate::icon::tests::selected;
    use crate::storage::MemoryStorage;
    use crate::store::Store;
    use super::glyph::tests::{SQUARE_GLYPH, source_for};

    #[derive(Default)]
    struct MemorySink {
        files: Vec<(String, Vec<u8>)>,
    }

    impl ArtifactSink for MemorySink {
        fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
            self.files.push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn rasterize(&self, _: &Scene, _: &GlyphSet, _: f32) -> Result<RgbaImage, RenderError> {
            Err(RenderError::Backend("out of memory".into()))
        }
    }

    fn new_surface<D: Composition>() -> ArrangementSurface<D> {
        ArrangementSurface::new(Store::load(Box::new(MemoryStorage::new())))
    }

    fn exporter() -> Exporter<HashMap<GlyphKey, String>, SkiaRenderer, MemorySink> {
        Exporter::new(source_for(&[("a", SQUARE_GLYPH)]), MemorySink::default())
    }

    fn decoded(bytes: &[u8]) -> RgbaImage {
        image::load_from_memory(bytes).unwrap().to_rgba8()
    }

    #[test]
    fn sanitize_collapses_and_filters() {
        assert_eq!(sanitize_filename("  My Logo!! 2024  ").as_deref(), Some("my_logo_"));
        assert_eq!(sanitize_filename("Team   Banner").as_deref(), Some("team_banner"));
        assert_eq!(sanitize_filename("logo").as_deref(), Some("logo"));
        assert_eq!(sanitize_filename("2024!!"), None);
        assert_eq!(sanitize_filename("   "), None);
    }

    #[test]
    fn empty_logo_still_exports_supersampled() {
        let mut surface = new_surface::<LogoDocument>();
        let mut exporter = exporter();
        surface.open_export();

        let outcome = exporter.export(&mut surface, "My Logo");
        assert!(outcome.is_saved());
        assert!(!surface.is_export_open());
        assert_eq!(surface.scaffold_count(), 0);

        let (name, bytes) = &exporter.sink().files[0];
        assert_eq!(name, "my_logo.png");
        let img = decoded(bytes);
        assert_eq!((img.width(), img.height()), (1024, 1024));
    }

    #[test]
    fn empty_banner_is_skipped() {
        let mut surface = new_surface::<BannerDocument>();
        let mut exporter = exporter();
        surface.open_export();

        let outcome = exporter.export(&mut surface, "banner");
        assert!(matches!(outcome, ExportOutcome::Skipped));
        assert!(!surface.is_export_open());
        assert!(exporter.sink().files.is_empty());
    }

    #[test]
    fn banner_exports_live_preview() {
        let mut surface = new_surface::<BannerDocument>();
        surface.pick(&selected("a").record, &selected("a").variant(), None);
        let mut exporter = exporter().with_scale(1.0);

        let outcome = exporter.export(&mut surface, "Banner");
        assert!(outcome.is_saved());
        let img = decoded(&exporter.sink().files[0].1);
        assert_eq!((img.width(), img.height()), (600, 600));
        assert_eq!(img.get_pixel(300, 300).0, [0x37, 0x41, 0x51, 255]);
    }

    #[test]
    fn invalid_name_writes_nothing() {
        let mut surface = new_surface::<LogoDocument>();
        let mut exporter = exporter();
        surface.open_export();

        let outcome = exporter.export(&mut surface, "!!!");
        assert!(matches!(outcome, ExportOutcome::Failed(ExportError::InvalidFilename(_))));
        assert!(!surface.is_export_open());
        assert!(exporter.sink().files.is_empty());
    }

    #[test]
    fn renderer_failure_cleans_up() {
        let mut surface = new_surface::<LogoDocument>();
        let mut exporter = Exporter::with_renderer(
            source_for(&[]),
            FailingRenderer,
            MemorySink::default(),
        );
        surface.open_export();

        let outcome = exporter.export(&mut surface, "logo");
        assert!(matches!(outcome, ExportOutcome::Failed(ExportError::Render(_))));
        assert_eq!(surface.scaffold_count(), 0);
        assert!(!surface.is_export_open());
        assert!(exporter.sink().files.is_empty());
    }

    #[test]
    fn missing_glyph_fails_before_rendering() {
        let mut surface = new_surface::<LogoDocument>();
        surface.pick(&selected("zzz").record, &selected("zzz").variant(), Some(2));
        let mut exporter = exporter();

        let outcome = exporter.export(&mut surface, "logo");
        assert!(matches!(outcome, ExportOutcome::Failed(ExportError::Glyph(_))));
        assert_eq!(surface.scaffold_count(), 0);
    }

    #[test]
    fn directory_sink_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(tmp.path().join("out"));
        let path = sink.save("x.png", b"png").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"png");
        assert_eq!(fs::read_dir(sink.dir()).unwrap().count(), 1);
    }

    #[test]
    fn failed_save_leaves_nothing_behind() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("logo.png")).unwrap();
        let mut sink = DirectorySink::new(tmp.path());

        assert!(matches!(sink.save("logo.png", b"png"), Err(ExportError::Save { .. })));
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["logo.png"]);
        assert!(tmp.path().join("logo.png").is_dir());
    }
}
