//! iconboard: compose icon banners and logo grids and export them as PNG
//!
//! This crate provides the editing core of an icon composition tool:
//! debounced icon search, a persisted composition document with a typed
//! action set, an arrangement surface translating gestures into actions,
//! and an export pipeline rasterizing the result.
//!
//! # Example
//!
//! ```no_run
//! use iconboard::{
//!     ArrangementSurface, DirectorySink, Exporter, FileStorage, GlyphDirectory, IconRecord,
//!     IconVariant, LogoDocument, Parameter, Store,
//! };
//!
//! # fn hit() -> IconRecord { unimplemented!() }
//! let store = Store::<LogoDocument>::load(Box::new(FileStorage::new("state")));
//! let mut surface = ArrangementSurface::new(store);
//!
//! // Place a search hit into the bottom-left slot and tint it
//! surface.pick(&hit(), &IconVariant::new("classic", "solid"), Some(2));
//! surface.recolor("#ef4444", Some(2));
//! surface.set_parameter(Parameter::IconSize, 128);
//!
//! let mut exporter = Exporter::new(GlyphDirectory::new("fontawesome/svgs"), DirectorySink::new("."));
//! surface.open_export();
//! let outcome = exporter.export(&mut surface, "Team Logo");
//! ```
//!
//! # Persisted Documents
//!
//! Documents are stored as camelCase JSON under a fixed key per variant
//! (see [`Composition::STORAGE_KEY`]). Loading never fails: unreadable
//! documents fall back to defaults and malformed fields are repaired one by
//! one.
//!
//! # Search
//!
//! ```no_run
//! use std::sync::Arc;
//! use iconboard::{CatalogIndex, SearchGateway};
//!
//! # async fn run() -> Result<(), iconboard::SearchError> {
//! let index = Arc::new(CatalogIndex::load("catalog.json")?);
//! let gateway = SearchGateway::new(index);
//! if let Some(hits) = gateway.search("house").await {
//!     println!("{} hits", hits.len());
//! }
//! # Ok(())
//! # }
//! ```

mod color;
mod composition;
mod config;
mod export;
mod icon;
mod search;
mod storage;
mod store;
mod surface;

pub use color::{ColorError, normalize as normalize_color, parse_color, to_hex};
pub use composition::{
    Action, BannerDocument, Composition, CompositionKind, ExportSource, LogoDocument, Parameter,
};
pub use config::{
    BANNER_STORAGE_KEY, CATALOG_FILE, HOSTED_APP_ID, HOSTED_HITS_PER_PAGE, HOSTED_INDEX_NAME,
    HOSTED_SEARCH_KEY, ICON_CAPACITY, LOGO_STORAGE_KEY, SEARCH_DEBOUNCE,
    SEARCH_PAGE_SIZE, SUPERSAMPLE, default_state_dir,
};
pub use export::{
    ArtifactSink, Border, DirectorySink, ExportError, ExportOutcome, Exporter, Glyph,
    GlyphDirectory, GlyphError, GlyphSet, GlyphSource, PlacedGlyph, RenderError, Renderer, Scene,
    SkiaRenderer, encode_png, sanitize_filename, tint_svg,
};
pub use icon::{GlyphKey, IconRecord, IconVariant, Membership, SelectedIcon};
pub use search::{
    CatalogIndex, HostedConfig, HostedIndex, HostedRequest, IconIndex, SearchError, SearchGateway,
    SearchState, Transport,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::Store;
pub use surface::{ArrangementSurface, Scaffold};
