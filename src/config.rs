//! Build-time constants and default locations.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

/// Quiet window a search query must survive before the index is contacted.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Maximum number of hits returned per search.
pub const SEARCH_PAGE_SIZE: usize = 20;

/// Application the hosted icon index belongs to.
pub const HOSTED_APP_ID: &str = "M19DXW5X0Q";

/// Search-only key for the hosted index.
pub const HOSTED_SEARCH_KEY: &str = "c79b2e61519372a99fa5890db070064c";

pub const HOSTED_INDEX_NAME: &str = "fontawesome_com-collections-6.7.2_alphabetical";

/// Hits requested per hosted query.
pub const HOSTED_HITS_PER_PAGE: usize = 20;

/// Multiplier applied to the canvas size when rasterizing for export.
pub const SUPERSAMPLE: f32 = 2.0;

/// Number of icons a composition can hold.
pub const ICON_CAPACITY: usize = 4;

/// Padding around each banner icon, in logical pixels.
pub const BANNER_ITEM_PADDING: f32 = 8.0;

pub const DEFAULT_ICON_COLOR: &str = "#374151";
pub const DEFAULT_BORDER_COLOR: &str = "#000000";
pub const EXPORT_BACKGROUND: &str = "#ffffff";

pub const BANNER_STORAGE_KEY: &str = "bannerState";
pub const LOGO_STORAGE_KEY: &str = "logoState";

/// File name of the bundled icon catalog inside the state directory.
pub const CATALOG_FILE: &str = "catalog.json";

static QUALIFIER: &str = "dev";
static ORGANIZATION: &str = "iconboard";
static APPLICATION: &str = "iconboard";

/// Directory holding persisted documents and the icon catalog.
///
/// Falls back to `./.iconboard` when the platform has no data directory.
pub fn default_state_dir() -> PathBuf {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".iconboard"))
}
