//! Command-line front end: edit the saved compositions and export them.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use iconboard::{
    ArrangementSurface, BannerDocument, CATALOG_FILE, CatalogIndex, ColorError, Composition,
    CompositionKind, DirectorySink, ExportOutcome, Exporter, FileStorage, GlyphDirectory,
    IconRecord, IconVariant, LogoDocument, Parameter, SearchError, SearchGateway, Store,
    default_state_dir, normalize_color,
};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "iconboard", about = "Compose icon banners and logo grids", version, long_about = None)]
struct Cli {
    /// Directory holding saved documents and the icon catalog.
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Which composition to work on.
    #[arg(long, global = true, value_enum, default_value = "banner")]
    variant: CompositionKind,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the icon catalog.
    Search {
        query: Vec<String>,
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
    /// Add a catalog icon, by object id, in one of its variants.
    Add {
        object_id: String,
        #[arg(long)]
        family: Option<String>,
        #[arg(long)]
        style: Option<String>,
        /// Grid slot to place the icon in (logo only).
        #[arg(long)]
        slot: Option<usize>,
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
    /// Remove the icon at a position.
    Remove { position: usize },
    /// Drag an icon to another position; omit the target to cancel.
    Move { from: usize, to: Option<usize> },
    /// Set a layout parameter, clamped to its input range.
    Set {
        #[arg(value_enum)]
        parameter: Parameter,
        value: u32,
    },
    /// Set the icon colour, for every icon or a single grid slot.
    Color {
        color: String,
        #[arg(long)]
        slot: Option<usize>,
    },
    /// Set the border colour.
    BorderColor { color: String },
    /// Print the saved document.
    Show,
    /// Export the composition as a PNG.
    Export {
        name: String,
        /// Icon kit `svgs/` directory to read glyphs from.
        #[arg(long, value_name = "DIR")]
        glyphs: PathBuf,
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("no icon with object id {0:?} in the catalog")]
    UnknownIcon(String),

    #[error("{id} is not available as {family}/{style}")]
    UnsupportedVariant {
        id: String,
        family: String,
        style: String,
    },

    #[error("{parameter} does not apply to a {kind}")]
    UnsupportedParameter {
        parameter: Parameter,
        kind: CompositionKind,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.variant {
        CompositionKind::Banner => run::<BannerDocument>(&cli).await,
        CompositionKind::Logo => run::<LogoDocument>(&cli).await,
    };
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run<D: Composition>(cli: &Cli) -> Result<ExitCode, CliError> {
    let state_dir = cli.state_dir.clone().unwrap_or_else(default_state_dir);
    let catalog_path = |path: &Option<PathBuf>| {
        path.clone()
            .unwrap_or_else(|| state_dir.join(CATALOG_FILE))
    };
    log::debug!("state directory {}", state_dir.display());

    let store = Store::<D>::load(Box::new(FileStorage::new(&state_dir)));
    let mut surface = ArrangementSurface::new(store);

    match &cli.command {
        Command::Search { query, catalog } => {
            let index = Arc::new(CatalogIndex::load(catalog_path(catalog))?);
            // One-shot query: nothing to debounce against.
            let gateway = SearchGateway::new(index).with_debounce(Duration::ZERO);
            let hits = gateway.search(&query.join(" ")).await.unwrap_or_default();
            if hits.is_empty() {
                println!("no icons found");
            }
            for hit in &hits {
                print_hit(hit);
            }
        }
        Command::Add {
            object_id,
            family,
            style,
            slot,
            catalog,
        } => {
            let index = CatalogIndex::load(catalog_path(catalog))?;
            let record = index
                .get(object_id)
                .ok_or_else(|| CliError::UnknownIcon(object_id.clone()))?;
            let variant = match (family, style) {
                (None, None) => record
                    .variants()
                    .next()
                    .cloned()
                    .unwrap_or_else(|| IconVariant::new("classic", "solid")),
                (family, style) => IconVariant::new(
                    family.as_deref().unwrap_or("classic"),
                    style.as_deref().unwrap_or("solid"),
                ),
            };
            let before = surface.document().icon_count();
            if !surface.pick(record, &variant, *slot) {
                return Err(CliError::UnsupportedVariant {
                    id: object_id.clone(),
                    family: variant.family,
                    style: variant.style,
                });
            }
            if surface.document().icon_count() == before {
                println!("{} is full or the slot is taken, nothing added", D::KIND);
            }
        }
        Command::Remove { position } => surface.remove(*position),
        Command::Move { from, to } => surface.drag(*from, *to),
        Command::Set { parameter, value } => {
            if !parameter.applies_to(D::KIND) {
                return Err(CliError::UnsupportedParameter {
                    parameter: *parameter,
                    kind: D::KIND,
                });
            }
            let applied = surface.set_parameter(*parameter, *value);
            if applied != *value {
                println!("{parameter} clamped to {applied}");
            }
        }
        Command::Color { color, slot } => surface.recolor(normalize_color(color)?, *slot),
        Command::BorderColor { color } => surface.set_border_color(normalize_color(color)?),
        Command::Show => println!("{}", serde_json::to_string_pretty(surface.document())?),
        Command::Export { name, glyphs, out } => {
            let mut exporter =
                Exporter::new(GlyphDirectory::new(glyphs), DirectorySink::new(out));
            surface.open_export();
            match exporter.export(&mut surface, name) {
                ExportOutcome::Saved(path) => println!("saved {}", path.display()),
                ExportOutcome::Skipped => println!("nothing to export: add an icon first"),
                ExportOutcome::Failed(err) => {
                    eprintln!("export failed: {err}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_hit(record: &IconRecord) {
    let variants: Vec<String> = record
        .variants()
        .map(|v| {
            let tier = if record.free_in(v) { "" } else { " (pro)" };
            format!("{}/{}{tier}", v.family, v.style)
        })
        .collect();
    println!("{:<24} {:<24} {}", record.object_id, record.label, variants.join(", "));
}
