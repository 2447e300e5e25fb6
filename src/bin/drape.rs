use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "drape", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export every view of a design as PNGs in a zip archive.
    Render(RenderArgs),
    /// Export a single view as a PNG.
    View(ViewArgs),
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Product descriptor JSON.
    #[arg(long)]
    product: PathBuf,

    /// Directory mirroring the asset server layout.
    #[arg(long)]
    assets: PathBuf,

    /// Saved design JSON to load.
    #[arg(long)]
    design: Option<PathBuf>,

    /// Product tint (`#rrggbb`), overriding the design's.
    #[arg(long)]
    color: Option<String>,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resolution multiplier (defaults to the configured export multiplier).
    #[arg(long)]
    multiplier: Option<f64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output zip path.
    #[arg(long)]
    out: PathBuf,

    /// Leave out views with no photograph and no objects.
    #[arg(long)]
    skip_empty: bool,
}

#[derive(Parser, Debug)]
struct ViewArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// View to export (`front`, `back`, `left_sleeve`, ...).
    #[arg(long)]
    view: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::View(args) => cmd_view(args),
    }
}

fn open_session(args: &SessionArgs) -> anyhow::Result<(drape::DesignSession, f64)> {
    let config = match &args.config {
        Some(path) => drape::EngineConfig::from_path(path)?,
        None => drape::EngineConfig::default(),
    };
    let multiplier = args.multiplier.unwrap_or(config.export_multiplier);

    let product = drape::Product::from_path(&args.product)?;
    let source = Arc::new(drape::FsAssetSource::new(&args.assets));
    let mut session = drape::DesignSession::open(product, source, config)?;

    if let Some(path) = &args.design {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read design '{}'", path.display()))?;
        let doc = drape::DesignDocument::from_json(&json)?;
        let skipped = session.import_design(&doc)?;
        if skipped > 0 {
            tracing::warn!(skipped, "some design objects could not be restored");
        }
    }
    if let Some(color) = &args.color {
        session.set_global_color_hex(color)?;
    }
    Ok((session, multiplier))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (mut session, multiplier) = open_session(&args.session)?;
    let opts = drape::ExportOpts {
        multiplier,
        skip_empty: args.skip_empty || session.config().skip_empty_views,
        ..drape::ExportOpts::from_config(session.config())
    };

    let mut sink = drape::ZipArchiveSink::new(&args.out);
    let stats = session.export_all_views(&opts, &mut sink)?;

    eprintln!(
        "wrote {} ({} views, {} skipped)",
        args.out.display(),
        stats.views_written,
        stats.views_skipped
    );
    Ok(())
}

fn cmd_view(args: ViewArgs) -> anyhow::Result<()> {
    let (mut session, multiplier) = open_session(&args.session)?;
    let view: drape::View = args.view.parse()?;
    session.request_view(view)?;
    let timeout = session.config().load_timeout();
    if let Err(e) = session.wait_idle(timeout) {
        tracing::warn!(error = %e, "exporting on a placeholder background");
    }

    let png = session.export_current_view(multiplier)?.to_png()?;
    write_file(&args.out, &png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))
}
