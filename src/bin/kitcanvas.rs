use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use kitcanvas::{
    DesignParameters, FontBook, FsAssetSource, PreviewConfig, PreviewSession, PreviewSessionOpts,
    SurfaceMode, TextPlan, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "kitcanvas", version)]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a design and write the export surface as PNG.
    Export(ExportArgs),
    /// Print the computed layout (draw rect, text plan, contrast, tint path) as JSON.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct SurfaceArgs {
    /// Design parameters JSON.
    #[arg(long)]
    params: PathBuf,

    /// Directory asset references are resolved against (defaults to the params file's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Surface width in logical pixels.
    #[arg(long, default_value_t = 400.0)]
    width: f64,

    /// Surface height in logical pixels.
    #[arg(long, default_value_t = 400.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Render the square texture surface instead of the flat preview.
    #[arg(long)]
    texture: bool,

    /// Preview config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not load system fonts.
    #[arg(long)]
    no_system_fonts: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(serde::Serialize)]
struct LayoutReport {
    surface: kitcanvas::RenderSummary,
    base_status: kitcanvas::LoadStatus,
    mask_status: kitcanvas::LoadStatus,
    font_scale: f64,
    text_contrast: &'static str,
    text: Option<TextPlan>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn read_params(path: &Path) -> anyhow::Result<DesignParameters> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read design parameters '{}'", path.display()))?;
    Ok(DesignParameters::from_json(&s)?)
}

fn open_session(args: &SurfaceArgs) -> anyhow::Result<(PreviewSession, DesignParameters)> {
    let params = read_params(&args.params)?;

    let mut config = match &args.config {
        Some(p) => PreviewConfig::from_path(p)?,
        None => PreviewConfig::default().with_env_overrides(),
    };
    config.font_dirs.extend(args.font_dirs.iter().cloned());
    if args.no_system_fonts {
        config.load_system_fonts = false;
    }
    let fonts = FontBook::load(config.load_system_fonts, config.font_dirs.as_slice());
    tracing::debug!(faces = fonts.face_count(), "fonts loaded");

    let root = match &args.assets {
        Some(root) => root.clone(),
        None => args
            .params
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let mode = if args.texture {
        SurfaceMode::Texture
    } else {
        SurfaceMode::Display
    };

    let viewport = Viewport::new(args.width, args.height, args.dpr)?;
    let mut session = PreviewSession::new(
        Arc::new(FsAssetSource::new(root)),
        viewport,
        PreviewSessionOpts {
            config,
            fonts: Some(fonts),
            mode,
            ..PreviewSessionOpts::default()
        },
    )?;
    session.set_params(params.clone(), Instant::now())?;
    for event in session.pump_assets().events {
        tracing::debug!(?event.slot, reference = %event.reference, ?event.status, "asset settled");
    }
    Ok((session, params))
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let (mut session, _) = open_session(&args.surface)?;
    let png = session.export_png()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let (session, params) = open_session(&args.surface)?;
    let summary = session
        .last_render()
        .cloned()
        .context("no frame was rendered for these parameters")?;

    let surface_width = session.viewport().width;
    let text = summary
        .draw_rect
        .as_ref()
        .and_then(|rect| TextPlan::compute(&params, rect, surface_width));
    let report = LayoutReport {
        base_status: session.assets().base.status(),
        mask_status: session.assets().mask.status(),
        font_scale: kitcanvas::font_scale(surface_width),
        text_contrast: kitcanvas::contrast_color_hex(&params.text_fill().to_hex()),
        text,
        surface: summary,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
