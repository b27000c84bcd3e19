use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use spritepatch::{
    AssetSource as _, EngineSettings, FrameDuration, FsAssetSource, Offset, PatchLayer, PatchMode,
    Rect, Rgba8, SpriteEngine,
};

#[derive(Parser, Debug)]
#[command(name = "spritepatch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose layers over a base texture region and write the sprite sheet as a PNG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Directory that base and layer texture names resolve against.
    #[arg(long)]
    root: PathBuf,

    /// Base texture name, relative to `--root`.
    #[arg(long)]
    base: String,

    /// Requested base region as `x,y,w,h`.
    #[arg(long, value_parser = parse_region)]
    region: Rect,

    /// Layer list JSON.
    #[arg(long)]
    layers: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Engine settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Dedicated worker thread count (overrides settings).
    #[arg(long)]
    threads: Option<usize>,

    /// Force row-parallel blending on or off (overrides settings).
    #[arg(long)]
    parallel: Option<bool>,
}

/// One entry of the layer list JSON.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayerSpec {
    texture: String,
    #[serde(default)]
    source_area: Option<Rect>,
    #[serde(default)]
    destination_area: Option<Rect>,
    #[serde(default)]
    offset: Offset,
    #[serde(default = "one")]
    scale: f32,
    #[serde(default)]
    tint: Option<Rgba8>,
    #[serde(default = "one")]
    opacity: f32,
    #[serde(default)]
    mode: PatchMode,
    #[serde(default = "one_frame")]
    frames: u32,
    #[serde(default)]
    frame_duration: FrameDuration,
}

fn one() -> f32 {
    1.0
}

fn one_frame() -> u32 {
    1
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
    }
}

fn parse_region(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected x,y,w,h, got '{s}'"));
    };
    let num = |v: &str, what: &str| format!("invalid {what} '{v}' in region '{s}'");
    Ok(Rect::new(
        x.parse().map_err(|_| num(x, "x"))?,
        y.parse().map_err(|_| num(y, "y"))?,
        w.parse().map_err(|_| num(w, "width"))?,
        h.parse().map_err(|_| num(h, "height"))?,
    ))
}

fn read_layer_specs(path: &Path) -> anyhow::Result<Vec<LayerSpec>> {
    let f = File::open(path).with_context(|| format!("open layers '{}'", path.display()))?;
    let specs: Vec<LayerSpec> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse layers JSON")?;
    Ok(specs)
}

fn build_layers(source: &FsAssetSource, specs: Vec<LayerSpec>) -> anyhow::Result<Vec<PatchLayer>> {
    specs
        .into_iter()
        .map(|spec| {
            let texture = source
                .load(&spec.texture)
                .with_context(|| format!("load layer texture '{}'", spec.texture))?;
            let source_area = spec.source_area.unwrap_or_else(|| texture.bounds());
            let mut builder = PatchLayer::builder(texture, source_area)
                .offset(spec.offset.x, spec.offset.y)
                .scale(spec.scale)
                .tint_opt(spec.tint)
                .opacity(spec.opacity)
                .mode(spec.mode)
                .animation(spec.frames, spec.frame_duration);
            if let Some(area) = spec.destination_area {
                builder = builder.destination_area(area);
            }
            Ok(builder.build())
        })
        .collect()
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut settings = match &args.settings {
        Some(path) => EngineSettings::from_json_file(path)?,
        None => EngineSettings::default(),
    };
    if args.threads.is_some() {
        settings.threads = args.threads;
    }
    if let Some(parallel) = args.parallel {
        settings.parallel = parallel;
    }

    let source = Arc::new(FsAssetSource::new(&args.root));
    let layers = build_layers(&source, read_layer_specs(&args.layers)?)?;
    let engine = SpriteEngine::new(source, settings)?;

    let composed = engine
        .try_compose(&args.base, args.region, &layers)
        .with_context(|| format!("compose '{}'", args.base))?;
    for diag in &composed.diagnostics {
        eprintln!("skipped {diag}");
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = spritepatch::encode_png(&composed.sheet.pixels)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    let sheet = &composed.sheet;
    eprintln!(
        "sheet {}x{}: {} frame(s) of width {}, tick {}, scale {}, origin ({}, {})",
        sheet.pixels.width,
        sheet.pixels.height,
        sheet.frames,
        sheet.frame_width,
        sheet
            .tick_duration
            .map_or_else(|| "none".to_owned(), |t| t.to_string()),
        sheet.scale,
        sheet.origin.x,
        sheet.origin.y,
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
