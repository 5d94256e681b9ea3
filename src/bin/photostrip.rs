use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use photostrip::{BoothOpts, CapturedFrame, Compositor, StripCapacity, StripStore, TemplateCatalog};

#[derive(Parser, Debug)]
#[command(name = "photostrip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose one strip from image files and save it as a PNG.
    Compose(ComposeArgs),
    /// List the template catalog.
    Templates(TemplatesArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Frame image, in strip order. Repeat for each frame.
    #[arg(long = "frame")]
    frames: Vec<PathBuf>,

    /// Frames per strip (4 or 8).
    #[arg(long, default_value = "4", value_parser = parse_capacity)]
    capacity: StripCapacity,

    /// Template id.
    #[arg(long, default_value = photostrip::template::catalog::DEFAULT_TEMPLATE_ID)]
    template: String,

    /// Caption drawn near the bottom edge.
    #[arg(long, default_value = "")]
    caption: String,

    /// Stamp as `x,y,glyph`. Repeat for more stamps.
    #[arg(long = "stamp", value_parser = parse_stamp)]
    stamps: Vec<(f64, f64, String)>,

    /// Template catalog JSON replacing the built-in catalog.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Booth options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory; overrides `output_dir` from the options file.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TemplatesArgs {
    /// Template catalog JSON replacing the built-in catalog.
    #[arg(long)]
    templates: Option<PathBuf>,
}

fn parse_capacity(s: &str) -> Result<StripCapacity, String> {
    let n: u32 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    StripCapacity::try_from(n).map_err(|e| e.to_string())
}

fn parse_stamp(s: &str) -> Result<(f64, f64, String), String> {
    let mut parts = s.splitn(3, ',');
    let (Some(x), Some(y), Some(glyph)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("stamp '{s}' must look like x,y,glyph"));
    };
    let x: f64 = x.trim().parse().map_err(|_| format!("bad stamp x '{x}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("bad stamp y '{y}'"))?;
    if glyph.is_empty() {
        return Err(format!("stamp '{s}' has no glyph"));
    }
    Ok((x, y, glyph.to_owned()))
}

fn load_catalog(path: Option<&PathBuf>) -> anyhow::Result<TemplateCatalog> {
    Ok(match path {
        Some(p) => TemplateCatalog::from_json_file(p)?,
        None => TemplateCatalog::builtin(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args).await,
        Command::Templates(args) => cmd_templates(args),
    }
}

async fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut opts = match &args.config {
        Some(p) => BoothOpts::from_json_file(p)?,
        None => BoothOpts::default(),
    };
    if let Some(dir) = args.out_dir {
        opts.output_dir = dir;
    }

    let catalog = load_catalog(args.templates.as_ref())?;
    let template = catalog
        .get(&args.template)
        .with_context(|| format!("unknown template '{}'", args.template))?
        .clone();

    let store = StripStore::new(opts.max_stamps);
    store.set_capacity(args.capacity);
    store.set_template(template);
    store.set_caption(args.caption);

    for path in &args.frames {
        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "frame unreadable, using placeholder");
                Vec::new()
            }
        };
        if !store.push_frame(CapturedFrame::from_encoded(bytes)) {
            tracing::warn!(path = %path.display(), "strip is full, frame ignored");
        }
    }
    for (x, y, glyph) in args.stamps {
        if !store.add_stamp(glyph, x, y) {
            tracing::warn!(max = opts.max_stamps, "stamp limit reached, stamp ignored");
        }
    }

    let preview = Compositor::from_opts(&opts).compose(&store.snapshot()).await;
    let path = preview.save_download(&opts.output_dir)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_templates(args: TemplatesArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.templates.as_ref())?;
    for t in catalog.iter() {
        println!("{}\t{}\t{}", t.id, t.label, t.kind);
    }
    Ok(())
}
