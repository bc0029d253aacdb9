use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use multibg::{
    BackgroundColor, CanvasComposer, Config, ImageFitter, ResizeFilter, ScreenInfo,
    ScreenLayoutProvider, StaticLayout, apply, default_provider, layout, load_images,
};

/// Set a separate background image on each monitor.
///
/// The images are composed into one picture covering the whole desktop,
/// written to a temporary PNG, and handed to the set program.
#[derive(Debug, Parser)]
#[command(name = "multibg", version, about)]
struct Args {
    /// Images in monitor order: the first goes on the first screen the
    /// display reports, and so on.
    #[arg(value_name = "IMAGE", required_unless_present = "list_screens")]
    images: Vec<PathBuf>,

    /// Program that sets the composed image as background. `{0}` is replaced
    /// with the image path.
    #[arg(short = 's', long, value_name = "TEMPLATE")]
    set_program: Option<String>,

    /// Display to query; the session default when omitted.
    #[arg(short, long)]
    display: Option<String>,

    /// Color for canvas areas no image covers, e.g. `black` or `#202020`.
    #[arg(short, long, value_name = "COLOR")]
    background: Option<BackgroundColor>,

    /// Interpolation used when scaling images.
    #[arg(long, value_enum)]
    filter: Option<ResizeFilter>,

    /// Use this layout instead of asking the display, e.g. `1920x1080+0+0`.
    /// Repeat once per screen.
    #[arg(long = "screen", value_name = "WxH+X+Y")]
    screens: Vec<ScreenInfo>,

    /// Write the composed image here and do not run the set program.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Compose and write the image, but do not run the set program.
    #[arg(long)]
    dry_run: bool,

    /// Keep the temporary image after the set program ran.
    #[arg(long)]
    keep: bool,

    /// Print the screen layout and exit.
    #[arg(long)]
    list_screens: bool,

    /// Config file to read instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log more; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("multibg: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("multibg={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref()).context("loading configuration")?;

    let provider: Box<dyn ScreenLayoutProvider> = if args.screens.is_empty() {
        default_provider()
    } else {
        Box::new(StaticLayout::new(args.screens.iter().copied()))
    };
    let display = args.display.as_deref().or(config.display.as_deref());
    let screens = layout::query_screens(provider.as_ref(), display)
        .context("querying the screen layout")?;

    if args.list_screens {
        for screen in &screens {
            println!("{}: {}", screen.index, screen);
        }
        return Ok(());
    }

    if screens.is_empty() {
        bail!("the display reported no screens");
    }
    if args.images.len() < screens.len() {
        info!(
            "{} image(s) for {} screen(s); the remaining screens stay background colored",
            args.images.len(),
            screens.len()
        );
    } else if args.images.len() > screens.len() {
        info!(
            "{} image(s) for {} screen(s); the extra images are not used",
            args.images.len(),
            screens.len()
        );
    }

    // Only decode what will be drawn.
    let used = args.images.len().min(screens.len());
    let images = load_images(&args.images[..used]).context("loading images")?;

    let composer = CanvasComposer::new(
        ImageFitter::new(args.filter.unwrap_or(config.filter)),
        args.background.unwrap_or(config.background),
    );
    let canvas = composer
        .compose(&screens, &images)
        .context("composing the background")?;

    if let Some(path) = &args.output {
        apply::save_canvas(&canvas, path)
            .with_context(|| format!("saving {}", path.display()))?;
        return Ok(());
    }

    let keep = args.keep || args.dry_run || config.keep_output;
    let output = apply::write_canvas(&canvas, config.output_dir.as_deref(), keep)
        .context("writing the composed image")?;

    if args.dry_run {
        println!("{}", output.path().display());
        return Ok(());
    }

    let set_program = args.set_program.as_deref().unwrap_or(&config.set_program);
    apply::run_set_program(set_program, output.path())
        .context("applying the background")?;
    info!("Background set from {}", output.path().display());
    Ok(())
}
