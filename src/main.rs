use clap::{Parser, Subcommand};
use kiyanka::config;
use kiyanka::imaging::RustBackend;
use kiyanka::segmentation::OnnxSegmenter;
use kiyanka::shell::Shell;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "kiyanka")]
#[command(about = "Resize images and remove backgrounds from an interactive prompt")]
#[command(long_about = "\
Resize images and remove backgrounds from an interactive prompt

Commands at the >> prompt:

  resize <path> <width>,<height> <mode> <extension>
      mode: 0 thumbnail, 1 contain, 2 cover, 3 fit, 4 pad
  rembg <path> [soft|hard]
  help [command]
  quit

Results are written next to the source:
  img.png  → img_768x768_pad.png     (resize)
  cat.jpg  → cat_no_bg.png           (rembg, hard edge)
  cat.jpg  → cat_no_bg_soft.png      (rembg, soft edge)

Run 'kiyanka gen-config' to generate a documented kiyanka.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = "kiyanka.toml", global = true)]
    config: PathBuf,

    /// Segmentation model, overrides rembg.model from the config
    #[arg(long)]
    model: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "kiyanka=trace" (default: RUST_LOG, then info)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock kiyanka.toml with all options documented
    GenConfig,
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_tracing(cli.log_level.as_deref());

    let mut settings = config::load_config(&cli.config)?;
    if let Some(model) = cli.model {
        settings.rembg.model = model;
    }
    debug!("Config: {:?}", settings);
    info!("Segmentation model: {}", settings.rembg.model.display());

    let backend = RustBackend::new();
    let segmenter = OnnxSegmenter::new(&settings.rembg.model);

    let stdin = io::stdin();
    let mut shell = Shell::new(
        stdin.lock(),
        io::stdout(),
        &backend,
        &segmenter,
        &settings,
    );
    shell.run()?;
    Ok(())
}
