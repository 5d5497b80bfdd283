mod headless;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use gradientfield_core::{AppConfig, FieldPreset};
use gradientfield_platform::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use headless::{parse_pointer, RenderJob};

#[derive(Parser, Debug)]
#[command(name = "gradientfield")]
#[command(about = "Pointer-reactive particle field logo")]
#[command(version)]
struct Cli {
    /// TOML config file; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Field tuning to start from (gradient, hero, classic)
    #[arg(long, global = true)]
    preset: Option<FieldPreset>,

    /// Seed for a reproducible particle layout
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive window (default)
    Window,
    /// Render frames offscreen and save the last one as PNG
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long, default_value_t = 120)]
    frames: u32,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Pointer held for the whole run as `x,y` in 0..=1, y down
    #[arg(long, value_parser = parse_pointer)]
    pointer: Option<Vec2>,

    #[arg(short, long, default_value = "gradientfield.png")]
    output: PathBuf,

    /// Also write the final particle state as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug,wgpu=warn,naga=warn,winit=info")
        } else {
            EnvFilter::new("info,wgpu=error,naga=error")
        }
    });
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Gradientfield starting");
    if let Err(e) = run(cli) {
        eprintln!("Gradientfield error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(preset) = cli.preset {
        config = config.with_preset(preset);
    }
    if cli.seed.is_some() {
        config.field.seed = cli.seed;
    }
    config.field.validate()?;
    info!(
        particles = config.field.particle_count,
        seed = ?config.field.seed,
        "loaded configuration"
    );

    match cli.command.unwrap_or(Command::Window) {
        Command::Window => gradientfield_ui::run_window(config),
        Command::Render(args) => {
            let job = RenderJob {
                frames: args.frames,
                width: args.width,
                height: args.height,
                pointer: args.pointer,
                output: args.output,
                snapshot: args.snapshot,
            };
            let report = headless::render(&config, &job)?;
            println!(
                "rendered {} frames ({} particles, {} glowing) to {}",
                report.frames,
                report.last.particles,
                report.last.glows,
                job.output.display()
            );
            Ok(())
        }
    }
}
