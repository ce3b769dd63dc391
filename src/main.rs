use clap::Parser;
use log::{error, info};
use scanline_rasterizer::app::run_cli;
use scanline_rasterizer::io::config::Config;

/// Headless software scanline rasterizer
#[derive(Parser, Debug)]
#[command(name = "rasterizer")]
#[command(about = "TOML-driven software scanline rasterizer")]
struct Cli {
    /// Scene configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output image path
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Draw mode: wireframe, flat, gouraud, textured, textured_normal_mapped
    #[arg(short, long)]
    mode: Option<String>,

    /// Display mode index (0-14); switches lights as well as the draw mode
    #[arg(short, long, value_name = "INDEX")]
    display_mode: Option<usize>,

    /// Render every display mode to <stem>_<index>.<ext>
    #[arg(long)]
    all_modes: bool,

    /// Animation frames to advance before rendering
    #[arg(short, long)]
    frames: Option<u32>,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| {
            error!("Config error: {}", e);
            format!("failed to load '{}'", path)
        })?,
        None => {
            info!("No config given, using defaults.");
            Config::default()
        }
    };

    if let Some(output) = cli.output {
        config.render.output = output;
    }
    if let Some(mode) = cli.mode {
        config.render.mode = mode;
        config.render.display_mode = None;
    }
    if let Some(index) = cli.display_mode {
        config.render.display_mode = Some(index);
    }
    if let Some(frames) = cli.frames {
        config.render.frames = frames;
    }

    run_cli(config, cli.all_modes).map_err(|e| {
        error!("Render failed: {}", e);
        e.to_string()
    })
}
