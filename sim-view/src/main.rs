//! Application entry point for the gravity sandbox.
//!
//! This binary parses the command line, sets up logging and eframe/egui,
//! and delegates all interactive logic and rendering to [`Viewer`].

mod settings;
mod viewer;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use settings::ViewConfig;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(about = "Interactive 2D point-mass gravity sandbox")]
struct Args {
    /// YAML settings file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };

    let viewer = Viewer::new(cfg.clone())?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cfg.window_width, cfg.window_height])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Simulation",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
