// GUI-subsystem binary: no console window is allocated on Windows.
#![windows_subsystem = "windows"]

use clap::Parser;
use eframe::egui;
use huepick::app::HuePickApp;
use huepick::canvas::Surface;
use huepick::config::Config;
use huepick::{log_err, logger};
use std::path::PathBuf;

/// HuePick — magnifier color picker for raster images.
///
/// Hover the image with a zoomed, gridded loupe and click to copy the
/// hovered pixel's color to the clipboard as #rrggbb.
#[derive(Parser, Debug)]
#[command(name = "huepick", about = "Magnifier color picker for raster images")]
struct CliArgs {
    /// Image file to open. A generated placeholder is shown when omitted.
    image: Option<PathBuf>,

    /// JSON configuration file overriding the built-in defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    // Session log (overwrites the previous session's file).
    logger::init();

    let args = CliArgs::parse();

    let config = Config::load(args.config.as_deref()).unwrap_or_else(|e| fail(&e));
    let surface = match &args.image {
        Some(path) => Surface::from_path(path).unwrap_or_else(|e| fail(&e)),
        None => Surface::placeholder(),
    };
    let app = HuePickApp::new(config, surface).unwrap_or_else(|e| fail(&e));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("HuePick"),
        ..Default::default()
    };
    eframe::run_native("HuePick", options, Box::new(move |_cc| Box::new(app)))
}

/// Log a startup error and exit. A half-initialised widget is worse than
/// failing early.
fn fail(msg: &str) -> ! {
    log_err!("{}", msg);
    eprintln!("HuePick: {}", msg);
    std::process::exit(1);
}
