mod app;
mod store;
mod util;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON snapshot of the note collection.
    #[arg(long, default_value = "notes.json")]
    notes: PathBuf,

    /// Log level filter, overridable through RUST_LOG.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    // The handle stays alive for the whole run; dropping it would shut the
    // logger down.
    let _logger = flexi_logger::Logger::try_with_env_or_str(&args.log)
        .and_then(flexi_logger::Logger::start)
        .map_err(|error| eprintln!("logging disabled: {error}"))
        .ok();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "slipmap",
        options,
        Box::new(move |cc| Ok(Box::new(app::SlipMapApp::new(cc, args.notes.clone())))),
    )
}
