mod app;
mod budget;
mod chart;
mod cli;
mod util;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Args;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if args.headless {
        return cli::run_headless(&args);
    }

    let source = app::ChartSource {
        data: args.data,
        width: args.width,
        view: args.view,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([source.width + 80.0, source.width * 5.0 / 9.0 + 140.0]),
        ..Default::default()
    };

    eframe::run_native(
        "budget-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::BudgetBubblesApp::new(cc, source.clone())))),
    )
    .map_err(|error| anyhow!("failed to start the window: {error}"))
}
