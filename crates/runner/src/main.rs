//! Bot entry point
//!
//! Loads settings, wires the loop and runs it. Only the dry-run wiring
//! against the in-memory exchange ships here; a live transport plugs
//! in behind the same port.

use exchange_sim::SimExchange;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use talos_ports::TrendSource;
use talos_runner::{FixedTrendSource, JsonTrendSource, LogNotifier, Settings, Trader};

#[tokio::main]
async fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Could not load {}: {e}; using defaults", path.display());
            Settings::default()
        }
    };

    if !settings.dry_run {
        error!("No live exchange transport is wired in; set dry_run");
        std::process::exit(1);
    }

    let trends: Box<dyn TrendSource> = if settings.trendlines_path.exists() {
        Box::new(JsonTrendSource::new(settings.trendlines_path.clone()))
    } else {
        warn!(
            "No trend lines at {}; running with an empty set",
            settings.trendlines_path.display()
        );
        Box::new(FixedTrendSource::new(Vec::new()))
    };

    info!("Starting dry run on {}", settings.symbol);
    let exchange = Arc::new(SimExchange::flat_xbtusd());
    let mut trader = Trader::new(exchange, trends, Box::new(LogNotifier), settings);
    if let Err(e) = trader.run().await {
        error!("Fatal: {e}");
        std::process::exit(1);
    }
}
