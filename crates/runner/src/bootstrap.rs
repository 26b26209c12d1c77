//! Bootstrap - settings and wiring
//!
//! Settings load from a JSON file; every field has a default so a
//! missing file or partial file still yields a runnable dry-run
//! configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use talos_risk_manager::RiskConfig;
use talos_strategy::{BandConfig, BreakoutConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Band-trade knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BandSettings {
    pub entry_band_pct: Decimal,
    pub order_size_fraction: Decimal,
    pub sl_pct: Decimal,
    pub rr_limit: Decimal,
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            entry_band_pct: dec!(0.02),
            order_size_fraction: dec!(0.01),
            sl_pct: dec!(0.20),
            rr_limit: dec!(1.5),
        }
    }
}

/// Breakout knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BreakoutSettings {
    pub band_pct: Decimal,
    pub order_size_fraction: Decimal,
}

impl Default for BreakoutSettings {
    fn default() -> Self {
        Self {
            band_pct: dec!(0.01),
            order_size_fraction: dec!(0.01),
        }
    }
}

/// Risk-management knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    pub trail_pct: Decimal,
    pub roe_sl: Decimal,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            trail_pct: dec!(0.003),
            roe_sl: dec!(0.20),
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub symbol: String,
    pub leverage: Decimal,
    /// Seconds between decision cycles
    pub loop_interval_secs: u64,
    /// Run against the in-memory exchange instead of a live one
    pub dry_run: bool,
    pub trendlines_path: PathBuf,
    /// How many recent fills to fetch for origin recovery
    pub fill_lookup_count: usize,
    /// Position-limit reporting bounds, in contracts
    pub min_position: Decimal,
    pub max_position: Decimal,
    /// Stale-book cycle restarts before giving up
    pub stale_retry_limit: usize,
    pub band: BandSettings,
    pub breakout: BreakoutSettings,
    pub risk: RiskSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symbol: "XBTUSD".to_string(),
            leverage: dec!(10),
            loop_interval_secs: 5,
            dry_run: true,
            trendlines_path: PathBuf::from("trendlines.json"),
            fill_lookup_count: 20,
            min_position: dec!(-100_000),
            max_position: dec!(100_000),
            stale_retry_limit: 5,
            band: BandSettings::default(),
            breakout: BreakoutSettings::default(),
            risk: RiskSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn band_config(&self) -> BandConfig {
        BandConfig {
            entry_band_pct: self.band.entry_band_pct,
            order_size_fraction: self.band.order_size_fraction,
            leverage: self.leverage,
            sl_pct: self.band.sl_pct,
            rr_limit: self.band.rr_limit,
        }
    }

    pub fn breakout_config(&self) -> BreakoutConfig {
        BreakoutConfig {
            band_pct: self.breakout.band_pct,
            order_size_fraction: self.breakout.order_size_fraction,
            leverage: self.leverage,
        }
    }

    pub fn risk_config(&self) -> RiskConfig {
        RiskConfig {
            trail_pct: self.risk.trail_pct,
            roe_sl: self.risk.roe_sl,
            band_pct: self.band.entry_band_pct,
        }
    }
}
