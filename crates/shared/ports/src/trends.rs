//! Trend-level provider port

use crate::error::TrendError;
use talos_core::TrendLine;

/// Supplies the ordered trend-line collection for a symbol.
///
/// Treated as a read-only snapshot: the loop refreshes it once at the
/// top of each cycle.
pub trait TrendSource: Send + Sync {
    fn trend_lines(&self, symbol: &str) -> Result<Vec<TrendLine>, TrendError>;
}
