//! Trend-line sources
//!
//! Trend lines are fit offline and dropped next to the bot as a JSON
//! file; the loop re-reads the file every cycle so lines can be
//! swapped without a restart.

use std::path::PathBuf;
use talos_core::TrendLine;
use talos_ports::{TrendError, TrendSource};

/// Reads trend lines from a JSON file on every call.
pub struct JsonTrendSource {
    path: PathBuf,
}

impl JsonTrendSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TrendSource for JsonTrendSource {
    fn trend_lines(&self, _symbol: &str) -> Result<Vec<TrendLine>, TrendError> {
        let raw = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| TrendError::Malformed(e.to_string()))
    }
}

/// Fixed in-memory lines, for dry runs and tests.
pub struct FixedTrendSource {
    lines: Vec<TrendLine>,
}

impl FixedTrendSource {
    pub fn new(lines: Vec<TrendLine>) -> Self {
        Self { lines }
    }
}

impl TrendSource for FixedTrendSource {
    fn trend_lines(&self, _symbol: &str) -> Result<Vec<TrendLine>, TrendError> {
        Ok(self.lines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lines_parse() {
        let raw = r#"[
            {
                "name": "lower_A",
                "kind": "band",
                "time_low": "2026-01-01T00:00:00Z",
                "price_low": "10000",
                "time_high": "2026-01-02T00:00:00Z",
                "price_high": "10100"
            }
        ]"#;
        let lines: Vec<TrendLine> = serde_json::from_str(raw).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "lower_A");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = JsonTrendSource::new(PathBuf::from("/nonexistent/trendlines.json"));
        assert!(matches!(
            source.trend_lines("XBTUSD"),
            Err(TrendError::Io(_))
        ));
    }
}
