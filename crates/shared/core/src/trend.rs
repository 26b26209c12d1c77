//! Trend lines
//!
//! A trend line is fit from two (timestamp, price) endpoints; its
//! predicted price at any instant is `slope * t + intercept` over unix
//! seconds. Names carry the trading convention: `low`/`lower` levels
//! are bought, `up`/`high` levels sold, and `support`/`resistance`
//! mark breakout levels. Paired lines share the suffix after the last
//! underscore (`lower_A` / `higher_A`).

use crate::order::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendKind {
    /// Trade between converging levels
    Band,
    /// Trigger a market entry when the level is crossed
    Breakout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendLine {
    pub name: String,
    pub kind: TrendKind,
    pub time_low: DateTime<Utc>,
    pub price_low: Decimal,
    pub time_high: DateTime<Utc>,
    pub price_high: Decimal,
}

impl TrendLine {
    /// Price change per second along the line.
    pub fn slope(&self) -> Decimal {
        let dt = Decimal::from(self.time_high.timestamp() - self.time_low.timestamp());
        (self.price_high - self.price_low) / dt
    }

    pub fn intercept(&self) -> Decimal {
        self.price_low - self.slope() * Decimal::from(self.time_low.timestamp())
    }

    /// Predicted price at `now` from the fitted line (y = mx + b).
    pub fn predicted_price(&self, now: DateTime<Utc>) -> Decimal {
        self.slope() * Decimal::from(now.timestamp()) + self.intercept()
    }

    /// Entry side implied by the naming convention for band lines.
    pub fn band_side(&self) -> Option<Side> {
        if self.name.contains("low") {
            Some(Side::Buy)
        } else if self.name.contains("up") || self.name.contains("high") {
            Some(Side::Sell)
        } else {
            None
        }
    }

    /// Entry side implied by the naming convention for breakout lines.
    pub fn breakout_side(&self) -> Option<Side> {
        if self.name.contains("supp") {
            Some(Side::Sell)
        } else if self.name.contains("resis") {
            Some(Side::Buy)
        } else {
            None
        }
    }

    /// Shared suffix after the last underscore, used for pairing.
    pub fn pair_suffix(&self) -> &str {
        self.name.rsplit('_').next().unwrap_or(&self.name)
    }
}

/// Ordered snapshot of trend lines for one symbol, read-only per cycle.
#[derive(Debug, Clone, Default)]
pub struct TrendSet {
    lines: Vec<TrendLine>,
}

impl TrendSet {
    pub fn new(lines: Vec<TrendLine>) -> Self {
        Self { lines }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrendLine> {
        self.lines.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&TrendLine> {
        self.lines.iter().find(|l| l.name == name)
    }

    /// Locate the symmetric exit line: `<prefix>_<suffix-of-name>`.
    ///
    /// For a Buy at `lower_A` the exit is `higher_A`, and vice versa.
    pub fn paired(&self, name: &str, prefix: &str) -> Option<&TrendLine> {
        let suffix = name.rsplit('_').next().unwrap_or(name);
        self.find(&format!("{prefix}_{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn line(name: &str, kind: TrendKind, p_low: Decimal, p_high: Decimal) -> TrendLine {
        TrendLine {
            name: name.to_string(),
            kind,
            time_low: Utc.timestamp_opt(1_000_000, 0).unwrap(),
            price_low: p_low,
            time_high: Utc.timestamp_opt(1_100_000, 0).unwrap(),
            price_high: p_high,
        }
    }

    #[test]
    fn test_predicted_price_interpolates() {
        let l = line("lower_A", TrendKind::Band, dec!(100), dec!(200));
        let mid = Utc.timestamp_opt(1_050_000, 0).unwrap();
        assert_eq!(l.predicted_price(mid), dec!(150));
        // extrapolation past the second endpoint
        let later = Utc.timestamp_opt(1_200_000, 0).unwrap();
        assert_eq!(l.predicted_price(later), dec!(300));
    }

    #[test]
    fn test_side_conventions() {
        assert_eq!(
            line("lower_A", TrendKind::Band, dec!(1), dec!(2)).band_side(),
            Some(Side::Buy)
        );
        assert_eq!(
            line("higher_A", TrendKind::Band, dec!(1), dec!(2)).band_side(),
            Some(Side::Sell)
        );
        assert_eq!(
            line("support_B", TrendKind::Breakout, dec!(1), dec!(2)).breakout_side(),
            Some(Side::Sell)
        );
        assert_eq!(
            line("resistance_B", TrendKind::Breakout, dec!(1), dec!(2)).breakout_side(),
            Some(Side::Buy)
        );
    }

    #[test]
    fn test_paired_lookup() {
        let set = TrendSet::new(vec![
            line("lower_A", TrendKind::Band, dec!(100), dec!(110)),
            line("higher_A", TrendKind::Band, dec!(120), dec!(130)),
            line("support_B", TrendKind::Breakout, dec!(90), dec!(95)),
        ]);
        assert_eq!(set.paired("lower_A", "higher").unwrap().name, "higher_A");
        assert_eq!(set.paired("higher_A", "lower").unwrap().name, "lower_A");
        assert!(set.paired("support_B", "higher").is_none());
    }
}
