//! Originating-strategy recovery
//!
//! The only record of which strategy opened the current position is
//! the client-order identity of its fills. Funding settlements and
//! manual orders carry no identity and are skipped.

use talos_core::FillRecord;

/// Which strategy the position's most recent tagged fill came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOrigin {
    /// No tagged fill found; treated like a breakout position
    Unknown,
    /// Breakout entry (trend named support_*/resistance_*)
    Breakout { trend: String },
    /// Band trade between paired levels
    Band { trend: String },
}

impl FillOrigin {
    /// Trend name to tag generated exit orders with; the original
    /// labels unknown positions with the literal string "None".
    pub fn trend_name(&self) -> &str {
        match self {
            Self::Unknown => "None",
            Self::Breakout { trend } | Self::Band { trend } => trend,
        }
    }
}

/// Recover the origin from fill history (newest first), returning the
/// relevant fill alongside it.
pub fn recover<'a>(symbol: &str, fills: &'a [FillRecord]) -> (FillOrigin, Option<&'a FillRecord>) {
    let last = fills
        .iter()
        .find(|f| f.symbol == symbol && !f.cl_ord_id.is_empty());
    let Some(fill) = last else {
        return (FillOrigin::Unknown, None);
    };
    let Some(tag) = fill.tag() else {
        return (FillOrigin::Unknown, Some(fill));
    };
    let trend = tag.trend;
    let origin = if trend.contains("support") || trend.contains("resistance") {
        FillOrigin::Breakout { trend }
    } else {
        FillOrigin::Band { trend }
    };
    (origin, Some(fill))
}
