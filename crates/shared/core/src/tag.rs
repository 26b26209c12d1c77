//! Client-order identity
//!
//! The only cross-cycle memory of *why* an order exists is a tag
//! embedded in its client-order-ID string. Internally the tag is a
//! structured value; it is encoded to the wire string on submission
//! and parsed back from live orders, so the exchange still sees the
//! same opaque identifiers (`"Tp hl lower_A"`, `"SBuy resistance_B"`).
//!
//! Matching against live orders is structured equality over role and
//! trend plus a tranche-compatibility check, not raw substring
//! containment, so colliding trend names cannot cross-match.

use crate::order::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profit-taking tranche suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tranche {
    /// 15% slice exiting at the 5% P&L milestone (`qrt`)
    Quarter,
    /// 25% slice exiting at the 8% P&L milestone (`hl`)
    Half,
    /// 35% slice exiting at the 12% P&L milestone (`q3rt`)
    ThreeQuarter,
    /// Half of a band-trade position exiting at half of max P&L (`h`)
    BandHalf,
    /// Remainder of a band-trade position exiting at the predicted level (`l`)
    BandRest,
}

impl Tranche {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quarter => "qrt",
            Self::Half => "hl",
            Self::ThreeQuarter => "q3rt",
            Self::BandHalf => "h",
            Self::BandRest => "l",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "qrt" => Some(Self::Quarter),
            "hl" => Some(Self::Half),
            "q3rt" => Some(Self::ThreeQuarter),
            "h" => Some(Self::BandHalf),
            "l" => Some(Self::BandRest),
            _ => None,
        }
    }
}

/// Semantic role of an order, the wire prefix of its identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderRole {
    /// Plain band-trade entry (`Buy` / `Sell` prefix)
    Entry(Side),
    /// Breakout entry stop (`SBuy` / `SSell` prefix)
    BreakoutEntry(Side),
    /// Take-profit (`Tp` prefix)
    TakeProfit,
    /// Stop-loss (`SL` prefix)
    StopLoss,
}

impl OrderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry(Side::Buy) => "Buy",
            Self::Entry(Side::Sell) => "Sell",
            Self::BreakoutEntry(Side::Buy) => "SBuy",
            Self::BreakoutEntry(Side::Sell) => "SSell",
            Self::TakeProfit => "Tp",
            Self::StopLoss => "SL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Buy" => Some(Self::Entry(Side::Buy)),
            "Sell" => Some(Self::Entry(Side::Sell)),
            "SBuy" => Some(Self::BreakoutEntry(Side::Buy)),
            "SSell" => Some(Self::BreakoutEntry(Side::Sell)),
            "Tp" => Some(Self::TakeProfit),
            "SL" => Some(Self::StopLoss),
            _ => None,
        }
    }

    /// Orders that must survive entry-order pruning once a position is open.
    pub fn is_protective(&self) -> bool {
        matches!(
            self,
            Self::BreakoutEntry(_) | Self::TakeProfit | Self::StopLoss
        )
    }
}

/// Structured client-order identity: role + optional tranche + trend name.
///
/// Invariant: within one decision cycle, no two desired orders may
/// encode to the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTag {
    pub role: OrderRole,
    pub tranche: Option<Tranche>,
    pub trend: String,
}

impl OrderTag {
    pub fn entry(side: Side, trend: impl Into<String>) -> Self {
        Self {
            role: OrderRole::Entry(side),
            tranche: None,
            trend: trend.into(),
        }
    }

    pub fn breakout_entry(side: Side, trend: impl Into<String>) -> Self {
        Self {
            role: OrderRole::BreakoutEntry(side),
            tranche: None,
            trend: trend.into(),
        }
    }

    pub fn take_profit(tranche: Option<Tranche>, trend: impl Into<String>) -> Self {
        Self {
            role: OrderRole::TakeProfit,
            tranche,
            trend: trend.into(),
        }
    }

    pub fn stop_loss(trend: impl Into<String>) -> Self {
        Self {
            role: OrderRole::StopLoss,
            tranche: None,
            trend: trend.into(),
        }
    }

    /// Wire encoding: `"<role> [<tranche>] <trend>"`.
    pub fn encode(&self) -> String {
        match self.tranche {
            Some(tranche) => format!("{} {} {}", self.role.as_str(), tranche.as_str(), self.trend),
            None => format!("{} {}", self.role.as_str(), self.trend),
        }
    }

    /// Parse a live order's client-order-ID back into a tag.
    ///
    /// Unrecognized strings yield None: the order is treated as
    /// untagged (manually placed, or from a different bot).
    pub fn parse(cl_ord_id: &str) -> Option<Self> {
        let tokens: Vec<&str> = cl_ord_id.split_whitespace().collect();
        match tokens.as_slice() {
            [role, trend] => Some(Self {
                role: OrderRole::parse(role)?,
                tranche: None,
                trend: (*trend).to_string(),
            }),
            [role, tranche, trend] => Some(Self {
                role: OrderRole::parse(role)?,
                tranche: Some(Tranche::parse(tranche)?),
                trend: (*trend).to_string(),
            }),
            _ => None,
        }
    }

    /// Does this desired identity claim the given live identity?
    ///
    /// Role and trend must be equal; the tranche must be equal, or the
    /// desired side carries none (live identities may have grown a
    /// tranche suffix over the order's lifetime).
    pub fn matches(&self, live: &OrderTag) -> bool {
        self.role == live.role
            && self.trend == live.trend
            && (self.tranche == live.tranche || self.tranche.is_none())
    }
}

impl fmt::Display for OrderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_original_wire_format() {
        assert_eq!(
            OrderTag::take_profit(Some(Tranche::Half), "lower_A").encode(),
            "Tp hl lower_A"
        );
        assert_eq!(OrderTag::stop_loss("support_B").encode(), "SL support_B");
        assert_eq!(
            OrderTag::breakout_entry(Side::Sell, "support_B").encode(),
            "SSell support_B"
        );
        assert_eq!(OrderTag::entry(Side::Buy, "lower_A").encode(), "Buy lower_A");
    }

    #[test]
    fn test_parse_round_trip() {
        for raw in [
            "Buy lower_A",
            "SSell support_B",
            "Tp q3rt resistance_C",
            "Tp h higher_A",
            "SL lower_A",
        ] {
            let tag = OrderTag::parse(raw).expect(raw);
            assert_eq!(tag.encode(), raw);
        }
    }

    #[test]
    fn test_parse_rejects_foreign_ids() {
        assert_eq!(OrderTag::parse(""), None);
        assert_eq!(OrderTag::parse("mm-42"), None);
        assert_eq!(OrderTag::parse("Tp bogus lower_A"), None);
        assert_eq!(OrderTag::parse("Buy a b c"), None);
    }

    #[test]
    fn test_matching_role_discriminates() {
        let tp = OrderTag::take_profit(Some(Tranche::Half), "support_A");
        let sl = OrderTag {
            role: OrderRole::StopLoss,
            tranche: Some(Tranche::Half),
            trend: "support_A".to_string(),
        };
        assert!(tp.matches(&tp));
        assert!(!tp.matches(&sl));
        assert!(!sl.matches(&tp));
    }

    #[test]
    fn test_matching_tolerates_grown_tranche() {
        let desired = OrderTag::take_profit(None, "lower_A");
        let live = OrderTag::take_profit(Some(Tranche::BandHalf), "lower_A");
        assert!(desired.matches(&live));
        // but a concrete desired tranche is exact
        let desired = OrderTag::take_profit(Some(Tranche::BandRest), "lower_A");
        assert!(!desired.matches(&live));
    }

    #[test]
    fn test_matching_rejects_trend_name_collision() {
        let desired = OrderTag::entry(Side::Buy, "lower_A");
        let live = OrderTag::entry(Side::Buy, "lower_AB");
        assert!(!desired.matches(&live));
        // plain entry must not claim a breakout entry either
        let live = OrderTag::breakout_entry(Side::Buy, "lower_A");
        assert!(!desired.matches(&live));
    }
}
