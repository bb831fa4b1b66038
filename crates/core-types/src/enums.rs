use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two account variants every trade is simulated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMode {
    Spot,
    Futures,
}

impl MarketMode {
    pub const ALL: [MarketMode; 2] = [MarketMode::Spot, MarketMode::Futures];

    /// Human-readable account label used by chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            MarketMode::Spot => "Spot Account Balance",
            MarketMode::Futures => "Futures Account Balance",
        }
    }
}

impl fmt::Display for MarketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketMode::Spot => write!(f, "spot"),
            MarketMode::Futures => write!(f, "futures"),
        }
    }
}

/// Time-bucketing resolution for period aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "monthly" | "month" => Ok(Granularity::Monthly),
            "yearly" | "year" => Ok(Granularity::Yearly),
            other => Err(CoreError::InvalidInput(
                "granularity".to_string(),
                other.to_string(),
            )),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Yearly => write!(f, "yearly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_dashboard_names() {
        assert_eq!("daily".parse::<Granularity>().unwrap(), Granularity::Daily);
        assert_eq!(" Monthly ".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!("YEARLY".parse::<Granularity>().unwrap(), Granularity::Yearly);
        assert!("weekly".parse::<Granularity>().is_err());
    }

    #[test]
    fn market_mode_serializes_lowercase() {
        let json = serde_json::to_string(&MarketMode::Futures).unwrap();
        assert_eq!(json, "\"futures\"");
    }
}
