//! Read-only analytics over exchange API responses.
//!
//! Inputs are the JSON documents served by the exchange REST API, already
//! fetched by the caller. All arithmetic is exact decimal.

pub mod market;
pub mod portfolio;

pub use market::{BookDepth, BookLevel, FairPrice, MarketSignals, MarketStats, OrderBook};
pub use portfolio::{AccountState, PortfolioSummary, Position, PositionValue};

use alloy::primitives::{I256, U256};
use fastnum::{D64, UD64};
use serde::{Deserialize, Deserializer};

use crate::num::Converter;

/// Basis points as a percentage, `5500` -> `55`.
pub fn bps_to_percent(bps: u64) -> UD64 {
    Converter::new(2).from_unsigned(U256::from(bps))
}

/// Signed basis points as a percentage, `-150` -> `-1.5`.
pub fn signed_bps_to_percent(bps: i64) -> D64 {
    Converter::new(2).from_signed(I256::try_from(bps).unwrap_or_default())
}

/// Signed basis points as a price difference, `-200` -> `-0.02`.
pub fn signed_bps_to_price(bps: i64) -> D64 {
    Converter::price().from_signed(I256::try_from(bps).unwrap_or_default())
}

/// Raw token amount sent either as a decimal string or as a JSON number.
fn de_raw_amount<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        U64(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::U64(n) => Ok(u128::from(n)),
    }
}

#[cfg(test)]
mod tests {
    use fastnum::{dec64, udec64};

    use super::*;

    #[derive(Deserialize)]
    struct Amount {
        #[serde(deserialize_with = "de_raw_amount")]
        value: u128,
    }

    #[test]
    fn test_percent_conversion() {
        assert_eq!(bps_to_percent(5500), udec64!(55));
        assert_eq!(bps_to_percent(1), udec64!(0.01));
        assert_eq!(signed_bps_to_percent(-150), dec64!(-1.5));
        assert_eq!(signed_bps_to_percent(200), dec64!(2));
        assert_eq!(signed_bps_to_price(-200), dec64!(-0.02));
        assert_eq!(signed_bps_to_price(5500), dec64!(0.55));
    }

    #[test]
    fn test_raw_amount_formats() {
        let parse = |json: &str| serde_json::from_str::<Amount>(json).map(|a| a.value);
        assert_eq!(parse(r#"{"value": "340282366920938463463374607431768211455"}"#).unwrap(), u128::MAX);
        assert_eq!(parse(r#"{"value": 5000000}"#).unwrap(), 5_000_000);
        assert!(parse(r#"{"value": "1.5"}"#).is_err());
        assert!(parse(r#"{"value": -1}"#).is_err());
    }
}
