//! Mark-to-fair valuation of an account.

use std::collections::HashMap;

use alloy::primitives::U256;
use fastnum::{UD64, UD128};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{FairPrice, de_raw_amount};
use crate::{
    num::{Converter, bps_to_price, raw_to_amount},
    types::MarketId,
};

/// Fair price assumed for markets without a quote, in basis points.
pub const DEFAULT_FAIR_PRICE_BPS: u64 = 5000;

/// USDC balance held by the exchange, raw units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Balance {
    #[serde(deserialize_with = "de_raw_amount")]
    pub available: u128,
    #[serde(deserialize_with = "de_raw_amount")]
    pub reserved: u128,
}

/// Shares held in one market, raw units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(alias = "yesShares", deserialize_with = "de_raw_amount")]
    pub yes: u128,
    #[serde(alias = "noShares", deserialize_with = "de_raw_amount")]
    pub no: u128,
}

/// Body of `GET /api/state/:address`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountState {
    pub balance: Balance,
    pub positions: HashMap<MarketId, Position>,
    pub open_orders: Vec<serde_json::Value>,
}

/// Valuation of a single position. Shares and values in USDC.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValue {
    pub market_id: MarketId,
    pub yes_shares: UD128,
    pub no_shares: UD128,
    pub yes_fair_price: UD64,
    pub no_fair_price: UD64,
    pub yes_value: UD128,
    pub no_value: UD128,
    pub total_value: UD128,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub available: UD128,
    pub reserved: UD128,
}

/// Account overview with positions marked at fair prices.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub balance: BalanceSummary,
    pub total_position_value: UD128,
    pub position_count: usize,
    /// Ordered by market ID, flat positions omitted.
    pub positions: Vec<PositionValue>,
    pub open_order_count: usize,
}

impl PortfolioSummary {
    /// Values `state` using the fair prices known per market.
    pub fn new(state: &AccountState, fair_prices: &HashMap<MarketId, FairPrice>) -> Self {
        let positions = state
            .positions
            .iter()
            .filter(|(_, pos)| pos.yes > 0 || pos.no > 0)
            .sorted_by_key(|(market_id, _)| **market_id)
            .map(|(market_id, pos)| {
                let fair = fair_prices.get(market_id);
                PositionValue::new(
                    *market_id,
                    pos,
                    fair.and_then(|fp| fp.yes_fair_price)
                        .unwrap_or(DEFAULT_FAIR_PRICE_BPS),
                    fair.and_then(|fp| fp.no_fair_price)
                        .unwrap_or(DEFAULT_FAIR_PRICE_BPS),
                )
            })
            .collect_vec();

        let total_position_value = positions
            .iter()
            .fold(UD128::ZERO, |total, pos| total + pos.total_value);

        Self {
            balance: BalanceSummary {
                available: raw_to_amount(state.balance.available),
                reserved: raw_to_amount(state.balance.reserved),
            },
            total_position_value,
            position_count: positions.len(),
            positions,
            open_order_count: state.open_orders.len(),
        }
    }
}

impl PositionValue {
    fn new(market_id: MarketId, pos: &Position, yes_bps: u64, no_bps: u64) -> Self {
        let yes_shares = raw_to_amount(pos.yes);
        let no_shares = raw_to_amount(pos.no);
        let yes_value = yes_shares * price_factor(yes_bps);
        let no_value = no_shares * price_factor(no_bps);
        Self {
            market_id,
            yes_shares,
            no_shares,
            yes_fair_price: bps_to_price(yes_bps),
            no_fair_price: bps_to_price(no_bps),
            yes_value,
            no_value,
            total_value: yes_value + no_value,
        }
    }
}

fn price_factor(bps: u64) -> UD128 {
    Converter::price().from_unsigned(U256::from(bps))
}
