//! Raw edge signals of a market: spreads, arbitrage, depth and volume.
//!
//! Signals are reported as-is, acting on them is up to the agent.

use fastnum::{D64, UD64, UD128};
use serde::{Deserialize, Serialize};

use super::{bps_to_percent, de_raw_amount, signed_bps_to_percent, signed_bps_to_price};
use crate::{
    num::{PRICE_PRECISION, raw_to_amount},
    types::MarketId,
};

/// Body of `GET /api/fair-price/:marketId`. Prices in basis points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FairPrice {
    pub yes_best_bid: Option<u64>,
    pub yes_best_ask: Option<u64>,
    pub no_best_bid: Option<u64>,
    pub no_best_ask: Option<u64>,
    pub yes_fair_price: Option<u64>,
    pub no_fair_price: Option<u64>,
    pub has_liquidity: bool,
}

/// Aggregated price level of the order book.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookLevel {
    pub price: Option<u64>,
    #[serde(deserialize_with = "de_raw_amount")]
    pub total_amount: u128,
}

/// Body of `GET /api/orderbook/:marketId`, best level first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderBook {
    pub yes_bids: Vec<BookLevel>,
    pub yes_asks: Vec<BookLevel>,
    pub no_bids: Vec<BookLevel>,
    pub no_asks: Vec<BookLevel>,
}

/// Body of `GET /api/market-stats/:marketId`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketStats {
    #[serde(deserialize_with = "de_raw_amount")]
    pub volume: u128,
    pub trade_count: u64,
    pub last_trade_price: Option<u64>,
    pub phase: Option<String>,
    pub hand_id: Option<serde_json::Value>,
}

/// Bid/ask spread of one outcome, negative when the book is crossed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spread {
    pub bps: i64,
    pub pct: D64,
    /// Profit per share buying at bid and selling at ask, in USDC.
    pub capture: D64,
}

/// Combined price of both outcomes and its distance from 100%.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Combined {
    pub bps: u64,
    pub pct: UD64,
    /// Positive when trading both sides is profitable.
    pub edge_pct: D64,
}

/// Signals derived from [`FairPrice`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSignals {
    pub yes_best_bid: Option<u64>,
    pub yes_best_ask: Option<u64>,
    pub no_best_bid: Option<u64>,
    pub no_best_ask: Option<u64>,
    pub yes_fair_price: Option<u64>,
    pub no_fair_price: Option<u64>,
    pub has_liquidity: bool,
    pub yes_spread: Option<Spread>,
    pub no_spread: Option<Spread>,
    /// Cost of buying YES and NO at the asks.
    pub buy_both: Option<Combined>,
    /// Revenue of selling YES and NO at the bids, e.g. after minting a pair.
    pub sell_both: Option<Combined>,
    /// Sum of fair prices, should be close to 100%.
    pub yes_no_sum: Option<Combined>,
}

/// Liquidity of the book, amounts in USDC.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDepth {
    pub yes_bid_levels: usize,
    pub yes_ask_levels: usize,
    pub no_bid_levels: usize,
    pub no_ask_levels: usize,
    pub yes_bid_depth: UD128,
    pub yes_ask_depth: UD128,
    pub no_bid_depth: UD128,
    pub no_ask_depth: UD128,
    pub yes_bid_top_size: UD128,
    pub yes_ask_top_size: UD128,
    pub no_bid_top_size: UD128,
    pub no_ask_top_size: UD128,
}

/// Activity of the market.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Traded volume in USDC.
    pub volume: UD128,
    pub trade_count: u64,
    pub last_trade_price: Option<u64>,
    pub phase: Option<String>,
    pub hand_id: Option<serde_json::Value>,
}

/// Everything known about a market.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSignals {
    pub market_id: MarketId,
    pub quotes: Option<QuoteSignals>,
    pub orderbook: Option<BookDepth>,
    pub stats: Option<StatsSummary>,
}

impl MarketSignals {
    /// Combines whichever responses were available for the market.
    pub fn analyze(
        market_id: MarketId,
        fair_price: Option<&FairPrice>,
        book: Option<&OrderBook>,
        stats: Option<&MarketStats>,
    ) -> Self {
        Self {
            market_id,
            quotes: fair_price.map(QuoteSignals::from),
            orderbook: book.map(BookDepth::from),
            stats: stats.map(StatsSummary::from),
        }
    }
}

/// Zero quotes mean "no order on that side".
fn quote(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v > 0)
}

/// `None` for quotes too large to be prices.
fn spread(bid: Option<u64>, ask: Option<u64>) -> Option<Spread> {
    let (bid, ask) = (quote(bid)?, quote(ask)?);
    let bps = i64::try_from(i128::from(ask) - i128::from(bid)).ok()?;
    Some(Spread {
        bps,
        pct: signed_bps_to_percent(bps),
        capture: signed_bps_to_price(bps),
    })
}

/// `None` for quotes too large to be prices.
fn combined(a: Option<u64>, b: Option<u64>, edge_sign: i64) -> Option<Combined> {
    let bps = quote(a)?.checked_add(quote(b)?)?;
    let edge = i64::try_from(i128::from(PRICE_PRECISION) - i128::from(bps))
        .ok()?
        .checked_mul(edge_sign)?;
    Some(Combined {
        bps,
        pct: bps_to_percent(bps),
        edge_pct: signed_bps_to_percent(edge),
    })
}

impl From<&FairPrice> for QuoteSignals {
    fn from(fp: &FairPrice) -> Self {
        Self {
            yes_best_bid: fp.yes_best_bid,
            yes_best_ask: fp.yes_best_ask,
            no_best_bid: fp.no_best_bid,
            no_best_ask: fp.no_best_ask,
            yes_fair_price: fp.yes_fair_price,
            no_fair_price: fp.no_fair_price,
            has_liquidity: fp.has_liquidity,
            yes_spread: spread(fp.yes_best_bid, fp.yes_best_ask),
            no_spread: spread(fp.no_best_bid, fp.no_best_ask),
            buy_both: combined(fp.yes_best_ask, fp.no_best_ask, 1),
            sell_both: combined(fp.yes_best_bid, fp.no_best_bid, -1),
            yes_no_sum: combined(fp.yes_fair_price, fp.no_fair_price, -1),
        }
    }
}

fn depth(levels: &[BookLevel]) -> UD128 {
    raw_to_amount(
        levels
            .iter()
            .fold(0u128, |total, level| total.saturating_add(level.total_amount)),
    )
}

fn top_size(levels: &[BookLevel]) -> UD128 {
    raw_to_amount(levels.first().map_or(0, |level| level.total_amount))
}

impl From<&OrderBook> for BookDepth {
    fn from(book: &OrderBook) -> Self {
        Self {
            yes_bid_levels: book.yes_bids.len(),
            yes_ask_levels: book.yes_asks.len(),
            no_bid_levels: book.no_bids.len(),
            no_ask_levels: book.no_asks.len(),
            yes_bid_depth: depth(&book.yes_bids),
            yes_ask_depth: depth(&book.yes_asks),
            no_bid_depth: depth(&book.no_bids),
            no_ask_depth: depth(&book.no_asks),
            yes_bid_top_size: top_size(&book.yes_bids),
            yes_ask_top_size: top_size(&book.yes_asks),
            no_bid_top_size: top_size(&book.no_bids),
            no_ask_top_size: top_size(&book.no_asks),
        }
    }
}

impl From<&MarketStats> for StatsSummary {
    fn from(stats: &MarketStats) -> Self {
        Self {
            volume: raw_to_amount(stats.volume),
            trade_count: stats.trade_count,
            last_trade_price: stats.last_trade_price,
            phase: stats.phase.clone(),
            hand_id: stats.hand_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use fastnum::{dec64, udec64, udec128};

    use super::*;

    fn fair_price() -> FairPrice {
        serde_json::from_str(
            r#"{
                "yesBestBid": 5400, "yesBestAsk": 5600,
                "noBestBid": 4300, "noBestAsk": 4500,
                "yesFairPrice": 5500, "noFairPrice": 4400,
                "hasLiquidity": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_spreads() {
        let quotes = QuoteSignals::from(&fair_price());
        assert_eq!(
            quotes.yes_spread,
            Some(Spread {
                bps: 200,
                pct: dec64!(2),
                capture: dec64!(0.02)
            })
        );
        assert_eq!(quotes.no_spread.unwrap().bps, 200);
    }

    #[test]
    fn test_crossed_book_spread() {
        let fp: FairPrice =
            serde_json::from_str(r#"{"yesBestBid": 5600, "yesBestAsk": 5400}"#).unwrap();
        assert_eq!(
            QuoteSignals::from(&fp).yes_spread,
            Some(Spread {
                bps: -200,
                pct: dec64!(-2),
                capture: dec64!(-0.02)
            })
        );
    }

    #[test]
    fn test_oversized_quotes() {
        let fp: FairPrice = serde_json::from_str(
            r#"{"yesBestBid": 1, "yesBestAsk": 18446744073709551615, "noBestAsk": 1, "noBestBid": 18446744073709551614}"#,
        )
        .unwrap();
        let quotes = QuoteSignals::from(&fp);
        assert_eq!(quotes.buy_both, None);
        assert_eq!(quotes.yes_spread, None);
        assert_eq!(quotes.no_spread, None);
        // sum fits u64 but not a signed edge
        assert_eq!(quotes.sell_both, None);
    }

    #[test]
    fn test_arbitrage_signals() {
        let quotes = QuoteSignals::from(&fair_price());

        let buy_both = quotes.buy_both.unwrap();
        assert_eq!(buy_both.bps, 10100);
        assert_eq!(buy_both.pct, udec64!(101));
        assert_eq!(buy_both.edge_pct, dec64!(-1));

        let sell_both = quotes.sell_both.unwrap();
        assert_eq!(sell_both.bps, 9700);
        assert_eq!(sell_both.edge_pct, dec64!(-3));

        let sum = quotes.yes_no_sum.unwrap();
        assert_eq!(sum.bps, 9900);
        assert_eq!(sum.pct, udec64!(99));
    }

    #[test]
    fn test_profitable_buy_both() {
        let fp = FairPrice {
            yes_best_ask: Some(4800),
            no_best_ask: Some(5000),
            ..Default::default()
        };
        let quotes = QuoteSignals::from(&fp);
        assert_eq!(quotes.buy_both.unwrap().edge_pct, dec64!(2));
        assert_eq!(quotes.sell_both, None);
        assert_eq!(quotes.yes_spread, None);
    }

    #[test]
    fn test_missing_or_zero_quotes() {
        let fp: FairPrice =
            serde_json::from_str(r#"{"yesBestBid": 0, "yesBestAsk": 5600}"#).unwrap();
        let quotes = QuoteSignals::from(&fp);
        assert_eq!(quotes.yes_spread, None);
        assert!(!quotes.has_liquidity);
    }

    #[test]
    fn test_book_depth() {
        let book: OrderBook = serde_json::from_str(
            r#"{
                "yesBids": [{"price": 5400, "totalAmount": "2500000"}, {"price": 5300, "totalAmount": "1000000"}],
                "yesAsks": [{"price": 5600, "totalAmount": 750000}],
                "noBids": []
            }"#,
        )
        .unwrap();
        let depth = BookDepth::from(&book);

        assert_eq!(depth.yes_bid_levels, 2);
        assert_eq!(depth.yes_bid_depth, udec128!(3.5));
        assert_eq!(depth.yes_bid_top_size, udec128!(2.5));
        assert_eq!(depth.yes_ask_depth, udec128!(0.75));
        assert_eq!(depth.no_bid_levels, 0);
        assert_eq!(depth.no_bid_depth, udec128!(0));
        assert_eq!(depth.no_ask_top_size, udec128!(0));
    }

    #[test]
    fn test_book_depth_saturates() {
        let book: OrderBook = serde_json::from_str(
            r#"{"noAsks": [{"totalAmount": "340282366920938463463374607431768211455"}, {"totalAmount": "1"}]}"#,
        )
        .unwrap();
        let depth = BookDepth::from(&book);
        assert_eq!(depth.no_ask_levels, 2);
        assert_eq!(depth.no_ask_depth, raw_to_amount(u128::MAX));
    }

    #[test]
    fn test_stats_and_serialization() {
        let stats: MarketStats = serde_json::from_str(
            r#"{"volume": "123450000", "tradeCount": 17, "lastTradePrice": 5500, "phase": "betting", "handId": 42}"#,
        )
        .unwrap();

        let signals = MarketSignals::analyze(7, Some(&fair_price()), None, Some(&stats));
        let stats = signals.stats.as_ref().unwrap();
        assert_eq!(stats.volume, udec128!(123.45));
        assert_eq!(stats.trade_count, 17);
        assert!(signals.orderbook.is_none());

        let json = serde_json::to_value(&signals).unwrap();
        assert_eq!(json["marketId"], 7);
        assert_eq!(json["quotes"]["yesSpread"]["bps"], 200);
        assert_eq!(json["stats"]["phase"], "betting");
        assert!(json["orderbook"].is_null());
    }
}
