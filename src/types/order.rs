use std::{fmt, str::FromStr};

use alloy::primitives::Address;

use super::MarketId;

/// Side of the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

/// Outcome the order trades shares of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Yes,
    No,
}

impl Side {
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl Outcome {
    pub fn is_yes(&self) -> bool {
        matches!(self, Outcome::Yes)
    }
}

impl From<bool> for Side {
    fn from(is_buy: bool) -> Self {
        if is_buy { Side::Buy } else { Side::Sell }
    }
}

impl From<bool> for Outcome {
    fn from(is_yes: bool) -> Self {
        if is_yes { Outcome::Yes } else { Outcome::No }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(format!("unknown side {s:?}, expected buy or sell")),
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(Outcome::Yes),
            "no" => Ok(Outcome::No),
            _ => Err(format!("unknown outcome {s:?}, expected yes or no")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Yes => "yes",
            Outcome::No => "no",
        })
    }
}

/// Trading intent in protocol units, as hashed by the exchange contract.
///
/// `price` is in basis points and `amount` in raw USDC units. Values are
/// taken as given, range checks happen in [`crate::num`] before an order is
/// assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Order {
    trader: Address,
    market_id: MarketId,
    is_buy: bool,
    is_yes: bool,
    price: u64,
    amount: u128,
    nonce: u64,
    expiry: u64,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader: Address,
        market_id: MarketId,
        side: Side,
        outcome: Outcome,
        price: u64,
        amount: u128,
        nonce: u64,
        expiry: u64,
    ) -> Self {
        Self {
            trader,
            market_id,
            is_buy: side.is_buy(),
            is_yes: outcome.is_yes(),
            price,
            amount,
            nonce,
            expiry,
        }
    }

    pub fn trader(&self) -> Address {
        self.trader
    }

    pub fn market_id(&self) -> MarketId {
        self.market_id
    }

    pub fn is_buy(&self) -> bool {
        self.is_buy
    }

    pub fn is_yes(&self) -> bool {
        self.is_yes
    }

    pub fn side(&self) -> Side {
        self.is_buy.into()
    }

    pub fn outcome(&self) -> Outcome {
        self.is_yes.into()
    }

    /// Price in basis points.
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Amount in raw USDC units.
    pub fn amount(&self) -> u128 {
        self.amount
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Expiry, unix seconds.
    pub fn expiry(&self) -> u64 {
        self.expiry
    }
}
