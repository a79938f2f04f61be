use fastnum::{UD64, UD128};

use super::*;

/// Order to be signed, in user-facing units.
#[derive(Clone, derive_more::Debug, PartialEq)]
pub struct OrderSignRequest {
    market_id: MarketId,
    side: Side,
    outcome: Outcome,
    #[debug("{price}")]
    price: UD64,
    #[debug("{amount}")]
    amount: UD128,
    nonce: Option<u64>,
    expiry: Option<u64>,
}

impl OrderSignRequest {
    /// Create a new order request.
    ///
    /// `price` is a probability in `(0, 1)`, `amount` is in USDC. Nonce and
    /// expiry default to the signing time unless set with
    /// [`Self::with_nonce`] and [`Self::with_expiry`].
    pub fn new(
        market_id: MarketId,
        side: Side,
        outcome: Outcome,
        price: UD64,
        amount: UD128,
    ) -> Self {
        Self {
            market_id,
            side,
            outcome,
            price,
            amount,
            nonce: None,
            expiry: None,
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Expiry in unix seconds.
    pub fn with_expiry(mut self, expiry: u64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn market_id(&self) -> MarketId {
        self.market_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn price(&self) -> UD64 {
        self.price
    }

    pub fn amount(&self) -> UD128 {
        self.amount
    }

    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }

    pub fn expiry(&self) -> Option<u64> {
        self.expiry
    }
}

/// Cancellation of a previously placed order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancelSignRequest {
    order_id: String,
    timestamp: Option<u64>,
}

impl CancelSignRequest {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            timestamp: None,
        }
    }

    /// Timestamp in milliseconds, the signing time if not set.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }
}

/// Anything the exchange accepts a signature for.
#[derive(Clone, Debug, PartialEq)]
pub enum SignRequest {
    Order(OrderSignRequest),
    Cancel(CancelSignRequest),
}

impl From<OrderSignRequest> for SignRequest {
    fn from(value: OrderSignRequest) -> Self {
        Self::Order(value)
    }
}

impl From<CancelSignRequest> for SignRequest {
    fn from(value: CancelSignRequest) -> Self {
        Self::Cancel(value)
    }
}
