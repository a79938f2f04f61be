mod order;
mod payload;
mod request;

pub use order::{Order, Outcome, Side};
pub use payload::{SignedCancel, SignedOrder, SignedPayload};
pub use request::{CancelSignRequest, OrderSignRequest, SignRequest};

/// ID of prediction market.
pub type MarketId = u64;
