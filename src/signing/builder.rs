use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::{PrivateKey, RecoveryIdFormat, SigningDomain, personal_message_digest, sign_digest};
use crate::{
    config::Config,
    error::Error,
    num,
    types::{
        CancelSignRequest, Order, OrderSignRequest, SignRequest, SignedCancel, SignedOrder,
        SignedPayload,
    },
};

/// Lifetime of an order when no explicit expiry is requested.
pub const DEFAULT_ORDER_TTL_SECS: u64 = 3600;

/// Wall-clock instant with millisecond resolution.
///
/// Signing functions take it explicitly so callers can pin it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        Self(millis)
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_secs(&self) -> u64 {
        self.0 / 1000
    }
}

/// Everything besides the key a signature depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SigningContext {
    domain: SigningDomain,
    recovery_id: RecoveryIdFormat,
}

impl SigningContext {
    pub fn new(domain: SigningDomain, recovery_id: RecoveryIdFormat) -> Self {
        Self {
            domain,
            recovery_id,
        }
    }

    pub fn domain(&self) -> &SigningDomain {
        &self.domain
    }

    pub fn recovery_id(&self) -> RecoveryIdFormat {
        self.recovery_id
    }
}

impl From<&Config> for SigningContext {
    fn from(config: &Config) -> Self {
        Self::new(SigningDomain::from(config.chain()), config.recovery_id())
    }
}

/// Scales, hashes and signs an order.
///
/// Range checks run before any key material is touched.
pub fn build_signed_order(
    ctx: &SigningContext,
    key: &PrivateKey,
    request: &OrderSignRequest,
    now: Timestamp,
) -> Result<SignedOrder, Error> {
    let price = num::price_to_bps(request.price())?;
    let amount = num::amount_to_raw(request.amount())?;

    let order = Order::new(
        key.address(),
        request.market_id(),
        request.side(),
        request.outcome(),
        price,
        amount,
        request.nonce().unwrap_or(now.as_millis()),
        request
            .expiry()
            .unwrap_or(now.as_secs() + DEFAULT_ORDER_TTL_SECS),
    );
    let digest = order.signing_hash(&ctx.domain);
    let signature = sign_digest(key, &digest, ctx.recovery_id)?;

    debug!(
        trader = %order.trader(),
        market_id = order.market_id(),
        price,
        amount,
        nonce = order.nonce(),
        expiry = order.expiry(),
        "signed order",
    );
    Ok(SignedOrder::new(&order, signature))
}

/// Text of the cancel message the exchange verifies.
pub fn cancel_message(order_id: &str, timestamp: u64) -> String {
    format!("Cancel order {order_id}\nTimestamp: {timestamp}")
}

/// Signs a cancel message with EIP-191.
pub fn build_signed_cancel(
    ctx: &SigningContext,
    key: &PrivateKey,
    request: &CancelSignRequest,
    now: Timestamp,
) -> Result<SignedCancel, Error> {
    let timestamp = request.timestamp().unwrap_or(now.as_millis());
    let message = cancel_message(request.order_id(), timestamp);
    let digest = personal_message_digest(&message);
    let signature = sign_digest(key, &digest, ctx.recovery_id)?;

    debug!(order_id = request.order_id(), timestamp, signer = %key.address(), "signed cancel");
    Ok(SignedCancel {
        order_id: request.order_id().to_string(),
        message,
        timestamp,
        signature,
    })
}

/// Signs any supported request.
pub fn sign(
    ctx: &SigningContext,
    key: &PrivateKey,
    request: &SignRequest,
    now: Timestamp,
) -> Result<SignedPayload, Error> {
    match request {
        SignRequest::Order(order) => {
            build_signed_order(ctx, key, order, now).map(SignedPayload::Order)
        }
        SignRequest::Cancel(cancel) => {
            build_signed_cancel(ctx, key, cancel, now).map(SignedPayload::Cancel)
        }
    }
}

#[cfg(test)]
mod tests {
    use fastnum::{udec64, udec128};

    use super::*;
    use crate::{
        error::ErrorKind,
        num::RangeError,
        testing::{TEST_NOW_MS, test_context, test_key},
        types::{Outcome, Side},
    };

    #[test]
    fn test_timestamp() {
        let now = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(now.as_millis(), 1_700_000_000_123);
        assert_eq!(now.as_secs(), 1_700_000_000);
        assert!(Timestamp::now().as_secs() > 1_700_000_000);
    }

    #[test]
    fn test_order_defaults_follow_signing_time() {
        let request = OrderSignRequest::new(3, Side::Buy, Outcome::No, udec64!(0.42), udec128!(5));
        let signed = build_signed_order(
            &test_context(),
            &test_key(),
            &request,
            Timestamp::from_millis(TEST_NOW_MS),
        )
        .unwrap();

        assert_eq!(signed.nonce, TEST_NOW_MS);
        assert_eq!(signed.expiry, TEST_NOW_MS / 1000 + DEFAULT_ORDER_TTL_SECS);
        assert_eq!(signed.price, 4200);
        assert_eq!(signed.amount, 5_000_000);
        assert!(signed.is_buy);
        assert!(!signed.is_yes);
    }

    #[test]
    fn test_order_explicit_nonce_and_expiry() {
        let request = OrderSignRequest::new(3, Side::Sell, Outcome::Yes, udec64!(0.5), udec128!(1))
            .with_nonce(7)
            .with_expiry(8);
        let signed =
            build_signed_order(&test_context(), &test_key(), &request, Timestamp::now()).unwrap();
        assert_eq!(signed.nonce, 7);
        assert_eq!(signed.expiry, 8);
    }

    #[test]
    fn test_order_range_errors() {
        let now = Timestamp::from_millis(TEST_NOW_MS);
        for price in [udec64!(0), udec64!(1), udec64!(2.5)] {
            let request = OrderSignRequest::new(1, Side::Buy, Outcome::Yes, price, udec128!(10));
            let err = build_signed_order(&test_context(), &test_key(), &request, now).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RangeError);
        }

        let request = OrderSignRequest::new(1, Side::Buy, Outcome::Yes, udec64!(0.5), udec128!(0));
        let err = build_signed_order(&test_context(), &test_key(), &request, now).unwrap_err();
        assert!(matches!(err, Error::Range(RangeError::NonPositive("amount"))));
    }

    #[test]
    fn test_cancel_message() {
        assert_eq!(
            cancel_message("ord-42", 1_700_000_000_000),
            "Cancel order ord-42\nTimestamp: 1700000000000"
        );
    }

    #[test]
    fn test_cancel_timestamp_defaults_to_now() {
        let signed = build_signed_cancel(
            &test_context(),
            &test_key(),
            &CancelSignRequest::new("abc"),
            Timestamp::from_millis(TEST_NOW_MS),
        )
        .unwrap();
        assert_eq!(signed.timestamp, TEST_NOW_MS);
        assert_eq!(signed.order_id, "abc");
        assert_eq!(signed.verify().unwrap(), test_key().address());
    }

    #[test]
    fn test_sign_dispatch() {
        let ctx = test_context();
        let key = test_key();
        let now = Timestamp::from_millis(TEST_NOW_MS);

        let order: SignRequest =
            OrderSignRequest::new(1, Side::Buy, Outcome::Yes, udec64!(0.55), udec128!(10)).into();
        assert!(matches!(
            sign(&ctx, &key, &order, now),
            Ok(SignedPayload::Order(_))
        ));

        let cancel: SignRequest = CancelSignRequest::new("ord-1").into();
        assert!(matches!(
            sign(&ctx, &key, &cancel, now),
            Ok(SignedPayload::Cancel(_))
        ));
    }
}
