use alloy::primitives::{Address, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::*;
use crate::signing::{RecoverableSignature, SigningDomain, SigningError, personal_message_digest};

/// Signed order in the shape the exchange accepts.
///
/// `amount` is rendered as a base-10 string so JSON consumers never lose
/// precision on 128-bit values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    #[serde(serialize_with = "checksummed")]
    pub trader: Address,
    pub market_id: MarketId,
    pub is_buy: bool,
    pub is_yes: bool,
    pub price: u64,
    #[serde(with = "u128_string")]
    pub amount: u128,
    pub nonce: u64,
    pub expiry: u64,
    pub signature: RecoverableSignature,
}

impl SignedOrder {
    pub(crate) fn new(order: &Order, signature: RecoverableSignature) -> Self {
        Self {
            trader: order.trader(),
            market_id: order.market_id(),
            is_buy: order.is_buy(),
            is_yes: order.is_yes(),
            price: order.price(),
            amount: order.amount(),
            nonce: order.nonce(),
            expiry: order.expiry(),
            signature,
        }
    }

    /// Order fields without the signature.
    pub fn order(&self) -> Order {
        Order::new(
            self.trader,
            self.market_id,
            self.is_buy.into(),
            self.is_yes.into(),
            self.price,
            self.amount,
            self.nonce,
            self.expiry,
        )
    }

    /// Digest the signature was produced over.
    pub fn digest(&self, domain: &SigningDomain) -> B256 {
        self.order().signing_hash(domain)
    }

    /// Recovers the signer and checks it is the trader.
    pub fn verify(&self, domain: &SigningDomain) -> Result<Address, SigningError> {
        let signer = self.signature.recover_address(&self.digest(domain))?;
        if signer != self.trader {
            return Err(SigningError::Recovery(format!(
                "signature recovers to {signer}, trader is {}",
                self.trader
            )));
        }
        Ok(signer)
    }
}

/// Signed cancel message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedCancel {
    pub order_id: String,
    pub message: String,
    pub timestamp: u64,
    pub signature: RecoverableSignature,
}

impl SignedCancel {
    /// EIP-191 digest of the message.
    pub fn digest(&self) -> B256 {
        personal_message_digest(&self.message)
    }

    /// Recovers the address that signed the cancel message.
    pub fn verify(&self) -> Result<Address, SigningError> {
        self.signature.recover_address(&self.digest())
    }
}

/// Output of [`crate::signing::sign`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignedPayload {
    Order(SignedOrder),
    Cancel(SignedCancel),
}

fn checksummed<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

mod u128_string {
    use serde::de::Error;

    use super::*;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
