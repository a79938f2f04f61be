//! EIP-712 encoding of [`Order`].
//!
//! Field order and type strings are part of the exchange contract. Every
//! field is encoded as a 32-byte left-padded word.

use alloy::{
    primitives::{B256, U256, b256, keccak256},
    sol_types::SolValue,
};
use tracing::debug;

use super::SigningDomain;
use crate::types::Order;

/// Type string of the `Order` struct.
pub const ORDER_TYPE: &str = "Order(address trader,uint64 marketId,bool isBuy,bool isYes,uint64 price,uint128 amount,uint64 nonce,uint64 expiry)";

/// `keccak256(ORDER_TYPE)`
pub const ORDER_TYPEHASH: B256 =
    b256!("0xdaeee6642cdeae5972786496ba96fa31526c0ae8b6e10c2689e6bb72446decf4");

impl Order {
    /// EIP-712 `hashStruct` of the order.
    pub fn struct_hash(&self) -> B256 {
        let encoded = (
            ORDER_TYPEHASH,
            B256::left_padding_from(self.trader().as_slice()),
            U256::from(self.market_id()),
            U256::from(u8::from(self.is_buy())),
            U256::from(u8::from(self.is_yes())),
            U256::from(self.price()),
            U256::from(self.amount()),
            U256::from(self.nonce()),
            U256::from(self.expiry()),
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }

    /// Digest the trader signs: `keccak256(0x1901 ‖ domainSeparator ‖ structHash)`.
    pub fn signing_hash(&self, domain: &SigningDomain) -> B256 {
        let digest = typed_data_hash(domain.separator(), self.struct_hash());
        debug!(%digest, market_id = self.market_id(), nonce = self.nonce(), "order digest");
        digest
    }
}

fn typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut data = [0u8; 66];
    data[..2].copy_from_slice(&[0x19, 0x01]);
    data[2..34].copy_from_slice(domain_separator.as_slice());
    data[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(data)
}
