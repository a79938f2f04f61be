//! EIP-712 domain of the Blackjack exchange contract.

use alloy::{
    primitives::{Address, B256, U256, b256, keccak256},
    sol_types::SolValue,
};

use crate::Chain;

/// Domain name fixed by the exchange contract.
pub const DOMAIN_NAME: &str = "BlackjackExchange";

/// Domain version fixed by the exchange contract.
pub const DOMAIN_VERSION: &str = "1";

/// `keccak256("EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")`
pub const DOMAIN_TYPEHASH: B256 =
    b256!("0x8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f");

/// Domain the order signatures are bound to.
///
/// Chain ID and verifying contract must match the deployed exchange exactly,
/// otherwise signatures stay well-formed but recover to a different signer
/// on-chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SigningDomain {
    chain_id: u64,
    verifying_contract: Address,
}

impl SigningDomain {
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            chain_id,
            verifying_contract,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn verifying_contract(&self) -> Address {
        self.verifying_contract
    }

    /// EIP-712 domain separator.
    pub fn separator(&self) -> B256 {
        let encoded = (
            DOMAIN_TYPEHASH,
            keccak256(DOMAIN_NAME.as_bytes()),
            keccak256(DOMAIN_VERSION.as_bytes()),
            U256::from(self.chain_id),
            B256::left_padding_from(self.verifying_contract.as_slice()),
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

impl From<&Chain> for SigningDomain {
    fn from(chain: &Chain) -> Self {
        Self::new(chain.chain_id(), chain.exchange())
    }
}
