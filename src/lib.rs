//! Blackjack exchange SDK.
//!
//! # Overview
//!
//! Signing toolkit for trading agents on the Blackjack prediction-market
//! exchange.
//!
//! Use [`config::ConfigSources`] to resolve the [`config::Config`] of the
//! target network and the [`signing::PrivateKey`] of the agent, then
//! [`signing::sign`] to produce the payloads the exchange accepts:
//! EIP-712 signed orders and EIP-191 signed cancels. Decimal prices and
//! amounts are converted to protocol integers by [`num`] with exact decimal
//! arithmetic.
//!
//! [`vault`] prepares unsigned transactions for the vault and exchange
//! contracts, [`analysis`] derives edge signals and portfolio valuation from
//! exchange API responses.
//!
//! See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * No transport: REST/WebSocket clients and transaction submission are left
//!   to the caller, the SDK only consumes and produces their payloads.
//!
//! * Exchange configuration published at `/api/config` must be fetched by the
//!   caller and passed to [`config::ConfigSources::with_remote`].
//!
//! # Testing
//!
//! [`testing`] module provides well-known keys and fixtures for
//! deterministic signing tests.

pub mod abi;
pub mod analysis;
pub mod config;
pub mod error;
pub mod num;
pub mod signing;
pub mod testing;
pub mod types;
pub mod vault;

use alloy::primitives::{Address, address};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Chain the exchange is operating on.
pub struct Chain {
    chain_id: u64,
    exchange: Address,
    vault: Option<Address>,
    collateral_token: Option<Address>,
}

impl Chain {
    pub fn testnet() -> Self {
        Self {
            chain_id: 10143,
            exchange: address!("0xC628e81B506b572391669339c2AbaCFafa0d95dD"),
            vault: Some(address!("0xd1a710199b84899856696Ce0AA30377fB7B485C3")),
            collateral_token: Some(address!("0xDE6498947808BCcD50F18785Cc3B0C472380C1fB")),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            chain_id: 143,
            ..Self::testnet()
        }
    }

    pub fn custom(
        chain_id: u64,
        exchange: Address,
        vault: Option<Address>,
        collateral_token: Option<Address>,
    ) -> Self {
        Self {
            chain_id,
            exchange,
            vault,
            collateral_token,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Exchange contract, the verifying contract of order signatures.
    pub fn exchange(&self) -> Address {
        self.exchange
    }

    pub fn vault(&self) -> Option<Address> {
        self.vault
    }

    /// USDC token.
    pub fn collateral_token(&self) -> Option<Address> {
        self.collateral_token
    }
}
