//! Vault and exchange contract calls.
//!
//! Calls are prepared as unsigned [`TransactionRequest`]s, nonce and fees
//! are left to the caller's wallet/provider. Reads are prepared as call
//! requests with the matching return decoder.

use alloy::{
    primitives::{Address, Bytes, U256},
    rpc::types::{TransactionInput, TransactionRequest},
    sol_types::SolCall,
};
use fastnum::UD128;
use tracing::debug;

use crate::{
    Chain,
    abi::{erc20::ERC20, exchange::Exchange, vault::Vault},
    config::{Config, ConfigError},
    num::{self, RangeError},
    types::MarketId,
};

/// Gas limit of ERC-20 approvals.
pub const APPROVE_GAS_LIMIT: u64 = 100_000;

/// Gas limit of every other call.
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to decode {call} return data: {source}")]
    Decode {
        call: &'static str,
        source: alloy::sol_types::Error,
    },

    #[error("requested {requested} raw USDC, only {available} available")]
    InsufficientFunds { requested: u128, available: u128 },

    #[error("no USDC available to transfer (vault and wallet both empty)")]
    NothingToTransfer,
}

/// State changing call of the vault, the exchange or the USDC token.
///
/// Amounts are raw USDC units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultCall {
    Approve { spender: Address, amount: U256 },
    Deposit { amount: u128 },
    Withdraw { amount: u128 },
    /// Mint YES+NO share pairs against vault balance.
    Mint { market_id: MarketId, amount: u128 },
    /// Merge YES+NO share pairs back into vault balance.
    Merge { market_id: MarketId, amount: u128 },
    /// Claim winnings of a resolved market.
    Claim { market_id: MarketId },
    Transfer { to: Address, amount: u128 },
}

impl VaultCall {
    /// Unlimited USDC allowance for the vault.
    pub fn approve_max(chain: &Chain) -> Result<Self, ConfigError> {
        Ok(Self::Approve {
            spender: vault_address(chain)?,
            amount: U256::MAX,
        })
    }

    pub fn deposit(amount: UD128) -> Result<Self, RangeError> {
        Ok(Self::Deposit {
            amount: num::amount_to_raw(amount)?,
        })
    }

    pub fn withdraw(amount: UD128) -> Result<Self, RangeError> {
        Ok(Self::Withdraw {
            amount: num::amount_to_raw(amount)?,
        })
    }

    pub fn mint(market_id: MarketId, amount: UD128) -> Result<Self, RangeError> {
        Ok(Self::Mint {
            market_id,
            amount: num::amount_to_raw(amount)?,
        })
    }

    pub fn merge(market_id: MarketId, amount: UD128) -> Result<Self, RangeError> {
        Ok(Self::Merge {
            market_id,
            amount: num::amount_to_raw(amount)?,
        })
    }

    pub fn claim(market_id: MarketId) -> Self {
        Self::Claim { market_id }
    }

    pub fn transfer(to: Address, amount: UD128) -> Result<Self, RangeError> {
        Ok(Self::Transfer {
            to,
            amount: num::amount_to_raw(amount)?,
        })
    }

    /// Contract the call is sent to.
    pub fn target(&self, chain: &Chain) -> Result<Address, ConfigError> {
        match self {
            Self::Approve { .. } | Self::Transfer { .. } => usdc_address(chain),
            Self::Deposit { .. } | Self::Withdraw { .. } => vault_address(chain),
            Self::Mint { .. } | Self::Merge { .. } | Self::Claim { .. } => Ok(chain.exchange()),
        }
    }

    /// ABI encoded call.
    pub fn calldata(&self) -> Bytes {
        let encoded = match *self {
            Self::Approve { spender, amount } => ERC20::approveCall { spender, amount }.abi_encode(),
            Self::Deposit { amount } => Vault::depositCall {
                amount: U256::from(amount),
            }
            .abi_encode(),
            Self::Withdraw { amount } => Vault::withdrawCall {
                amount: U256::from(amount),
            }
            .abi_encode(),
            Self::Mint { market_id, amount } => Exchange::mintSharesCall {
                marketId: market_id,
                amount,
            }
            .abi_encode(),
            Self::Merge { market_id, amount } => Exchange::mergeSharesCall {
                marketId: market_id,
                amount,
            }
            .abi_encode(),
            Self::Claim { market_id } => Exchange::claimWinningsCall {
                marketId: market_id,
            }
            .abi_encode(),
            Self::Transfer { to, amount } => ERC20::transferCall {
                to,
                amount: U256::from(amount),
            }
            .abi_encode(),
        };
        encoded.into()
    }

    pub fn gas_limit(&self) -> u64 {
        match self {
            Self::Approve { .. } => APPROVE_GAS_LIMIT,
            _ => DEFAULT_GAS_LIMIT,
        }
    }

    /// Unsigned transaction sending the call from `from`.
    pub fn to_transaction(
        &self,
        chain: &Chain,
        from: Address,
    ) -> Result<TransactionRequest, ConfigError> {
        let target = self.target(chain)?;
        let mut tx = TransactionRequest::default()
            .from(from)
            .to(target)
            .input(TransactionInput::new(self.calldata()))
            .gas_limit(self.gas_limit());
        tx.chain_id = Some(chain.chain_id());

        debug!(call = ?self, %from, %target, "prepared transaction");
        Ok(tx)
    }
}

/// Calls needed to deposit `amount` USDC given the current vault allowance.
///
/// An unlimited approval is prepended when the allowance is short.
pub fn deposit_plan(
    chain: &Chain,
    amount: UD128,
    allowance: U256,
) -> Result<Vec<VaultCall>, VaultError> {
    let amount = num::amount_to_raw(amount)?;

    let mut calls = Vec::with_capacity(2);
    if allowance < U256::from(amount) {
        calls.push(VaultCall::approve_max(chain)?);
    }
    calls.push(VaultCall::Deposit { amount });
    Ok(calls)
}

/// Read-only contract call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultQuery {
    /// USDC deposited in the vault.
    VaultBalance { user: Address },
    /// USDC held by the wallet itself.
    WalletBalance { user: Address },
    /// USDC the vault may pull from `owner`.
    Allowance { owner: Address },
    YesShares { market_id: MarketId, user: Address },
    NoShares { market_id: MarketId, user: Address },
}

impl VaultQuery {
    pub fn target(&self, chain: &Chain) -> Result<Address, ConfigError> {
        match self {
            Self::VaultBalance { .. } => vault_address(chain),
            Self::WalletBalance { .. } | Self::Allowance { .. } => usdc_address(chain),
            Self::YesShares { .. } | Self::NoShares { .. } => Ok(chain.exchange()),
        }
    }

    pub fn calldata(&self, chain: &Chain) -> Result<Bytes, ConfigError> {
        let encoded = match *self {
            Self::VaultBalance { user } => Vault::balanceOfCall { user }.abi_encode(),
            Self::WalletBalance { user } => ERC20::balanceOfCall { account: user }.abi_encode(),
            Self::Allowance { owner } => ERC20::allowanceCall {
                owner,
                spender: vault_address(chain)?,
            }
            .abi_encode(),
            Self::YesShares { market_id, user } => Exchange::yesSharesCall {
                marketId: market_id,
                user,
            }
            .abi_encode(),
            Self::NoShares { market_id, user } => Exchange::noSharesCall {
                marketId: market_id,
                user,
            }
            .abi_encode(),
        };
        Ok(encoded.into())
    }

    /// Request for `eth_call`.
    pub fn to_call(&self, chain: &Chain) -> Result<TransactionRequest, ConfigError> {
        Ok(TransactionRequest::default()
            .to(self.target(chain)?)
            .input(TransactionInput::new(self.calldata(chain)?)))
    }

    /// Decodes the call result into raw USDC (or share) units.
    pub fn decode(&self, data: &[u8]) -> Result<U256, VaultError> {
        let decoded = match self {
            Self::VaultBalance { .. } => Vault::balanceOfCall::abi_decode_returns(data),
            Self::WalletBalance { .. } => ERC20::balanceOfCall::abi_decode_returns(data),
            Self::Allowance { .. } => ERC20::allowanceCall::abi_decode_returns(data),
            Self::YesShares { .. } => {
                Exchange::yesSharesCall::abi_decode_returns(data).map(U256::from)
            }
            Self::NoShares { .. } => {
                Exchange::noSharesCall::abi_decode_returns(data).map(U256::from)
            }
        };
        decoded.map_err(|source| VaultError::Decode {
            call: self.name(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Self::VaultBalance { .. } => "balanceOf",
            Self::WalletBalance { .. } => "balanceOf",
            Self::Allowance { .. } => "allowance",
            Self::YesShares { .. } => "yesShares",
            Self::NoShares { .. } => "noShares",
        }
    }
}

/// Destination of a cash-out.
///
/// Funds may only leave to the pre-configured `WITHDRAW_TO` address; a
/// requested destination is accepted only if it is that same address.
pub fn cashout_destination(
    config: &Config,
    requested: Option<Address>,
) -> Result<Address, ConfigError> {
    let configured = config.withdraw_to().ok_or(ConfigError::MissingWithdrawTo)?;
    match requested {
        Some(requested) if requested != configured => Err(ConfigError::WithdrawToMismatch {
            requested,
            configured,
        }),
        _ => Ok(configured),
    }
}

/// Funds movement of a cash-out, in raw USDC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CashoutPlan {
    /// Taken out of the vault first, zero if the wallet holds enough.
    pub withdraw_from_vault: u128,
    /// Sent to the destination.
    pub transfer: u128,
}

impl CashoutPlan {
    /// Plans moving `amount` USDC (everything available if `None`) out of
    /// the agent's vault and wallet balances.
    pub fn new(
        vault_balance: U256,
        wallet_balance: U256,
        amount: Option<UD128>,
    ) -> Result<Self, VaultError> {
        let vault_balance = vault_balance.saturating_to::<u128>();
        let wallet_balance = wallet_balance.saturating_to::<u128>();
        let available = vault_balance.saturating_add(wallet_balance);

        let transfer = match amount {
            Some(amount) => {
                let requested = num::amount_to_raw(amount)?;
                if requested > available {
                    return Err(VaultError::InsufficientFunds {
                        requested,
                        available,
                    });
                }
                requested
            }
            None => available,
        };
        if transfer == 0 {
            return Err(VaultError::NothingToTransfer);
        }

        Ok(Self {
            withdraw_from_vault: transfer.saturating_sub(wallet_balance),
            transfer,
        })
    }

    /// Calls executing the plan, in order.
    pub fn calls(&self, destination: Address) -> Vec<VaultCall> {
        let mut calls = Vec::with_capacity(2);
        if self.withdraw_from_vault > 0 {
            calls.push(VaultCall::Withdraw {
                amount: self.withdraw_from_vault,
            });
        }
        calls.push(VaultCall::Transfer {
            to: destination,
            amount: self.transfer,
        });
        calls
    }
}

fn vault_address(chain: &Chain) -> Result<Address, ConfigError> {
    chain
        .vault()
        .ok_or(ConfigError::MissingContract("VAULT_ADDRESS"))
}

fn usdc_address(chain: &Chain) -> Result<Address, ConfigError> {
    chain
        .collateral_token()
        .ok_or(ConfigError::MissingContract("USDC_ADDRESS"))
}
