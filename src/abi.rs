//! Contract interfaces of the vault, the exchange and the USDC token.

#[allow(clippy::too_many_arguments)]
pub mod vault {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface Vault {
            function deposit(uint256 amount) external;
            function withdraw(uint256 amount) external;
            function balanceOf(address user) external view returns (uint256);
        }
    );
}

#[allow(clippy::too_many_arguments)]
pub mod exchange {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface Exchange {
            function mintShares(uint64 marketId, uint128 amount) external;
            function mergeShares(uint64 marketId, uint128 amount) external;
            function claimWinnings(uint64 marketId) external;
            function yesShares(uint64 marketId, address user) external view returns (uint128);
            function noShares(uint64 marketId, address user) external view returns (uint128);
        }
    );
}

#[allow(clippy::too_many_arguments)]
pub mod erc20 {
    alloy::sol!(
        /// USDC, the collateral token.
        #[derive(Debug, PartialEq, Eq)]
        interface ERC20 {
            function approve(address spender, uint256 amount) external returns (bool);
            function allowance(address owner, address spender) external view returns (uint256);
            function balanceOf(address account) external view returns (uint256);
            function transfer(address to, uint256 amount) external returns (bool);
        }
    );
}
