// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use super::client::ChainClientError;

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// ERC-20 contract wrapper.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    /// Bind the contract at `address` to `provider`.
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IERC20::new(address, provider.clone()),
        }
    }

    /// Get the token name.
    pub async fn name(&self) -> Result<String, ChainClientError> {
        self.contract
            .name()
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(e.to_string()))
    }

    /// Get the token symbol.
    pub async fn symbol(&self) -> Result<String, ChainClientError> {
        self.contract
            .symbol()
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(e.to_string()))
    }

    /// Get the token decimals.
    pub async fn decimals(&self) -> Result<u8, ChainClientError> {
        self.contract
            .decimals()
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(e.to_string()))
    }

    /// Get the raw balance of an address in the token's smallest unit.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainClientError> {
        self.contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(e.to_string()))
    }

    /// Estimate gas for `transfer(to, amount)` sent by `from`.
    pub async fn estimate_transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, ChainClientError> {
        self.contract
            .transfer(to, amount)
            .from(from)
            .estimate_gas()
            .await
            .map_err(|e| ChainClientError::ContractError(format!("Gas estimation failed: {}", e)))
    }
}
