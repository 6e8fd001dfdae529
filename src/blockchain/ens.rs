// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ENS reverse resolution.
//!
//! A reverse record is only trusted if the name it points to forward-resolves
//! back to the same address.

use alloy::{
    primitives::{address, keccak256, Address, B256},
    providers::Provider,
    sol,
};

use super::client::ChainClientError;

sol! {
    #[sol(rpc)]
    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    #[sol(rpc)]
    interface IEnsResolver {
        function name(bytes32 node) external view returns (string);
        function addr(bytes32 node) external view returns (address);
    }
}

/// ENS registry, deployed at the same address on every chain that has ENS.
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// EIP-137 namehash.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    for label in name.rsplit('.').filter(|l| !l.is_empty()) {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        node = keccak256(buf);
    }
    node
}

/// Node of `<lowercase hex address>.addr.reverse`.
pub fn reverse_node(address: Address) -> B256 {
    namehash(&format!("{}.addr.reverse", alloy::hex::encode(address)))
}

/// Resolve the primary name of `address`, `None` when unset or unverified.
pub async fn lookup_address<P: Provider + Clone>(
    provider: &P,
    address: Address,
) -> Result<Option<String>, ChainClientError> {
    let registry = IEnsRegistry::new(ENS_REGISTRY, provider.clone());

    let reverse = reverse_node(address);
    let resolver = registry
        .resolver(reverse)
        .call()
        .await
        .map_err(|e| ChainClientError::ContractError(e.to_string()))?;
    if resolver.is_zero() {
        return Ok(None);
    }

    let name = IEnsResolver::new(resolver, provider.clone())
        .name(reverse)
        .call()
        .await
        .map_err(|e| ChainClientError::ContractError(e.to_string()))?;
    if name.is_empty() {
        return Ok(None);
    }

    // Forward check
    let forward = namehash(&name);
    let forward_resolver = registry
        .resolver(forward)
        .call()
        .await
        .map_err(|e| ChainClientError::ContractError(e.to_string()))?;
    if forward_resolver.is_zero() {
        return Ok(None);
    }

    let resolved = IEnsResolver::new(forward_resolver, provider.clone())
        .addr(forward)
        .call()
        .await
        .map_err(|e| ChainClientError::ContractError(e.to_string()))?;

    if resolved == address {
        Ok(Some(name))
    } else {
        tracing::debug!(%address, %name, "Reverse record does not resolve back, ignoring");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn namehash_matches_eip137_vectors() {
        assert_eq!(namehash(""), B256::ZERO);
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
    }

    #[test]
    fn reverse_node_uses_lowercase_hex() {
        let addr = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(
            reverse_node(addr),
            namehash("f39fd6e51aad88f6f4ce6ab8827279cfffb92266.addr.reverse")
        );
    }
}
