// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network configuration and constants.

/// Avalanche network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Short identifier used in configuration (`fuji`, `mainnet`)
    pub id: &'static str,
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// Block explorer URL
    pub explorer_url: &'static str,
    /// Default fee rate per kilobyte, in nAVAX
    pub fee_per_kilobyte: u64,
}

impl NetworkConfig {
    /// Explorer link for an address on this network.
    pub fn explorer_address_url(&self, address: &str) -> String {
        format!("{}/address/{address}", self.explorer_url)
    }
}

/// Avalanche C-Chain Mainnet configuration.
pub const AVAX_MAINNET: NetworkConfig = NetworkConfig {
    id: NETWORK_MAINNET,
    name: "Avalanche C-Chain",
    chain_id: 43114,
    explorer_url: "https://snowtrace.io",
    fee_per_kilobyte: 550_000,
};

/// Avalanche Fuji Testnet configuration.
pub const AVAX_FUJI: NetworkConfig = NetworkConfig {
    id: NETWORK_FUJI,
    name: "Avalanche Fuji Testnet",
    chain_id: 43113,
    explorer_url: "https://testnet.snowtrace.io",
    fee_per_kilobyte: 550_000,
};

pub const NETWORK_FUJI: &str = "fuji";
pub const NETWORK_MAINNET: &str = "mainnet";

/// Resolve a configured network name. Missing input selects Fuji.
pub fn network_by_name(raw: Option<&str>) -> Result<NetworkConfig, String> {
    let value = raw.unwrap_or(NETWORK_FUJI).trim().to_ascii_lowercase();
    match value.as_str() {
        NETWORK_FUJI => Ok(AVAX_FUJI),
        NETWORK_MAINNET => Ok(AVAX_MAINNET),
        other => Err(format!(
            "Unsupported network `{other}` (expected `{NETWORK_FUJI}` or `{NETWORK_MAINNET}`)"
        )),
    }
}
