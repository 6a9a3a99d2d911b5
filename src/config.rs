// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`AppConfig`] loaded from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MASTER_SEED` | Hex-encoded BIP32 seed (16 to 64 bytes) | Required |
//! | `NETWORK` | `fuji` or `mainnet` | `fuji` |
//! | `HOST_URL` | Public base URL used in callback URLs | Required |
//! | `CALLBACK_TOKEN` | Routing token embedded in callback URLs | Required |
//! | `DOCUMENT_PRICE` | Price per document, smallest units | `1000000` |
//! | `FEE_MULTIPLIER` | Multiplier applied to the fee rate | `1` |
//! | `FEE_PER_KILOBYTE` | Fee rate override, smallest units | Network default |
//! | `REQUIRED_CONFIRMATIONS` | Confirmations before the confirmed hook | `1` |
//! | `STORE_BACKEND` | `redb` or `memory` | `redb` |
//! | `DATA_DIR` | Directory holding the redb database | `/data` |
//! | `NOTIFIER_URL` | Notification provider hooks endpoint | Unset: log only |
//! | `NOTIFIER_TOKEN` | Notification provider API token | Optional |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::blockchain::{network_by_name, NetworkConfig};

/// Hex-encoded BIP32 seed for the service master key.
///
/// Every payment address is derived from this seed. Losing it loses access
/// to all collected payments.
pub const MASTER_SEED_ENV: &str = "MASTER_SEED";

pub const NETWORK_ENV: &str = "NETWORK";

/// Public base URL of this service, used to build callback URLs.
pub const HOST_URL_ENV: &str = "HOST_URL";

/// Shared routing token placed in callback URLs.
pub const CALLBACK_TOKEN_ENV: &str = "CALLBACK_TOKEN";

pub const DOCUMENT_PRICE_ENV: &str = "DOCUMENT_PRICE";
pub const FEE_MULTIPLIER_ENV: &str = "FEE_MULTIPLIER";
pub const FEE_PER_KILOBYTE_ENV: &str = "FEE_PER_KILOBYTE";
pub const REQUIRED_CONFIRMATIONS_ENV: &str = "REQUIRED_CONFIRMATIONS";
pub const STORE_BACKEND_ENV: &str = "STORE_BACKEND";

/// Directory holding the registration database.
///
/// # Default
/// `/data`
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const NOTIFIER_URL_ENV: &str = "NOTIFIER_URL";
pub const NOTIFIER_TOKEN_ENV: &str = "NOTIFIER_TOKEN";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Logging format selector, read directly by the binary.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DOCUMENT_PRICE: u64 = 1_000_000;
pub const DEFAULT_FEE_MULTIPLIER: u64 = 1;
pub const DEFAULT_REQUIRED_CONFIRMATIONS: u32 = 1;
pub const DEFAULT_DATA_DIR: &str = "/data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Where registrations are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Embedded redb database under `DATA_DIR`.
    Redb,
    /// Process memory. Data is lost on restart.
    Memory,
}

/// Validated service configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub master_seed_hex: String,
    pub network: NetworkConfig,
    pub host_url: Url,
    pub callback_token: String,
    pub document_price: u64,
    pub fee_multiplier: u64,
    pub fee_per_kilobyte: u64,
    pub required_confirmations: u32,
    pub store_backend: StoreBackend,
    pub data_dir: PathBuf,
    pub notifier_url: Option<Url>,
    pub notifier_token: Option<String>,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("master_seed_hex", &"[REDACTED]")
            .field("network", &self.network.id)
            .field("host_url", &self.host_url.as_str())
            .field("callback_token", &"[REDACTED]")
            .field("document_price", &self.document_price)
            .field("fee_multiplier", &self.fee_multiplier)
            .field("fee_per_kilobyte", &self.fee_per_kilobyte)
            .field("required_confirmations", &self.required_confirmations)
            .field("store_backend", &self.store_backend)
            .field("data_dir", &self.data_dir)
            .field("notifier_url", &self.notifier_url.as_ref().map(Url::as_str))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let master_seed_hex = required(MASTER_SEED_ENV)?;
        let network = network_by_name(get(NETWORK_ENV).as_deref())
            .map_err(|reason| ConfigError::invalid(NETWORK_ENV, reason))?;

        let host_url = parse_url(HOST_URL_ENV, &required(HOST_URL_ENV)?)?;
        let callback_token = required(CALLBACK_TOKEN_ENV)?;

        let document_price =
            parse_or(DOCUMENT_PRICE_ENV, get(DOCUMENT_PRICE_ENV), DEFAULT_DOCUMENT_PRICE)?;
        if document_price == 0 {
            return Err(ConfigError::invalid(DOCUMENT_PRICE_ENV, "must be greater than zero"));
        }

        let fee_multiplier =
            parse_or(FEE_MULTIPLIER_ENV, get(FEE_MULTIPLIER_ENV), DEFAULT_FEE_MULTIPLIER)?;
        let fee_per_kilobyte = parse_or(
            FEE_PER_KILOBYTE_ENV,
            get(FEE_PER_KILOBYTE_ENV),
            network.fee_per_kilobyte,
        )?;
        let required_confirmations = parse_or(
            REQUIRED_CONFIRMATIONS_ENV,
            get(REQUIRED_CONFIRMATIONS_ENV),
            DEFAULT_REQUIRED_CONFIRMATIONS,
        )?;

        let store_backend = match get(STORE_BACKEND_ENV)
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("redb") => StoreBackend::Redb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::invalid(
                    STORE_BACKEND_ENV,
                    format!("unknown backend `{other}` (expected `redb` or `memory`)"),
                ))
            }
        };

        let data_dir = PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.into()));

        let notifier_url = get(NOTIFIER_URL_ENV)
            .map(|raw| parse_url(NOTIFIER_URL_ENV, &raw))
            .transpose()?;
        let notifier_token = get(NOTIFIER_TOKEN_ENV);

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.into());
        let port = parse_or(PORT_ENV, get(PORT_ENV), DEFAULT_PORT)?;

        Ok(Self {
            master_seed_hex,
            network,
            host_url,
            callback_token,
            document_price,
            fee_multiplier,
            fee_per_kilobyte,
            required_confirmations,
            store_backend,
            data_dir,
            notifier_url,
            notifier_token,
            host,
            port,
        })
    }

    /// `HOST:PORT` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid(name, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::invalid(
            name,
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, format!("`{value}`: {e}"))),
        None => Ok(default),
    }
}
