// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key derivation and network configuration for the Avalanche C-Chain.
//!
//! This module provides functionality for:
//! - BIP32 derivation from the service master seed
//! - Mapping derived keys to payment addresses
//! - Network selection and default fee rates

pub mod hd;
pub mod keys;
pub mod types;

pub use hd::{ChildPath, DerivationError, ExtendedPrivateKey};
pub use keys::{address_from_secret, DerivedKey, KeyDeriver};
pub use types::*;
