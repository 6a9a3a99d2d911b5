// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-registration payment key derivation.
//!
//! The [`KeyDeriver`] is built once at startup from the master seed and
//! shared read-only across requests. Each registration draws a random
//! [`ChildPath`] and derives its own key and payment address from it.

use std::fmt;

use alloy::primitives::keccak256;
use k256::elliptic_curve::rand_core::OsRng;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;

use super::hd::{ChildPath, DerivationError, ExtendedPrivateKey};
use super::types::NetworkConfig;
use crate::models::PaymentAddress;

/// A derived payment key. The private key never leaves the process.
pub struct DerivedKey {
    pub private_key: SecretKey,
    pub address: PaymentAddress,
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("private_key", &"[REDACTED]")
            .field("address", &self.address)
            .finish()
    }
}

/// Derives payment addresses from the service master key.
pub struct KeyDeriver {
    master: ExtendedPrivateKey,
    network: NetworkConfig,
}

impl KeyDeriver {
    pub fn new(master: ExtendedPrivateKey, network: NetworkConfig) -> Self {
        Self { master, network }
    }

    /// Build a deriver from a hex-encoded BIP32 seed.
    pub fn from_seed_hex(seed_hex: &str, network: NetworkConfig) -> Result<Self, DerivationError> {
        Ok(Self::new(ExtendedPrivateKey::from_seed_hex(seed_hex)?, network))
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Draw a fresh path from the OS random number generator.
    ///
    /// Four 31-bit normal indices give 124 bits of path space.
    pub fn random_path(&self) -> ChildPath {
        ChildPath::random(&mut OsRng)
    }

    /// Derive the key pair and payment address for `path`.
    pub fn derive(&self, path: &ChildPath) -> Result<DerivedKey, DerivationError> {
        let child = self.master.derive_path(path.indices())?;
        let private_key = child.secret_key().clone();
        let address = address_from_secret(&private_key);
        Ok(DerivedKey {
            private_key,
            address,
        })
    }
}

impl fmt::Debug for KeyDeriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDeriver")
            .field("master", &self.master)
            .field("network", &self.network.id)
            .finish()
    }
}

/// EVM address of a secp256k1 key: last 20 bytes of keccak256(pubkey).
pub fn address_from_secret(secret: &SecretKey) -> PaymentAddress {
    let public_key_uncompressed = secret.public_key().to_encoded_point(false);
    let public_key_bytes = public_key_uncompressed.as_bytes();
    let hash = keccak256(&public_key_bytes[1..]);
    let address_bytes = &hash[12..];
    PaymentAddress(format!("0x{}", alloy::hex::encode(address_bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::hd::HARDENED_OFFSET;
    use crate::blockchain::AVAX_FUJI;
    use std::collections::HashSet;

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn deriver() -> KeyDeriver {
        KeyDeriver::from_seed_hex(SEED, AVAX_FUJI).unwrap()
    }

    #[test]
    fn address_of_known_key() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let secret = SecretKey::from_slice(&bytes).unwrap();
        assert_eq!(
            address_from_secret(&secret).0,
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let deriver = deriver();
        let path = ChildPath::new([1, 2, 3, 4]).unwrap();

        let first = deriver.derive(&path).unwrap();
        let second = deriver.derive(&path).unwrap();
        assert_eq!(first.address, second.address);
        assert_eq!(first.private_key.to_bytes(), second.private_key.to_bytes());

        // A second engine over the same seed agrees.
        let other = KeyDeriver::from_seed_hex(SEED, AVAX_FUJI).unwrap();
        assert_eq!(other.derive(&path).unwrap().address, first.address);
    }

    #[test]
    fn different_paths_give_different_addresses() {
        let deriver = deriver();
        let a = deriver.derive(&ChildPath::new([1, 2, 3, 4]).unwrap()).unwrap();
        let b = deriver.derive(&ChildPath::new([1, 2, 3, 5]).unwrap()).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn addresses_are_evm_formatted() {
        let deriver = deriver();
        let key = deriver.derive(&deriver.random_path()).unwrap();
        let address = key.address.0;
        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn random_paths_are_normal_and_distinct() {
        let deriver = deriver();
        let paths: HashSet<ChildPath> = (0..256).map(|_| deriver.random_path()).collect();
        assert_eq!(paths.len(), 256);
        assert!(paths
            .iter()
            .all(|p| p.indices().iter().all(|i| *i < HARDENED_OFFSET)));
    }

    #[test]
    fn debug_hides_key_material() {
        let deriver = deriver();
        let key = deriver.derive(&ChildPath::new([1, 2, 3, 4]).unwrap()).unwrap();
        let secret_hex = alloy::hex::encode(key.private_key.to_bytes());
        assert!(!format!("{key:?}").contains(&secret_hex));
        assert!(!format!("{deriver:?}").contains("e8f32e72"));
    }
}
