// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! BIP32 hierarchical deterministic key derivation over secp256k1.
//!
//! Only private derivation is needed: the service holds the master key
//! and derives one child key per registration.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::rand_core::RngCore;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, Scalar, SecretKey};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Errors raised while deriving keys.
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    #[error("Invalid seed length: {0} bytes (expected 16..=64)")]
    InvalidSeedLength(usize),

    #[error("Invalid seed encoding: {0}")]
    InvalidSeedEncoding(String),

    #[error("Derived master key is invalid")]
    InvalidMasterKey,

    #[error("Child index {0} produced an invalid key")]
    InvalidChild(u32),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("HMAC failure: {0}")]
    Hmac(String),
}

/// Extended private key: a secp256k1 secret plus its chain code.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    secret: SecretKey,
    chain_code: [u8; 32],
}

impl ExtendedPrivateKey {
    /// Compute the master key from a BIP32 seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, DerivationError> {
        if !(16..=64).contains(&seed.len()) {
            return Err(DerivationError::InvalidSeedLength(seed.len()));
        }

        let mut mac = HmacSha512::new_from_slice(MASTER_HMAC_KEY)
            .map_err(|e| DerivationError::Hmac(e.to_string()))?;
        mac.update(seed);
        let output = mac.finalize().into_bytes();
        let (il, ir) = output.split_at(32);

        let secret = SecretKey::from_slice(il).map_err(|_| DerivationError::InvalidMasterKey)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(Self { secret, chain_code })
    }

    /// Compute the master key from a hex-encoded seed.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, DerivationError> {
        let seed = alloy::hex::decode(seed_hex.trim())
            .map_err(|e| DerivationError::InvalidSeedEncoding(e.to_string()))?;
        Self::from_seed(&seed)
    }

    /// CKDpriv: derive the child at `index` (hardened when >= 2^31).
    pub fn derive_child(&self, index: u32) -> Result<Self, DerivationError> {
        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|e| DerivationError::Hmac(e.to_string()))?;

        if index >= HARDENED_OFFSET {
            mac.update(&[0u8]);
            mac.update(&self.secret.to_bytes());
        } else {
            let public = self.secret.public_key().to_encoded_point(true);
            mac.update(public.as_bytes());
        }
        mac.update(&index.to_be_bytes());

        let output = mac.finalize().into_bytes();
        let (il, ir) = output.split_at(32);

        let il: [u8; 32] = il
            .try_into()
            .map_err(|_| DerivationError::InvalidChild(index))?;
        let tweak: Option<Scalar> = Scalar::from_repr(FieldBytes::from(il)).into();
        let tweak = tweak.ok_or(DerivationError::InvalidChild(index))?;

        let parent = self.secret.to_nonzero_scalar();
        let child: Option<NonZeroScalar> = NonZeroScalar::new(tweak + *parent).into();
        let child = child.ok_or(DerivationError::InvalidChild(index))?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(Self {
            secret: SecretKey::from(child),
            chain_code,
        })
    }

    /// Derive along every index of `path`.
    pub fn derive_path(&self, path: &[u32]) -> Result<Self, DerivationError> {
        path.iter()
            .try_fold(self.clone(), |key, index| key.derive_child(*index))
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtendedPrivateKey([REDACTED])")
    }
}

/// Number of indices in a registration path.
pub const CHILD_PATH_DEPTH: usize = 4;

/// Derivation path of a registration key: `m/a/b/c/d`, all normal indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChildPath([u32; CHILD_PATH_DEPTH]);

impl ChildPath {
    pub fn new(indices: [u32; CHILD_PATH_DEPTH]) -> Result<Self, DerivationError> {
        if let Some(index) = indices.iter().find(|index| **index >= HARDENED_OFFSET) {
            return Err(DerivationError::InvalidPath(format!(
                "index {index} is hardened"
            )));
        }
        Ok(Self(indices))
    }

    /// Draw a path of normal indices from `rng`.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut indices = [0u32; CHILD_PATH_DEPTH];
        for index in indices.iter_mut() {
            *index = rng.next_u32() & (HARDENED_OFFSET - 1);
        }
        Self(indices)
    }

    pub fn indices(&self) -> &[u32; CHILD_PATH_DEPTH] {
        &self.0
    }
}

impl fmt::Display for ChildPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for ChildPath {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        if parts.next() != Some("m") {
            return Err(DerivationError::InvalidPath(s.to_string()));
        }

        let mut indices = [0u32; CHILD_PATH_DEPTH];
        let mut count = 0;
        for part in parts {
            if count == CHILD_PATH_DEPTH {
                return Err(DerivationError::InvalidPath(s.to_string()));
            }
            indices[count] = part
                .parse()
                .map_err(|_| DerivationError::InvalidPath(s.to_string()))?;
            count += 1;
        }
        if count != CHILD_PATH_DEPTH {
            return Err(DerivationError::InvalidPath(s.to_string()));
        }

        Self::new(indices)
    }
}

impl TryFrom<String> for ChildPath {
    type Error = DerivationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChildPath> for String {
    fn from(value: ChildPath) -> Self {
        value.to_string()
    }
}
