// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document digest validation.
//!
//! A digest is the hex-encoded SHA-256 of the document being registered.
//! Callers may send either case; the canonical form is lowercase so that
//! one document can never be bound to two payment addresses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Returns true if `input` is a well-formed hex SHA-256 digest.
pub fn is_valid_digest(input: &str) -> bool {
    input.len() == DIGEST_HEX_LEN && input.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A validated, lowercase document digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Validate and canonicalise a caller-supplied digest.
    pub fn parse(input: &str) -> Option<Self> {
        if is_valid_digest(input) {
            Some(Self(input.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Digest {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Digest::parse(&value).ok_or_else(|| format!("invalid digest: {value}"))
    }
}

impl From<Digest> for String {
    fn from(value: Digest) -> Self {
        value.0
    }
}
