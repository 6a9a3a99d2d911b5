// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Persisted registration records and the request/response structures of
//! the REST API. API types derive `ToSchema` for OpenAPI documentation.
//!
//! ## Payment Address Type
//!
//! The [`PaymentAddress`] newtype wraps EVM-style addresses (0x-prefixed,
//! 40 hex characters) derived for each registration.
//!
//! ## Privacy
//!
//! [`RegistrationRecord`] carries the child-key path used to re-derive the
//! payment key. It is only ever written to the store; everything returned
//! to callers or placed in the recent-activity feed goes through
//! [`RecentRegistration`] or the response types, which omit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::ChildPath;
use crate::docproof::Digest;

// =============================================================================
// Payment Address Type
// =============================================================================

/// Payment address derived for a single registration.
///
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaymentAddress(pub String);

impl PaymentAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PaymentAddress {
    fn from(value: String) -> Self {
        PaymentAddress(value)
    }
}

impl From<&str> for PaymentAddress {
    fn from(value: &str) -> Self {
        PaymentAddress(value.to_string())
    }
}

impl From<PaymentAddress> for String {
    fn from(value: PaymentAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Registration Records
// =============================================================================

/// A document registration as persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// The registered document digest.
    pub digest: Digest,
    /// Derivation path of the payment key. Never leaves the store.
    pub path: ChildPath,
    /// Address the registration fee must be paid to.
    pub payment_address: PaymentAddress,
    /// True until the confirmed-payment webhook fires.
    pub pending: bool,
    /// When the registration was created.
    pub timestamp: DateTime<Utc>,
    /// Fee rate used for the estimate, in smallest currency units.
    pub fee_per_kilobyte: u64,
    /// Fee for the timestamping transaction, in smallest currency units.
    pub fee: u64,
}

/// A registration as shown in the recent-activity feed (no key path).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecentRegistration {
    pub digest: Digest,
    pub payment_address: PaymentAddress,
    pub pending: bool,
    pub timestamp: DateTime<Utc>,
    pub fee_per_kilobyte: u64,
    pub fee: u64,
}

impl From<&RegistrationRecord> for RecentRegistration {
    fn from(record: &RegistrationRecord) -> Self {
        Self {
            digest: record.digest.clone(),
            payment_address: record.payment_address.clone(),
            pending: record.pending,
            timestamp: record.timestamp,
            fee_per_kilobyte: record.fee_per_kilobyte,
            fee: record.fee,
        }
    }
}

// =============================================================================
// API Responses
// =============================================================================

/// Payment instructions for a newly registered document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PaymentDetails {
    /// Always `"true"`.
    pub success: String,
    pub digest: Digest,
    /// Address to pay to timestamp the document.
    pub pay_address: PaymentAddress,
    /// Price to pay, in smallest currency units.
    pub price: u64,
}

impl PaymentDetails {
    pub fn new(digest: Digest, pay_address: PaymentAddress, price: u64) -> Self {
        Self {
            success: "true".to_string(),
            digest,
            pay_address,
            price,
        }
    }
}

/// Reply when the digest was already registered.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ExistingRegistration {
    /// Always `false`.
    pub success: bool,
    /// Always `"existing"`.
    pub reason: String,
    pub digest: Digest,
}

impl ExistingRegistration {
    pub fn new(digest: Digest) -> Self {
        Self {
            success: false,
            reason: "existing".to_string(),
            digest,
        }
    }
}

/// Body of a registration reply.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum RegisterResponse {
    Registered(PaymentDetails),
    Existing(ExistingRegistration),
}

/// Current state of a registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RegistrationStatusResponse {
    pub digest: Digest,
    pub pay_address: PaymentAddress,
    pub pending: bool,
    pub timestamp: DateTime<Utc>,
    pub fee: u64,
    /// Block explorer page for the payment address.
    pub explorer_url: String,
}
