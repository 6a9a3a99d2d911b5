// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Registration Storage
//!
//! The registration workflow talks to storage only through the
//! [`RegistrationStore`] trait. Two implementations are provided:
//!
//! - [`InMemoryStore`]: process-local maps, for development and tests
//! - [`RegistrationDatabase`]: embedded redb database (pure Rust, ACID)
//!
//! ## Uniqueness
//!
//! The orchestrator's lookup-then-write sequence is not atomic across
//! concurrent requests. Stores therefore enforce both invariants
//! themselves:
//!
//! - `put_digest_address` is a check-and-set on the digest key. The loser
//!   of a race gets [`BindOutcome::AlreadyBound`] with the winning address.
//! - `put_registration` refuses to replace a record for another digest at
//!   the same address ([`StoreError::AddressConflict`]).
//!
//! ## Recent Activity
//!
//! A bounded feed of the newest registrations (without key paths), newest
//! first.

pub mod digest_cache;
pub mod memory;
pub mod registration_db;

use async_trait::async_trait;

use crate::docproof::Digest;
use crate::models::{PaymentAddress, RecentRegistration, RegistrationRecord};

pub use digest_cache::DigestCache;
pub use memory::InMemoryStore;
pub use registration_db::RegistrationDatabase;

/// Default number of entries kept in the recent-activity feed.
pub const DEFAULT_RECENT_CAPACITY: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("address {0} already holds a registration for another digest")]
    AddressConflict(PaymentAddress),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of binding a digest to an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The digest was unbound and now maps to the given address.
    Bound,
    /// The digest was already bound; carries the existing address.
    AlreadyBound(PaymentAddress),
}

/// Durable digest ↔ address bindings and registration records.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Address bound to `digest`, if any.
    async fn get_address_for_digest(&self, digest: &Digest) -> StoreResult<Option<PaymentAddress>>;

    /// Bind `digest` to `address` unless it is already bound.
    async fn put_digest_address(
        &self,
        digest: &Digest,
        address: &PaymentAddress,
    ) -> StoreResult<BindOutcome>;

    /// Store `record` under its payment address.
    async fn put_registration(&self, record: &RegistrationRecord) -> StoreResult<()>;

    /// Registration stored under `address`, if any.
    async fn get_registration(
        &self,
        address: &PaymentAddress,
    ) -> StoreResult<Option<RegistrationRecord>>;

    /// Push a registration onto the recent-activity feed.
    async fn append_recent(&self, entry: &RecentRegistration) -> StoreResult<()>;

    /// Up to `limit` recent registrations, newest first.
    async fn recent(&self, limit: usize) -> StoreResult<Vec<RecentRegistration>>;
}
