// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded registration database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `digest_address`: digest → payment address
//! - `registrations`: payment address → serialized RegistrationRecord
//! - `recent`: sequence number → serialized RecentRegistration
//!
//! redb admits one write transaction at a time, so a read followed by an
//! insert inside the same write transaction is a check-and-set.

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{
    BindOutcome, DigestCache, RegistrationStore, StoreError, StoreResult, DEFAULT_RECENT_CAPACITY,
};
use crate::docproof::Digest;
use crate::models::{PaymentAddress, RecentRegistration, RegistrationRecord};

// =============================================================================
// Table Definitions
// =============================================================================

/// Binding table: lowercase digest → payment address.
const DIGEST_ADDRESS: TableDefinition<&str, &str> = TableDefinition::new("digest_address");

/// Primary table: payment address → serialized RegistrationRecord (JSON bytes).
const REGISTRATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("registrations");

/// Recent-activity feed: monotonically increasing sequence → JSON bytes.
const RECENT: TableDefinition<u64, &[u8]> = TableDefinition::new("recent");

// =============================================================================
// RegistrationDatabase
// =============================================================================

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "registrations.redb";

/// Durable registration store.
pub struct RegistrationDatabase {
    db: Database,
    cache: DigestCache,
    recent_capacity: u64,
}

impl RegistrationDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DIGEST_ADDRESS)?;
            let _ = write_txn.open_table(REGISTRATIONS)?;
            let _ = write_txn.open_table(RECENT)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Registration database opened");

        Ok(Self {
            db,
            cache: DigestCache::default(),
            recent_capacity: DEFAULT_RECENT_CAPACITY as u64,
        })
    }

    /// Open the database file inside `data_dir`.
    pub fn open_in_dir(data_dir: &Path) -> StoreResult<Self> {
        Self::open(&data_dir.join(DATABASE_FILE))
    }

    /// Override the recent-activity feed capacity.
    pub fn with_recent_capacity(mut self, capacity: usize) -> Self {
        self.recent_capacity = capacity.max(1) as u64;
        self
    }

    fn lookup_digest(&self, digest: &Digest) -> StoreResult<Option<PaymentAddress>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DIGEST_ADDRESS)?;
        match table.get(digest.as_str())? {
            Some(v) => Ok(Some(PaymentAddress::from(v.value()))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RegistrationStore for RegistrationDatabase {
    async fn get_address_for_digest(&self, digest: &Digest) -> StoreResult<Option<PaymentAddress>> {
        if let Some(address) = self.cache.get(digest) {
            return Ok(Some(address));
        }

        let found = self.lookup_digest(digest)?;
        if let Some(address) = &found {
            self.cache.put(digest, address);
        }
        Ok(found)
    }

    async fn put_digest_address(
        &self,
        digest: &Digest,
        address: &PaymentAddress,
    ) -> StoreResult<BindOutcome> {
        let write_txn = self.db.begin_write()?;
        let existing = {
            let mut table = write_txn.open_table(DIGEST_ADDRESS)?;
            let existing = table
                .get(digest.as_str())?
                .map(|v| PaymentAddress::from(v.value()));
            if existing.is_none() {
                table.insert(digest.as_str(), address.as_str())?;
            }
            existing
        };

        match existing {
            Some(existing) => {
                write_txn.abort()?;
                self.cache.put(digest, &existing);
                Ok(BindOutcome::AlreadyBound(existing))
            }
            None => {
                write_txn.commit()?;
                self.cache.put(digest, address);
                Ok(BindOutcome::Bound)
            }
        }
    }

    async fn put_registration(&self, record: &RegistrationRecord) -> StoreResult<()> {
        let json = serde_json::to_vec(record)?;
        let address = record.payment_address.as_str();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(REGISTRATIONS)?;

            let existing_bytes = table.get(address)?.map(|v| v.value().to_vec());
            if let Some(bytes) = existing_bytes {
                let existing: RegistrationRecord = serde_json::from_slice(&bytes)?;
                if existing.digest != record.digest {
                    return Err(StoreError::AddressConflict(record.payment_address.clone()));
                }
            }

            table.insert(address, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn get_registration(
        &self,
        address: &PaymentAddress,
    ) -> StoreResult<Option<RegistrationRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(REGISTRATIONS)?;
        match table.get(address.as_str())? {
            Some(value) => {
                let record: RegistrationRecord = serde_json::from_slice(value.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn append_recent(&self, entry: &RecentRegistration) -> StoreResult<()> {
        let json = serde_json::to_vec(entry)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(RECENT)?;

            let next = match table.last()? {
                Some((key, _)) => key.value() + 1,
                None => 0,
            };
            table.insert(next, json.as_slice())?;

            // Drop everything older than the newest `recent_capacity` entries.
            let cutoff = (next + 1).saturating_sub(self.recent_capacity);
            loop {
                let oldest = match table.first()? {
                    Some((key, _)) => key.value(),
                    None => break,
                };
                if oldest >= cutoff {
                    break;
                }
                table.remove(oldest)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<RecentRegistration>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECENT)?;

        let mut results = Vec::with_capacity(limit.min(self.recent_capacity as usize));
        for entry in table.iter()?.rev().take(limit) {
            let (_, value) = entry?;
            results.push(serde_json::from_slice(value.value())?);
        }
        Ok(results)
    }
}

// =============================================================================
// Tests
// =============================================================================
