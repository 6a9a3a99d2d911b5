// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory registration store for development and tests.
//!
//! Data is lost on restart. All maps sit behind one lock so the digest
//! check-and-set is atomic.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BindOutcome, RegistrationStore, StoreError, StoreResult, DEFAULT_RECENT_CAPACITY};
use crate::docproof::Digest;
use crate::models::{PaymentAddress, RecentRegistration, RegistrationRecord};

#[derive(Default)]
struct Inner {
    digests: HashMap<Digest, PaymentAddress>,
    registrations: HashMap<PaymentAddress, RegistrationRecord>,
    recent: VecDeque<RecentRegistration>,
}

pub struct InMemoryStore {
    inner: RwLock<Inner>,
    recent_capacity: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_recent_capacity(DEFAULT_RECENT_CAPACITY)
    }

    pub fn with_recent_capacity(recent_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            recent_capacity: recent_capacity.max(1),
        }
    }

    /// Number of digest bindings held.
    pub async fn binding_count(&self) -> usize {
        self.inner.read().await.digests.len()
    }

    /// Number of registration records held.
    pub async fn registration_count(&self) -> usize {
        self.inner.read().await.registrations.len()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryStore {
    async fn get_address_for_digest(&self, digest: &Digest) -> StoreResult<Option<PaymentAddress>> {
        Ok(self.inner.read().await.digests.get(digest).cloned())
    }

    async fn put_digest_address(
        &self,
        digest: &Digest,
        address: &PaymentAddress,
    ) -> StoreResult<BindOutcome> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.digests.get(digest) {
            return Ok(BindOutcome::AlreadyBound(existing.clone()));
        }
        inner.digests.insert(digest.clone(), address.clone());
        Ok(BindOutcome::Bound)
    }

    async fn put_registration(&self, record: &RegistrationRecord) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.registrations.get(&record.payment_address) {
            if existing.digest != record.digest {
                return Err(StoreError::AddressConflict(record.payment_address.clone()));
            }
        }
        inner
            .registrations
            .insert(record.payment_address.clone(), record.clone());
        Ok(())
    }

    async fn get_registration(
        &self,
        address: &PaymentAddress,
    ) -> StoreResult<Option<RegistrationRecord>> {
        Ok(self.inner.read().await.registrations.get(address).cloned())
    }

    async fn append_recent(&self, entry: &RecentRegistration) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.recent.push_front(entry.clone());
        inner.recent.truncate(self.recent_capacity);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<RecentRegistration>> {
        Ok(self
            .inner
            .read()
            .await
            .recent
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}
