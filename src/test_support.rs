// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures and doubles for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use url::Url;

use crate::blockchain::{KeyDeriver, AVAX_FUJI};
use crate::docproof::{Digest, RegistrarSettings};
use crate::models::{PaymentAddress, RecentRegistration, RegistrationRecord};
use crate::providers::{CallbackUrls, HookSubscription, NotifyError, PaymentNotifier};
use crate::storage::{BindOutcome, InMemoryStore, RegistrationStore, StoreError, StoreResult};

/// BIP32 test vector 1 seed.
pub const TEST_SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f";

pub fn test_deriver() -> KeyDeriver {
    KeyDeriver::from_seed_hex(TEST_SEED_HEX, AVAX_FUJI).unwrap()
}

pub fn test_settings() -> RegistrarSettings {
    let host: Url = "https://proof.example.com".parse().unwrap();
    RegistrarSettings {
        document_price: 100_000,
        fee_per_kilobyte: 10_000,
        fee_multiplier: 1,
        confirmations: 1,
        callbacks: CallbackUrls::new(&host, "magic"),
    }
}

/// Digest made of the byte `n` repeated.
pub fn sample_digest(n: u8) -> Digest {
    Digest::parse(&format!("{n:02x}").repeat(32)).unwrap()
}

/// Notifier that records every subscription and can be switched to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    subscriptions: Mutex<Vec<HookSubscription>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn subscriptions(&self) -> Vec<HookSubscription> {
        self.subscriptions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentNotifier for RecordingNotifier {
    async fn subscribe(&self, subscription: &HookSubscription) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected("provider down".to_string()));
        }
        self.subscriptions.lock().unwrap().push(subscription.clone());
        Ok(())
    }
}

/// In-memory store whose recent-activity feed always fails.
#[derive(Default)]
pub struct FailingRecentStore {
    inner: InMemoryStore,
}

#[async_trait]
impl RegistrationStore for FailingRecentStore {
    async fn get_address_for_digest(&self, digest: &Digest) -> StoreResult<Option<PaymentAddress>> {
        self.inner.get_address_for_digest(digest).await
    }

    async fn put_digest_address(
        &self,
        digest: &Digest,
        address: &PaymentAddress,
    ) -> StoreResult<BindOutcome> {
        self.inner.put_digest_address(digest, address).await
    }

    async fn put_registration(&self, record: &RegistrationRecord) -> StoreResult<()> {
        self.inner.put_registration(record).await
    }

    async fn get_registration(
        &self,
        address: &PaymentAddress,
    ) -> StoreResult<Option<RegistrationRecord>> {
        self.inner.get_registration(address).await
    }

    async fn append_recent(&self, _entry: &RecentRegistration) -> StoreResult<()> {
        Err(StoreError::Unavailable("recent feed offline".to_string()))
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<RecentRegistration>> {
        self.inner.recent(limit).await
    }
}

/// Store that loses every bind to a concurrent writer.
///
/// Lookups see no binding, then the check-and-set reports the digest as
/// already bound to `winner`. Everything else goes to `inner`.
pub struct LosingBindStore {
    pub inner: InMemoryStore,
    winner: PaymentAddress,
    bind_attempts: AtomicUsize,
}

impl LosingBindStore {
    pub fn new(winner: PaymentAddress) -> Self {
        Self {
            inner: InMemoryStore::new(),
            winner,
            bind_attempts: AtomicUsize::new(0),
        }
    }

    pub fn bind_attempts(&self) -> usize {
        self.bind_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrationStore for LosingBindStore {
    async fn get_address_for_digest(&self, _digest: &Digest) -> StoreResult<Option<PaymentAddress>> {
        Ok(None)
    }

    async fn put_digest_address(
        &self,
        _digest: &Digest,
        _address: &PaymentAddress,
    ) -> StoreResult<BindOutcome> {
        self.bind_attempts.fetch_add(1, Ordering::SeqCst);
        Ok(BindOutcome::AlreadyBound(self.winner.clone()))
    }

    async fn put_registration(&self, record: &RegistrationRecord) -> StoreResult<()> {
        self.inner.put_registration(record).await
    }

    async fn get_registration(
        &self,
        address: &PaymentAddress,
    ) -> StoreResult<Option<RegistrationRecord>> {
        self.inner.get_registration(address).await
    }

    async fn append_recent(&self, entry: &RecentRegistration) -> StoreResult<()> {
        self.inner.append_recent(entry).await
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<RecentRegistration>> {
        self.inner.recent(limit).await
    }
}

/// Store where every operation fails.
pub struct BrokenStore;

pub const BROKEN_STORE_DETAIL: &str = "disk /dev/sda1 on fire";

fn broken<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable(BROKEN_STORE_DETAIL.to_string()))
}

#[async_trait]
impl RegistrationStore for BrokenStore {
    async fn get_address_for_digest(&self, _digest: &Digest) -> StoreResult<Option<PaymentAddress>> {
        broken()
    }

    async fn put_digest_address(
        &self,
        _digest: &Digest,
        _address: &PaymentAddress,
    ) -> StoreResult<BindOutcome> {
        broken()
    }

    async fn put_registration(&self, _record: &RegistrationRecord) -> StoreResult<()> {
        broken()
    }

    async fn get_registration(
        &self,
        _address: &PaymentAddress,
    ) -> StoreResult<Option<RegistrationRecord>> {
        broken()
    }

    async fn append_recent(&self, _entry: &RecentRegistration) -> StoreResult<()> {
        broken()
    }

    async fn recent(&self, _limit: usize) -> StoreResult<Vec<RecentRegistration>> {
        broken()
    }
}

/// A log event seen by [`CapturedEvents`]: level and field names.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: Vec<&'static str>,
}

impl CapturedEvent {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| *field == name)
    }
}

/// Tracing layer that records every event.
#[derive(Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<CapturedEvent>>>);

impl CapturedEvents {
    /// Events recorded at `level`.
    pub fn at(&self, level: Level) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }

    /// Subscriber that feeds this recorder, for `with_default`/`set_default`.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync {
        tracing_subscriber::registry().with(self.clone())
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        self.0.lock().unwrap().push(CapturedEvent {
            level: *metadata.level(),
            fields: metadata.fields().iter().map(|field| field.name()).collect(),
        });
    }
}
