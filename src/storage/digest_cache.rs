// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for digest → payment address lookups.
//!
//! Every registration attempt starts with a digest lookup, and repeat
//! submissions of the same document are common. Bindings never change once
//! written, so cached entries need no expiry.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::docproof::Digest;
use crate::models::PaymentAddress;

/// Default number of bindings kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// In-process LRU cache of digest bindings.
pub struct DigestCache {
    cache: Mutex<LruCache<Digest, PaymentAddress>>,
}

impl DigestCache {
    /// Create a new cache holding at most `capacity` bindings.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    pub fn get(&self, digest: &Digest) -> Option<PaymentAddress> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(digest).cloned()
    }

    pub fn put(&self, digest: &Digest, address: &PaymentAddress) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(digest.clone(), address.clone());
        }
    }
}

impl Default for DigestCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
