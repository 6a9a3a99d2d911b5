// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Registration Orchestrator
//!
//! Drives a digest from unseen to registered:
//!
//! 1. Look up the digest; an existing binding short-circuits.
//! 2. Draw a fresh child-key path and derive the payment address.
//! 3. Estimate the fee and clamp it below the document price.
//! 4. Bind digest → address (check-and-set in the store).
//! 5. Store the registration record under the address.
//! 6. Subscribe for unconfirmed and confirmed payment notifications.
//! 7. Push the record (without key path) onto the recent-activity feed.
//! 8. Return payment details.
//!
//! Nothing is rolled back on failure. A retry finds the binding written in
//! step 4 and returns the existing-registration response, so no second
//! address is ever derived for a digest.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::digest::Digest;
use super::fee::{estimate_fee, quote_fee};
use crate::blockchain::{DerivationError, KeyDeriver};
use crate::models::{PaymentDetails, RecentRegistration, RegistrationRecord};
use crate::providers::{CallbackUrls, HookSubscription, NotifyError, PaymentNotifier};
use crate::storage::{BindOutcome, RegistrationStore, StoreError};

/// Pricing and notification settings for registrations.
#[derive(Debug, Clone)]
pub struct RegistrarSettings {
    /// Price charged per document, in smallest currency units.
    pub document_price: u64,
    /// Fee rate per kilobyte, in smallest currency units.
    pub fee_per_kilobyte: u64,
    pub fee_multiplier: u64,
    /// Confirmations required before the confirmed hook fires.
    pub confirmations: u32,
    pub callbacks: CallbackUrls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The digest was new; pay to the returned address.
    Registered(PaymentDetails),
    /// The digest was already bound, including races lost to another request.
    Existing(Digest),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("key derivation failed: {0}")]
    Derivation(#[from] DerivationError),

    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("notification subscription failed: {0}")]
    Notify(#[from] NotifyError),
}

pub struct Registrar {
    deriver: Arc<KeyDeriver>,
    store: Arc<dyn RegistrationStore>,
    notifier: Arc<dyn PaymentNotifier>,
    settings: RegistrarSettings,
}

impl Registrar {
    pub fn new(
        deriver: Arc<KeyDeriver>,
        store: Arc<dyn RegistrationStore>,
        notifier: Arc<dyn PaymentNotifier>,
        settings: RegistrarSettings,
    ) -> Self {
        Self {
            deriver,
            store,
            notifier,
            settings,
        }
    }

    pub fn deriver(&self) -> &KeyDeriver {
        &self.deriver
    }

    /// Register `digest`, or report that it is already registered.
    pub async fn register(&self, digest: &Digest) -> Result<RegistrationOutcome, RegistrationError> {
        if self.store.get_address_for_digest(digest).await?.is_some() {
            return Ok(RegistrationOutcome::Existing(digest.clone()));
        }

        let path = self.deriver.random_path();
        let derived = self.deriver.derive(&path)?;
        let address = derived.address;

        let quote = quote_fee(
            estimate_fee(self.settings.fee_per_kilobyte, self.settings.fee_multiplier),
            self.settings.document_price,
        );

        let record = RegistrationRecord {
            digest: digest.clone(),
            path,
            payment_address: address.clone(),
            pending: true,
            timestamp: Utc::now(),
            fee_per_kilobyte: self.settings.fee_per_kilobyte,
            fee: quote.fee,
        };

        match self.store.put_digest_address(digest, &address).await? {
            BindOutcome::Bound => {}
            BindOutcome::AlreadyBound(existing) => {
                info!(
                    digest = %digest,
                    address = %existing,
                    "Digest bound by a concurrent request"
                );
                return Ok(RegistrationOutcome::Existing(digest.clone()));
            }
        }

        self.store.put_registration(&record).await?;

        if let Err(e) = self.subscribe(&record).await {
            error!(
                digest = %digest,
                address = %address,
                error = %e,
                "Registration stored but payment notifications are not subscribed"
            );
            return Err(e.into());
        }

        if let Err(e) = self
            .store
            .append_recent(&RecentRegistration::from(&record))
            .await
        {
            warn!(
                digest = %digest,
                address = %address,
                error = %e,
                "Failed to record registration in recent activity"
            );
        }

        info!(
            digest = %digest,
            address = %address,
            fee = record.fee,
            fee_clamped = quote.clamped,
            "Document registered"
        );

        Ok(RegistrationOutcome::Registered(PaymentDetails::new(
            digest.clone(),
            address,
            self.settings.document_price,
        )))
    }

    async fn subscribe(&self, record: &RegistrationRecord) -> Result<(), NotifyError> {
        let address = record.payment_address.as_str();

        self.notifier
            .subscribe(&HookSubscription::unconfirmed(
                address,
                self.settings.callbacks.unconfirmed(address),
            ))
            .await?;

        self.notifier
            .subscribe(&HookSubscription::confirmed(
                address,
                self.settings.callbacks.confirmed(address),
                self.settings.confirmations,
            ))
            .await
    }
}
