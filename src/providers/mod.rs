// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Payment notification providers.
//!
//! The service never watches the chain itself. After a registration is
//! persisted it asks a provider to call back when a payment to the new
//! address is first seen and when it is confirmed.

pub mod webhook;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

pub use webhook::{LogOnlyNotifier, WebhookClient};

/// Event a subscription fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEvent {
    #[serde(rename = "unconfirmed-tx")]
    UnconfirmedTx,
    #[serde(rename = "confirmed-tx")]
    ConfirmedTx,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::UnconfirmedTx => "unconfirmed-tx",
            HookEvent::ConfirmedTx => "confirmed-tx",
        }
    }
}

/// A request to be notified about payments to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSubscription {
    pub event: HookEvent,
    pub address: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u32>,
}

impl HookSubscription {
    /// Subscription for the first sighting of a payment.
    pub fn unconfirmed(address: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            event: HookEvent::UnconfirmedTx,
            address: address.into(),
            url: url.into(),
            confirmations: None,
        }
    }

    /// Subscription for a payment reaching `confirmations` confirmations.
    pub fn confirmed(address: impl Into<String>, url: impl Into<String>, confirmations: u32) -> Self {
        Self {
            event: HookEvent::ConfirmedTx,
            address: address.into(),
            url: url.into(),
            confirmations: Some(confirmations),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification provider configuration invalid: {0}")]
    Config(String),

    #[error("Notification provider request failed: {0}")]
    Request(String),

    #[error("Notification provider rejected subscription: {0}")]
    Rejected(String),

    #[error("Notification provider response was invalid: {0}")]
    InvalidResponse(String),
}

/// Subscribes addresses for payment notifications.
#[async_trait]
pub trait PaymentNotifier: Send + Sync {
    async fn subscribe(&self, subscription: &HookSubscription) -> Result<(), NotifyError>;
}

/// Builds the callback URLs the provider calls for an address.
///
/// `{host}/unconfirmed/{token}/{address}` and
/// `{host}/confirmed/{token}/{address}`. The routing token lets the webhook
/// receiver reject calls that did not come from our subscriptions, and the
/// address in the path correlates the call without a lookup.
///
/// Segments are percent-encoded. A query on the host URL is kept after the
/// callback path.
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    host_url: Url,
    token: String,
}

impl CallbackUrls {
    /// `host_url` must be an `http` or `https` URL.
    pub fn new(host_url: &Url, token: impl Into<String>) -> Self {
        let mut host_url = host_url.clone();
        host_url.set_fragment(None);
        Self {
            host_url,
            token: token.into(),
        }
    }

    pub fn unconfirmed(&self, address: &str) -> String {
        self.callback("unconfirmed", address)
    }

    pub fn confirmed(&self, address: &str) -> String {
        self.callback("confirmed", address)
    }

    fn callback(&self, event: &str, address: &str) -> String {
        let mut url = self.host_url.clone();
        // Only cannot-be-a-base URLs (mailto:, data:) refuse segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(event)
                .push(&self.token)
                .push(address);
        }
        url.to_string()
    }
}
