// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for a webhook-style payment notification provider.
//!
//! Subscriptions are created with `POST {endpoint}?token={token}` and a
//! JSON body `{event, address, url, confirmations?}`. The provider answers
//! with the created hook, whose `id` is logged for later cleanup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use super::{HookSubscription, NotifyError, PaymentNotifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct HookCreatedResponse {
    id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WebhookClient {
    endpoint: Url,
    token: Option<String>,
    http: Client,
}

impl WebhookClient {
    pub fn new(endpoint: Url, token: Option<String>) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            token,
            http,
        })
    }

    fn hooks_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        url
    }
}

#[async_trait]
impl PaymentNotifier for WebhookClient {
    async fn subscribe(&self, subscription: &HookSubscription) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(self.hooks_url())
            .json(subscription)
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API token.
                let e = e.without_url();
                NotifyError::Request(format!("POST {} failed: {e}", self.endpoint.path()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!(
                "{} for {} returned {status}: {body}",
                subscription.event.as_str(),
                subscription.address
            )));
        }

        let created: HookCreatedResponse = response
            .json()
            .await
            .map_err(|e| {
                NotifyError::InvalidResponse(format!("invalid JSON: {}", e.without_url()))
            })?;

        info!(
            event = subscription.event.as_str(),
            address = %subscription.address,
            hook_id = created.id.as_deref().unwrap_or("unknown"),
            "Payment notification subscribed"
        );

        Ok(())
    }
}

/// Notifier used when no provider is configured.
///
/// Subscriptions are only logged, so payments are never detected. Meant
/// for local development.
#[derive(Debug, Default, Clone)]
pub struct LogOnlyNotifier;

#[async_trait]
impl PaymentNotifier for LogOnlyNotifier {
    async fn subscribe(&self, subscription: &HookSubscription) -> Result<(), NotifyError> {
        warn!(
            event = subscription.event.as_str(),
            address = %subscription.address,
            url = %subscription.url,
            "No notification provider configured, subscription not sent"
        );
        Ok(())
    }
}
