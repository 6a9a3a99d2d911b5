// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::blockchain::NetworkConfig;
use crate::docproof::Registrar;
use crate::storage::RegistrationStore;

#[derive(Clone)]
pub struct AppState {
    pub registrar: Arc<Registrar>,
    pub store: Arc<dyn RegistrationStore>,
    pub network: NetworkConfig,
}

impl AppState {
    pub fn new(
        registrar: Arc<Registrar>,
        store: Arc<dyn RegistrationStore>,
        network: NetworkConfig,
    ) -> Self {
        Self {
            registrar,
            store,
            network,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State wired to the test deriver and settings.
    pub fn for_tests(
        store: Arc<dyn RegistrationStore>,
        notifier: Arc<dyn crate::providers::PaymentNotifier>,
    ) -> Self {
        let deriver = Arc::new(crate::test_support::test_deriver());
        let network = deriver.network().clone();
        let registrar = Arc::new(Registrar::new(
            deriver,
            store.clone(),
            notifier,
            crate::test_support::test_settings(),
        ));
        Self::new(registrar, store, network)
    }
}
