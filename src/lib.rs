// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Docproof - Proof-of-Existence Registration Service
//!
//! A document is registered by its SHA-256 digest. Each new digest gets a
//! payment address derived from the service master key; paying to that
//! address, once confirmed on-chain, timestamps the document.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - HD key derivation and network constants
//! - `docproof` - Digest validation, fee estimation and the registration workflow
//! - `providers` - Payment notification providers
//! - `storage` - Registration stores (in-memory and redb)

pub mod api;
pub mod blockchain;
pub mod config;
pub mod docproof;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
