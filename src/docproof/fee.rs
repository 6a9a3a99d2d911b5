// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration fee estimation.
//!
//! All amounts are integers in the smallest currency unit of the
//! configured network.

/// Fee for a registration, before any clamping.
pub fn estimate_fee(fee_per_kilobyte: u64, multiplier: u64) -> u64 {
    fee_per_kilobyte.saturating_mul(multiplier)
}

/// A fee checked against the document price ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// Fee to record for the registration. Always below the price.
    pub fee: u64,
    /// Fee before clamping.
    pub estimated: u64,
    /// Whether the estimate met or exceeded the price.
    pub clamped: bool,
}

/// Clamp an estimated fee below the configured document price.
///
/// When the estimate meets or exceeds the price the fee is forced to
/// `price - 1` and an advisory warning is logged: the operator should
/// raise the document price.
pub fn quote_fee(estimated: u64, document_price: u64) -> FeeQuote {
    if estimated >= document_price {
        tracing::warn!(
            document_price,
            estimated_fee = estimated,
            "Estimated fee meets document price, price should be increased"
        );
        FeeQuote {
            fee: document_price.saturating_sub(1),
            estimated,
            clamped: true,
        }
    } else {
        FeeQuote {
            fee: estimated,
            estimated,
            clamped: false,
        }
    }
}
