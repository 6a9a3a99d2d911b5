// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document proof-of-existence registration.

pub mod digest;
pub mod fee;
pub mod registrar;

pub use digest::{is_valid_digest, Digest, DIGEST_HEX_LEN};
pub use fee::{estimate_fee, quote_fee, FeeQuote};
pub use registrar::{Registrar, RegistrarSettings, RegistrationError, RegistrationOutcome};
