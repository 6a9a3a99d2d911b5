// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::error;

use crate::{
    docproof::{Digest, RegistrationOutcome},
    error::{ApiError, ErrorBody},
    models::{ExistingRegistration, RegisterResponse},
    state::AppState,
};

/// Register a document digest and get the address to pay.
///
/// Submitting an already registered digest is not an error: the reply has
/// `success: false` and `reason: "existing"`.
#[utoipa::path(
    post,
    path = "/v1/register/{digest}",
    params(
        ("digest" = String, Path, description = "Hex SHA-256 of the document (64 characters)")
    ),
    tag = "Registration",
    responses(
        (status = 200, description = "Payment details, or the existing-registration reply", body = RegisterResponse),
        (status = 400, description = "Malformed digest", body = ErrorBody),
        (status = 500, description = "Registration failed", body = ErrorBody)
    )
)]
pub async fn register_document(
    State(state): State<AppState>,
    Path(raw_digest): Path<String>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let digest = Digest::parse(&raw_digest).ok_or_else(ApiError::invalid_digest)?;

    match state.registrar.register(&digest).await {
        Ok(RegistrationOutcome::Registered(details)) => {
            Ok(Json(RegisterResponse::Registered(details)))
        }
        Ok(RegistrationOutcome::Existing(digest)) => Ok(Json(RegisterResponse::Existing(
            ExistingRegistration::new(digest),
        ))),
        Err(e) => {
            error!(digest = %digest, error = %e, "Registration failed");
            Err(ApiError::internal())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::error::INTERNAL_ERROR_REASON;
    use crate::storage::{InMemoryStore, RegistrationStore};
    use crate::test_support::{BrokenStore, RecordingNotifier};

    const DIGEST: &str = "A1B2C3D4E5F60718293A4B5C6D7E8F90A1B2C3D4E5F60718293A4B5C6D7E8F90";

    #[tokio::test]
    async fn register_new_then_existing() {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::for_tests(store.clone(), Arc::new(RecordingNotifier::default()));

        let Json(first) = register_document(State(state.clone()), Path(DIGEST.to_string()))
            .await
            .expect("registration succeeds");
        let details = match first {
            RegisterResponse::Registered(details) => details,
            other => panic!("expected new registration, got {other:?}"),
        };
        assert_eq!(details.digest.as_str(), DIGEST.to_ascii_lowercase());
        assert_eq!(details.price, 100_000);

        // Same document, other case.
        let Json(second) = register_document(
            State(state.clone()),
            Path(DIGEST.to_ascii_lowercase()),
        )
        .await
        .expect("repeat succeeds");
        assert_eq!(
            second,
            RegisterResponse::Existing(ExistingRegistration::new(details.digest.clone()))
        );
        assert_eq!(store.binding_count().await, 1);
    }

    #[tokio::test]
    async fn invalid_digest_has_no_side_effects() {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::for_tests(store.clone(), notifier.clone());

        for raw in ["not-a-hash", "abc", "g".repeat(64).as_str(), "a".repeat(65).as_str()] {
            let err = register_document(State(state.clone()), Path(raw.to_string()))
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.reason, "Invalid `hash` field");
        }

        assert_eq!(store.binding_count().await, 0);
        assert!(store.recent(10).await.unwrap().is_empty());
        assert!(notifier.subscriptions().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_opaque() {
        let state = AppState::for_tests(Arc::new(BrokenStore), Arc::new(RecordingNotifier::default()));

        let err = register_document(State(state), Path(DIGEST.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.reason, INTERNAL_ERROR_REASON);
    }

    #[tokio::test]
    async fn subscription_failure_is_opaque_and_retry_is_existing() {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::failing());
        let state = AppState::for_tests(store.clone(), notifier.clone());

        let err = register_document(State(state.clone()), Path(DIGEST.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.reason, INTERNAL_ERROR_REASON);

        notifier.set_failing(false);
        let Json(retry) = register_document(State(state), Path(DIGEST.to_string()))
            .await
            .unwrap();
        assert!(matches!(retry, RegisterResponse::Existing(_)));
    }
}
