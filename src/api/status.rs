// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::error;

use crate::{
    docproof::Digest,
    error::{ApiError, ErrorBody},
    models::RegistrationStatusResponse,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/status/{digest}",
    params(
        ("digest" = String, Path, description = "Hex SHA-256 of the document (64 characters)")
    ),
    tag = "Registration",
    responses(
        (status = 200, body = RegistrationStatusResponse),
        (status = 400, description = "Malformed digest", body = ErrorBody),
        (status = 404, description = "Digest not registered", body = ErrorBody)
    )
)]
pub async fn registration_status(
    State(state): State<AppState>,
    Path(raw_digest): Path<String>,
) -> Result<Json<RegistrationStatusResponse>, ApiError> {
    let digest = Digest::parse(&raw_digest).ok_or_else(ApiError::invalid_digest)?;

    let address = state
        .store
        .get_address_for_digest(&digest)
        .await
        .map_err(|e| {
            error!(digest = %digest, error = %e, "Digest lookup failed");
            ApiError::internal()
        })?
        .ok_or_else(|| ApiError::not_found("Not found"))?;

    // A binding without a record is a registration that failed midway.
    let record = state
        .store
        .get_registration(&address)
        .await
        .map_err(|e| {
            error!(digest = %digest, address = %address, error = %e, "Registration lookup failed");
            ApiError::internal()
        })?
        .ok_or_else(|| ApiError::not_found("Not found"))?;

    Ok(Json(RegistrationStatusResponse {
        explorer_url: state.network.explorer_address_url(record.payment_address.as_str()),
        digest: record.digest,
        pay_address: record.payment_address,
        pending: record.pending,
        timestamp: record.timestamp,
        fee: record.fee,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::models::{PaymentAddress, RegisterResponse};
    use crate::storage::{InMemoryStore, RegistrationStore};
    use crate::test_support::{sample_digest, RecordingNotifier};

    #[tokio::test]
    async fn status_of_registered_digest() {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::for_tests(store.clone(), Arc::new(RecordingNotifier::default()));
        let digest = sample_digest(0xab);

        let details = match crate::api::register::register_document(
            State(state.clone()),
            Path(digest.to_string()),
        )
        .await
        .unwrap()
        .0
        {
            RegisterResponse::Registered(details) => details,
            other => panic!("unexpected {other:?}"),
        };

        let Json(status) = registration_status(State(state), Path(digest.to_string()))
            .await
            .expect("status found");
        assert_eq!(status.digest, digest);
        assert_eq!(status.pay_address, details.pay_address);
        assert!(status.pending);
        assert_eq!(status.fee, 10_000);
        assert_eq!(
            status.explorer_url,
            format!("https://testnet.snowtrace.io/address/{}", details.pay_address)
        );

        let json = serde_json::to_value(&status).unwrap();
        assert!(json.get("path").is_none());
    }

    #[tokio::test]
    async fn unknown_digest_is_not_found() {
        let state = AppState::for_tests(
            Arc::new(InMemoryStore::new()),
            Arc::new(RecordingNotifier::default()),
        );

        let err = registration_status(State(state), Path(sample_digest(1).to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.reason, "Not found");
    }

    #[tokio::test]
    async fn binding_without_record_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::for_tests(store.clone(), Arc::new(RecordingNotifier::default()));
        let digest = sample_digest(2);
        store
            .put_digest_address(&digest, &PaymentAddress::from("0x01"))
            .await
            .unwrap();

        let err = registration_status(State(state), Path(digest.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_digest_is_bad_request() {
        let state = AppState::for_tests(
            Arc::new(InMemoryStore::new()),
            Arc::new(RecordingNotifier::default()),
        );

        let err = registration_status(State(state), Path("xyz".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
