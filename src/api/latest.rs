// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use tracing::error;

use crate::{
    error::{ApiError, ErrorBody},
    models::RecentRegistration,
    state::AppState,
    storage::DEFAULT_RECENT_CAPACITY,
};

/// Most recent registrations, newest first.
#[utoipa::path(
    get,
    path = "/v1/latest/unconfirmed",
    tag = "Registration",
    responses(
        (status = 200, body = [RecentRegistration]),
        (status = 500, body = ErrorBody)
    )
)]
pub async fn latest_unconfirmed(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecentRegistration>>, ApiError> {
    let recent = state
        .store
        .recent(DEFAULT_RECENT_CAPACITY)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to read recent registrations");
            ApiError::internal()
        })?;
    Ok(Json(recent))
}
