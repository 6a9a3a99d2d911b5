// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docproof::Digest,
    error::ErrorBody,
    models::{
        ExistingRegistration, PaymentAddress, PaymentDetails, RecentRegistration,
        RegisterResponse, RegistrationStatusResponse,
    },
    state::AppState,
};

pub mod health;
pub mod latest;
pub mod register;
pub mod status;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/register/{digest}", post(register::register_document))
        .route("/status/{digest}", get(status::registration_status))
        .route("/latest/unconfirmed", get(latest::latest_unconfirmed));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        register::register_document,
        status::registration_status,
        latest::latest_unconfirmed,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Digest,
            PaymentAddress,
            PaymentDetails,
            ExistingRegistration,
            RegisterResponse,
            RegistrationStatusResponse,
            RecentRegistration,
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Registration", description = "Document registration and status"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
struct ApiDoc;
