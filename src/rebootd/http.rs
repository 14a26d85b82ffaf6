/*
 * Copyright 2025 Luc Lenôtre
 *
 * This file is part of Maestro.
 *
 * Maestro is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * Maestro is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * Maestro. If not, see <https://www.gnu.org/licenses/>.
 */

//! HTTP interface of the daemon.

use crate::coordinator::{RebootCoordinator, RebootOutcome};
use crate::error::RebootError;
use crate::status::{Status, StatusReporter};
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::error;
use std::sync::Arc;
use tokio::task;

/// State shared by the handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RebootCoordinator>,
    pub status: StatusReporter,
}

impl AppState {
    pub fn new(coordinator: Arc<RebootCoordinator>) -> Self {
        let status = StatusReporter::new(coordinator.guard().clone());
        Self {
            coordinator,
            status,
        }
    }
}

/// Builds the router serving the daemon's endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/reboot", post(handle_reboot))
        .route("/status", get(handle_status))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Returns the HTTP status code answering a rejected request.
///
/// Only authentication failures use an error status. Other rejections are reported in the body.
fn status_code(err: &RebootError) -> StatusCode {
    match err {
        RebootError::Auth => StatusCode::UNAUTHORIZED,
        RebootError::AlreadyInFlight | RebootError::Decode(_) => StatusCode::OK,
    }
}

async fn handle_reboot(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<RebootOutcome>) {
    // A body that cannot be read is answered like a malformed one
    let body = body.map_err(|rejection| rejection.body_text());
    let coordinator = state.coordinator.clone();
    let admission = task::spawn_blocking(move || match body {
        Ok(body) => coordinator.admit(&body),
        Err(err) => Err(coordinator.reject_unreadable(err)),
    })
    .await;
    match admission {
        Ok(Ok(reboot)) => {
            let outcome = RebootOutcome::initiated(reboot.delay);
            state.coordinator.schedule(reboot);
            (StatusCode::OK, Json(outcome))
        }
        Ok(Err(e)) => (status_code(&e), Json(RebootOutcome::from(&e))),
        Err(e) => {
            error!("reboot admission aborted: {e}");
            let outcome = RebootOutcome {
                success: false,
                message: "Internal server error".to_owned(),
                error: Some(e.to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(outcome))
        }
    }
}

async fn handle_status(State(state): State<AppState>) -> Json<Status> {
    Json(state.status.status())
}

async fn handle_health() -> &'static str {
    "OK"
}
