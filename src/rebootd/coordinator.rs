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

//! The coordinator drives a reboot request from admission to execution.
//!
//! A request goes through the following steps:
//! - admission: the request is rejected if a reboot is already in flight
//! - decoding and authentication: on failure, the request is rejected
//! - acquisition: the guard is acquired, unless another request got it first
//! - scheduling: the caller is answered, and a background task waits for the delay then reboots
//!
//! The guard is only taken once the request is known to be valid, so that a rejected request
//! never makes the daemon look busy while its token is being verified.
//!
//! If the reboot fails, the background task releases the guard so that another attempt can be
//! made. On success, the guard is never released since the process is expected to die with the
//! system.

use crate::auth::Authenticator;
use crate::error::{ExecError, RebootError};
use crate::guard::RebootGuard;
use crate::power::PowerControl;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tokio::time;
use uuid::Uuid;

/// The body of a reboot request.
#[derive(Debug, Default, Deserialize)]
pub struct RebootRequest {
    /// The credential. If absent, the empty string is used.
    #[serde(default)]
    pub token: Option<String>,
    /// Delay before rebooting, in seconds.
    #[serde(default)]
    pub delay: u64,
    /// If true, reboot without stopping services.
    #[serde(default)]
    pub force: bool,
}

/// The answer to a reboot request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RebootOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RebootOutcome {
    /// The outcome of an admitted request.
    pub fn initiated(delay: u64) -> Self {
        Self {
            success: true,
            message: format!("Reboot initiated. Delay: {delay} seconds"),
            error: None,
        }
    }
}

impl From<&RebootError> for RebootOutcome {
    fn from(err: &RebootError) -> Self {
        let error = match err {
            RebootError::Decode(e) => Some(e.clone()),
            _ => None,
        };
        Self {
            success: false,
            message: err.to_string(),
            error,
        }
    }
}

/// A reboot that passed admission and is waiting to be scheduled.
#[derive(Debug)]
pub struct AdmittedReboot {
    /// Identifier used to correlate log entries.
    pub id: Uuid,
    /// Delay before rebooting, in seconds.
    pub delay: u64,
    pub force: bool,
}

/// Orchestrates admission, authentication and execution of reboots.
pub struct RebootCoordinator {
    guard: Arc<RebootGuard>,
    auth: Authenticator,
    power: Arc<dyn PowerControl>,
}

impl RebootCoordinator {
    pub fn new(guard: Arc<RebootGuard>, auth: Authenticator, power: Arc<dyn PowerControl>) -> Self {
        Self {
            guard,
            auth,
            power,
        }
    }

    /// Returns the guard protecting reboots.
    pub fn guard(&self) -> &Arc<RebootGuard> {
        &self.guard
    }

    /// Fails if a reboot is in flight.
    fn check_idle(&self) -> Result<(), RebootError> {
        if self.guard.is_in_flight() {
            info!("rejected reboot request: a reboot is already in flight");
            return Err(RebootError::AlreadyInFlight);
        }
        Ok(())
    }

    /// Admits the reboot request with the raw body `body`.
    ///
    /// On success, the guard is held and the returned reboot must be passed to
    /// [`Self::schedule`]. On error, the guard is left untouched.
    ///
    /// Verifying the token is CPU-bound, so this function should not be called on an async
    /// worker.
    pub fn admit(&self, body: &[u8]) -> Result<AdmittedReboot, RebootError> {
        self.check_idle()?;
        let req: RebootRequest = serde_json::from_slice(body).map_err(|e| {
            warn!("rejected reboot request: invalid body: {e}");
            RebootError::Decode(e.to_string())
        })?;
        if !self.auth.authenticate(req.token.as_deref().unwrap_or_default()) {
            warn!("rejected reboot request: authentication failed");
            return Err(RebootError::Auth);
        }
        if !self.guard.try_acquire() {
            info!("rejected reboot request: another reboot was admitted concurrently");
            return Err(RebootError::AlreadyInFlight);
        }
        let reboot = AdmittedReboot {
            id: Uuid::new_v4(),
            delay: req.delay,
            force: req.force,
        };
        info!(
            "reboot {} admitted (delay: {}s, force: {})",
            reboot.id, reboot.delay, reboot.force
        );
        Ok(reboot)
    }

    /// Rejects a reboot request whose body could not be read, with the error message `err`.
    pub fn reject_unreadable(&self, err: String) -> RebootError {
        if let Err(e) = self.check_idle() {
            return e;
        }
        warn!("rejected reboot request: cannot read body: {err}");
        RebootError::Decode(err)
    }

    /// Spawns the background task executing the admitted `reboot`.
    ///
    /// The task outlives the request. Once spawned, it cannot be cancelled.
    pub fn schedule(&self, reboot: AdmittedReboot) -> JoinHandle<()> {
        let guard = self.guard.clone();
        let power = self.power.clone();
        tokio::spawn(async move {
            let AdmittedReboot {
                id,
                delay,
                force,
            } = reboot;
            if delay > 0 {
                info!("reboot {id}: waiting {delay} seconds before reboot...");
                time::sleep(Duration::from_secs(delay)).await;
            }
            info!("reboot {id}: initiating system reboot...");
            let res = task::spawn_blocking(move || power.reboot(force))
                .await
                .unwrap_or_else(|e| Err(ExecError::Aborted(e.to_string())));
            match res {
                Ok(()) => info!("reboot {id}: reboot command executed successfully"),
                Err(e) => {
                    error!("reboot {id}: failed to execute reboot: {e}");
                    guard.release();
                }
            }
        })
    }
}
