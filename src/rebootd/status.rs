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

//! Read-only view of the daemon's state.

use crate::guard::RebootGuard;
use crate::util::get_timestamp;
use serde::Serialize;
use std::sync::Arc;

/// The state of the daemon, as reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// No reboot is in flight.
    Ready,
    /// A reboot has been admitted and not released.
    Rebooting,
}

/// A status report.
#[derive(Clone, Debug, Serialize)]
pub struct Status {
    pub status: State,
    /// Time of the report, in seconds since the Unix epoch.
    pub timestamp: u64,
}

/// Reports the current state of the reboot guard.
#[derive(Clone, Debug)]
pub struct StatusReporter {
    guard: Arc<RebootGuard>,
}

impl StatusReporter {
    pub fn new(guard: Arc<RebootGuard>) -> Self {
        Self {
            guard,
        }
    }

    /// Returns the current status.
    pub fn status(&self) -> Status {
        let status = if self.guard.is_in_flight() {
            State::Rebooting
        } else {
            State::Ready
        };
        Status {
            status,
            timestamp: get_timestamp().as_secs(),
        }
    }
}
