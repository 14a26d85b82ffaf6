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

//! `rebootd` exposes an HTTP endpoint allowing to reboot the system remotely.
//!
//! At most one reboot may be in flight at a time. A request is admitted, authenticated, then
//! answered immediately while the reboot itself runs in a background task, after an optional
//! delay.

use std::fmt;
use std::process::exit;

pub mod auth;
pub mod coordinator;
pub mod error;
pub mod guard;
pub mod http;
pub mod power;
pub mod status;
pub mod util;

/// Writes an error to stderr, then exits.
///
/// The message does not go through the logger, so that it is shown whatever the log filter.
pub fn error<M: fmt::Display>(bin: &str, msg: M) -> ! {
    eprintln!("{bin}: error: {msg}");
    exit(1);
}
