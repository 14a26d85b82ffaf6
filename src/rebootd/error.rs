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

//! Errors that can occur while handling a reboot.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// An error rejecting a reboot request before it is scheduled.
///
/// Each of these is reported to the caller, and the guard is left as it was before the
/// request.
#[derive(Debug, Error)]
pub enum RebootError {
    /// Another reboot is already in flight.
    #[error("System is already rebooting")]
    AlreadyInFlight,
    /// The request body could not be read or decoded. Holds the underlying error message.
    #[error("Invalid request body")]
    Decode(String),
    /// The presented token does not match the configured credential.
    #[error("Authentication failed")]
    Auth,
}

/// An error occurring while executing the reboot itself.
///
/// These happen after the caller got its response, so they can only be logged.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The reboot command could not be launched.
    #[error("cannot launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The reboot command exited abnormally.
    #[error("`{program}` {status}")]
    Exited { program: String, status: ExitStatus },
    /// The `reboot` system call failed.
    #[error("reboot system call failed: {0}")]
    Syscall(#[source] io::Error),
    /// The task running the reboot did not complete.
    #[error("reboot task aborted: {0}")]
    Aborted(String),
}

/// An error on the configured credential, fatal at startup.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("cannot hash authentication token: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("invalid authentication token hash: {0}")]
    InvalidHash(argon2::password_hash::Error),
    #[error("invalid hashing parameters: {0}")]
    Params(argon2::Error),
}
