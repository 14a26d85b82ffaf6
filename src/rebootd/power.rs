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

//! This module handles the actual power-cycle of the system.
//!
//! Two backends are available: running the system's `reboot` command, or calling the `reboot`
//! system call directly.

use crate::error::ExecError;
use std::io;
use std::process::Command;

/// A way of rebooting the system.
pub trait PowerControl: Send + Sync {
    /// Reboots the system, blocking until the action is launched.
    ///
    /// If `force` is set, the reboot happens immediately without stopping services.
    ///
    /// On success, the function may never return since the system is going down.
    fn reboot(&self, force: bool) -> Result<(), ExecError>;
}

/// Reboots using the `reboot` command.
///
/// The command is run through `sudo` unless the daemon runs as root.
#[derive(Debug, Default)]
pub struct CommandPower;

impl CommandPower {
    /// Returns the program and arguments to run.
    fn command_line(force: bool, root: bool) -> Vec<&'static str> {
        let mut args = Vec::with_capacity(3);
        if !root {
            args.push("sudo");
        }
        args.push("reboot");
        if force {
            args.push("-f");
        }
        args
    }
}

impl PowerControl for CommandPower {
    fn reboot(&self, force: bool) -> Result<(), ExecError> {
        let root = unsafe { libc::geteuid() } == 0;
        let args = Self::command_line(force, root);
        let program = args.join(" ");
        let status = Command::new(args[0])
            .args(&args[1..])
            .status()
            .map_err(|source| ExecError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ExecError::Exited {
                program,
                status,
            });
        }
        Ok(())
    }
}

/// Reboots using the `reboot` system call.
///
/// Requires the `CAP_SYS_BOOT` capability.
#[derive(Debug, Default)]
pub struct SyscallPower;

impl PowerControl for SyscallPower {
    fn reboot(&self, force: bool) -> Result<(), ExecError> {
        if !force {
            // Flush filesystems before going down
            unsafe {
                libc::sync();
            }
        }
        let res = unsafe { libc::reboot(libc::LINUX_REBOOT_CMD_RESTART) };
        if res < 0 {
            return Err(ExecError::Syscall(io::Error::last_os_error()));
        }
        Ok(())
    }
}
