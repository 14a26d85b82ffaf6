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

//! Command line and environment configuration of the daemon.

use clap::{Parser, ValueEnum};
use env_logger::Env;
use rebootd::auth::Authenticator;
use rebootd::error::CredentialError;
use rebootd::power::{CommandPower, PowerControl, SyscallPower};
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Default logging filter.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// The way the system is rebooted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Run the `reboot` command
    Command,
    /// Call the `reboot` system call directly
    Syscall,
}

/// Remote reboot daemon.
#[derive(Parser, Debug, Clone)]
#[command(name = "rebootd", version)]
pub struct Cli {
    /// Shared secret required to reboot. If empty, authentication is disabled
    #[arg(long, env = "REBOOT_AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Argon2 PHC string of the shared secret, instead of the secret itself
    #[arg(
        long,
        env = "REBOOT_AUTH_TOKEN_HASH",
        hide_env_values = true,
        conflicts_with = "token"
    )]
    pub token_hash: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to listen on
    #[arg(long, env = "REBOOT_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Reboot backend
    #[arg(long, env = "REBOOT_METHOD", value_enum, default_value_t = Method::Command)]
    pub method: Method,

    /// env_logger-style filter string (e.g. "debug"); overrides RUST_LOG
    #[arg(long, env = "REBOOT_LOG")]
    pub log_filter: Option<String>,
}

impl Cli {
    /// Returns the address to listen on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Builds the authenticator for the configured credential.
    pub fn authenticator(&self) -> Result<Authenticator, CredentialError> {
        match (&self.token, &self.token_hash) {
            (_, Some(hash)) => Authenticator::from_hash(hash),
            (Some(token), None) => Authenticator::new(token),
            (None, None) => Ok(Authenticator::disabled()),
        }
    }

    /// Builds the reboot backend.
    pub fn power(&self) -> Arc<dyn PowerControl> {
        match self.method {
            Method::Command => Arc::new(CommandPower),
            Method::Syscall => Arc::new(SyscallPower),
        }
    }
}

/// Initializes logging.
///
/// `cli_filter` takes precedence over `RUST_LOG`.
pub fn init_logging(cli_filter: Option<&str>) {
    let env = Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(filter) = cli_filter {
        builder.parse_filters(filter);
    }
    builder.format(|buf, record| {
        let ts = buf.timestamp_seconds();
        writeln!(
            buf,
            "[{} {:<5} {}] {}",
            ts,
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder.init();
}
