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

//! `rebootd` is a daemon allowing to reboot the system through HTTP.

mod cli;

use clap::Parser;
use cli::{Cli, init_logging};
use log::info;
use rebootd::coordinator::RebootCoordinator;
use rebootd::error;
use rebootd::guard::RebootGuard;
use rebootd::http::{AppState, build_router};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_filter.as_deref());
    let auth = cli.authenticator().unwrap_or_else(|e| error("rebootd", e));
    let auth_enabled = auth.is_enabled();
    let coordinator = RebootCoordinator::new(Arc::new(RebootGuard::new()), auth, cli.power());
    let router = build_router(AppState::new(Arc::new(coordinator)));
    let addr = cli.listen_addr();
    let listener = TcpListener::bind(addr).await.unwrap_or_else(|e| {
        error("rebootd", format_args!("cannot listen on `{addr}`: {e}"));
    });
    info!("reboot server starting on {addr}");
    info!(
        "authentication: {}",
        if auth_enabled { "enabled" } else { "disabled" }
    );
    if let Err(e) = axum::serve(listener, router).await {
        error("rebootd", format_args!("server failed: {e}"));
    }
}
