// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairs with a sync box if needed and prints every state change.
//!
//! ```text
//! cargo run --example pair_and_poll -- <host> [config.json]
//! ```
//!
//! The access token obtained by pairing is written to the config file, so
//! the next run connects directly. Set `RUST_LOG=huesync_lib=debug` for
//! request logs.

use std::sync::Arc;

use huesync_lib::config::{JsonFileConfigStore, SyncBoxConfig};
use huesync_lib::event::SupervisorEvent;
use huesync_lib::supervisor::ConnectionSupervisor;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> huesync_lib::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(host) = args.next() else {
        eprintln!("usage: pair_and_poll <host> [config.json]");
        return Ok(());
    };
    let path = args.next().unwrap_or_else(|| "huesync.json".to_string());

    let store = JsonFileConfigStore::new(path);
    let config = match store.load() {
        Ok(config) if config.host == host => config,
        _ => {
            let config = SyncBoxConfig::new(host);
            store.save(&config)?;
            config
        }
    };

    let supervisor = ConnectionSupervisor::new(Arc::new(store));
    let mut events = supervisor.subscribe();
    supervisor.initialize(config).await?;

    loop {
        match events.recv().await {
            Ok(SupervisorEvent::StateChanged { channel, value }) => {
                println!("{channel:>16} = {value}");
            }
            Ok(SupervisorEvent::StatusChanged { status }) => println!("status: {status}"),
            Ok(SupervisorEvent::PairingRequired { message }) => println!("{message}"),
            Ok(SupervisorEvent::TokenChanged { .. }) => println!("paired, token saved"),
            Err(RecvError::Lagged(skipped)) => eprintln!("skipped {skipped} events"),
            Err(RecvError::Closed) => break,
        }
    }
    Ok(())
}
