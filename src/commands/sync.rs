// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Snapshot;
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::http_client;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let snapshot = match (m.get_one::<String>("url"), m.get_one::<String>("file")) {
        (Some(url), None) => fetch_snapshot(url)?,
        (None, Some(path)) => read_snapshot(path)?,
        _ => bail!("Provide exactly one of --url or --file"),
    };
    let mut store = SqliteStore::new(conn);
    store.save_snapshot(&snapshot)?;
    println!(
        "Synced {} grouped transaction(s) across {} group(s), {} known email(s)",
        snapshot.transactions.len(),
        snapshot.groups.len(),
        snapshot.user_emails.len()
    );
    Ok(())
}

fn fetch_snapshot(url: &str) -> Result<Snapshot> {
    let client = http_client()?;
    let resp = client.get(url).send()?.error_for_status()?;
    let s: Snapshot = resp.json().context("Malformed snapshot response")?;
    Ok(s)
}

fn read_snapshot(path: &str) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Read snapshot from {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Malformed snapshot in {}", path))
}
