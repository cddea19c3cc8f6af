// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::balances::summary_for_user;
use crate::store::SqliteStore;
use crate::utils::{fmt_timestamp, id_for_group};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("balances", sub)) => export_balances(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let group_id = id_for_group(conn, sub.get_one::<String>("group").unwrap())?;

    let store = SqliteStore::new(conn);
    let data = store.grouped_transactions_for_group(&group_id)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "created_at",
                "group_id",
                "payer_id",
                "owing_participants",
                "amount_per_person",
                "total_amount",
                "transaction_ids",
            ])?;
            for t in &data {
                wtr.write_record([
                    fmt_timestamp(&t.created_at),
                    t.group_id.clone(),
                    t.payer_id.clone(),
                    t.owing_participant_ids.join("|"),
                    t.amount_per_person.to_string(),
                    t.total_amount.to_string(),
                    t.transaction_ids
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join("|"),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let user = sub.get_one::<String>("user").unwrap().trim();

    let data = summary_for_user(conn, user)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["group_id", "group_name", "net_amount"])?;
            for b in &data {
                wtr.write_record([
                    b.group_id.clone(),
                    b.group_name.clone(),
                    b.net_amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = data
                .iter()
                .map(|b| {
                    json!({
                        "group_id": b.group_id,
                        "group_name": b.group_name,
                        "net_amount": b.net_amount,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported balances to {}", out);
    Ok(())
}
