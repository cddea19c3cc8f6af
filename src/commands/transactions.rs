// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::SqliteStore;
use crate::utils::{fmt_timestamp, format_currency, id_for_group, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = id_for_group(conn, sub.get_one::<String>("group").unwrap())?;
    let payer = sub.get_one::<String>("payer").unwrap().trim().to_string();
    let total = parse_decimal(sub.get_one::<String>("total").unwrap().trim())?;
    let mut participants: Vec<String> = sub
        .get_one::<String>("participants")
        .unwrap()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    participants.sort();
    participants.dedup();

    if total <= Decimal::ZERO {
        bail!("Total must be positive, got {}", total);
    }
    if participants.is_empty() {
        bail!("At least one co-owing participant is required");
    }
    if participants.iter().any(|p| p == &payer) {
        bail!("Payer '{}' must not be in the participant list", payer);
    }

    // Even split over payer + participants; the payer's own share is not owed.
    let head_count = Decimal::from(participants.len() + 1);
    let per_person = (total / head_count).round_dp(2);

    for ower in &participants {
        conn.execute(
            "INSERT INTO transactions(group_id, user_owed, user_owing, amount) VALUES (?1, ?2, ?3, ?4)",
            params![group_id, payer, ower, per_person.to_string()],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO group_members(group_id, user_id) VALUES (?1, ?2)",
            params![group_id, ower],
        )?;
    }
    conn.execute(
        "INSERT OR IGNORE INTO group_members(group_id, user_id) VALUES (?1, ?2)",
        params![group_id, payer],
    )?;
    println!(
        "Recorded {} paid by {}, {} each from {} participant(s)",
        format_currency(total),
        payer,
        format_currency(per_person),
        participants.len()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let group_id = id_for_group(conn, sub.get_one::<String>("group").unwrap())?;
    let store = SqliteStore::new(conn);
    let data = store.grouped_transactions_for_group(&group_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|t| {
                vec![
                    fmt_timestamp(&t.created_at),
                    t.payer_id.clone(),
                    t.owing_participant_ids.join(", "),
                    format_currency(t.amount_per_person),
                    format_currency(t.total_amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Created", "Payer", "Owes", "Per person", "Total"], rows)
        );
    }
    Ok(())
}
