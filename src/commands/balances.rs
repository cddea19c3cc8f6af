// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CounterpartyBalance, GroupBalance};
use crate::settlement::{SETTLED_EPSILON, compute_counterparty_breakdown, compute_group_balance};
use crate::store::{SqliteStore, TransactionStore, expand_grouped};
use crate::utils::{format_currency, id_for_group, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Net balance per group for one user, the summary list view.
pub fn summary_for_user(conn: &Connection, user_id: &str) -> Result<Vec<GroupBalance>> {
    let store = SqliteStore::new(conn);
    let snapshot = store.load_snapshot(user_id)?;
    let mut out = Vec::new();
    for group in &snapshot.groups {
        let net = compute_group_balance(&group.group_id, user_id, &snapshot.transactions);
        out.push(GroupBalance {
            group_id: group.group_id.clone(),
            group_name: group
                .group_information
                .as_ref()
                .map(|i| i.group_name.clone())
                .unwrap_or_else(|| group.group_id.clone()),
            net_amount: net,
        });
    }
    Ok(out)
}

/// Who-owes-whom within one group for one user, the detail view.
pub fn breakdown_for_user(
    conn: &Connection,
    group_id: &str,
    user_id: &str,
) -> Result<Vec<CounterpartyBalance>> {
    let store = SqliteStore::new(conn);
    let grouped = store.grouped_transactions_for_group(group_id)?;
    let expanded: Vec<_> = grouped.iter().map(expand_grouped).collect();
    let emails = store.user_emails()?;
    Ok(compute_counterparty_breakdown(user_id, &expanded, &emails))
}

fn position(net: Decimal) -> &'static str {
    if net.abs() <= *SETTLED_EPSILON {
        "settled"
    } else if net > Decimal::ZERO {
        "owed to you"
    } else {
        "you owe"
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap().trim();
    let data = summary_for_user(conn, user)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.group_name.clone(),
                    format_currency(b.net_amount),
                    position(b.net_amount).to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Group", "Amount", "Position"], rows));
    }
    Ok(())
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let group_id = id_for_group(conn, sub.get_one::<String>("group").unwrap())?;
    let user = sub.get_one::<String>("user").unwrap().trim();
    let data = breakdown_for_user(conn, &group_id, user)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("All settled up in group {}", group_id);
            return Ok(());
        }
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.display_name.clone(),
                    format_currency(b.net_amount),
                    if b.net_amount < Decimal::ZERO {
                        format!("you owe {}", b.display_name)
                    } else {
                        format!("{} owes you", b.display_name)
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Counterparty", "Amount", "Direction"], rows)
        );
    }
    Ok(())
}
