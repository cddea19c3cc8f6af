// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::balances::breakdown_for_user;
use crate::utils::{format_currency, id_for_group};
use anyhow::Result;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

/// Settling up clears the ledger rows between the pair, in both directions.
/// The next recomputation then shows the pair at zero.
pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let group_id = id_for_group(conn, m.get_one::<String>("group").unwrap())?;
    let user = m.get_one::<String>("user").unwrap().trim();
    let counterparty = m.get_one::<String>("with").unwrap().trim();

    let breakdown = breakdown_for_user(conn, &group_id, user)?;
    let Some(entry) = breakdown.iter().find(|b| b.user_id == counterparty) else {
        println!("Nothing to settle between {} and {}", user, counterparty);
        return Ok(());
    };

    let amount = entry.net_amount.abs();
    let (debtor, creditor) = if entry.net_amount < Decimal::ZERO {
        (user, counterparty)
    } else {
        (counterparty, user)
    };
    let removed = conn.execute(
        "DELETE FROM transactions WHERE group_id=?1
         AND ((user_owed=?2 AND user_owing=?3) OR (user_owed=?3 AND user_owing=?2))",
        params![group_id, user, counterparty],
    )?;
    println!(
        "Settled {} ({} pays {}); cleared {} ledger row(s)",
        format_currency(amount),
        debtor,
        creditor,
        removed
    );
    Ok(())
}
