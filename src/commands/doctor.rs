// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Self-owing rows: the payer must never owe themself
    let mut stmt = conn.prepare(
        "SELECT transaction_id, user_owed FROM transactions WHERE user_owed=user_owing",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let who: String = r.get(1)?;
        rows.push(vec!["payer_owes_self".into(), format!("tx {} ({})", id, who)]);
    }

    // 2) Non-positive or unparseable amounts
    let mut stmt2 = conn.prepare("SELECT transaction_id, amount FROM transactions")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        match amount_s.parse::<Decimal>() {
            Ok(a) if a > Decimal::ZERO => {}
            Ok(a) => rows.push(vec!["non_positive_amount".into(), format!("tx {}: {}", id, a)]),
            Err(_) => rows.push(vec!["bad_amount".into(), format!("tx {}: '{}'", id, amount_s)]),
        }
    }

    // 3) Transactions pointing at unknown groups
    let mut stmt3 = conn.prepare(
        "SELECT DISTINCT group_id FROM transactions
         EXCEPT SELECT group_id FROM groups",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let g: String = r.get(0)?;
        rows.push(vec!["unknown_group".into(), g]);
    }

    // 4) Users on the ledger but missing from the group's member list
    let mut stmt4 = conn.prepare(
        "SELECT DISTINCT u.group_id, u.user_id FROM (
             SELECT group_id, user_owed AS user_id FROM transactions
             UNION SELECT group_id, user_owing FROM transactions
         ) u
         WHERE NOT EXISTS (
             SELECT 1 FROM group_members m WHERE m.group_id=u.group_id AND m.user_id=u.user_id
         )",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let g: String = r.get(0)?;
        let u: String = r.get(1)?;
        rows.push(vec!["member_missing".into(), format!("{} in group {}", u, g)]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        rows.sort();
        rows.dedup();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
