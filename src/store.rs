// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    ExpandedTransaction, Group, GroupInformation, GroupedTransaction, ParticipantShare,
    RawTransaction, Snapshot,
};
use crate::settlement::validate_grouped;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Repository seam between the settlement core and whatever holds the
/// ledger. Commands receive an implementation, never a global.
pub trait TransactionStore {
    /// Everything the balance views need for one user: their groups, the
    /// grouped transactions per group, and the email directory.
    fn load_snapshot(&self, user_id: &str) -> Result<Snapshot>;
    /// Upsert a collaborator snapshot into local storage.
    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// Aggregate raw payer->ower rows into grouped transactions, keyed by
/// (group, payer, amount-per-person). Owing sets are deduplicated and kept
/// sorted so output is deterministic; created_at is the earliest merged row.
pub fn group_raw_transactions(rows: &[RawTransaction]) -> Vec<GroupedTransaction> {
    let mut buckets: BTreeMap<(String, String, Decimal), GroupedTransaction> = BTreeMap::new();
    for row in rows {
        let key = (row.group_id.clone(), row.user_owed.clone(), row.amount);
        let tx = buckets.entry(key).or_insert_with(|| GroupedTransaction {
            group_id: row.group_id.clone(),
            payer_id: row.user_owed.clone(),
            owing_participant_ids: Vec::new(),
            amount_per_person: row.amount,
            total_amount: Decimal::ZERO,
            created_at: row.created_at,
            transaction_ids: Vec::new(),
        });
        if !tx.owing_participant_ids.contains(&row.user_owing) {
            tx.owing_participant_ids.push(row.user_owing.clone());
        }
        tx.transaction_ids.push(row.transaction_id);
        if row.created_at < tx.created_at {
            tx.created_at = row.created_at;
        }
    }
    let mut out: Vec<GroupedTransaction> = buckets
        .into_values()
        .map(|mut tx| {
            tx.owing_participant_ids.sort();
            tx.transaction_ids.sort_unstable();
            tx.total_amount =
                tx.amount_per_person * Decimal::from(tx.owing_participant_ids.len());
            tx
        })
        .collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    out
}

/// Expand a grouped transaction to one share per participant. The payer
/// carries a zero share of their own, matching the collaborator's expanded
/// row shape.
pub fn expand_grouped(tx: &GroupedTransaction) -> ExpandedTransaction {
    let mut participants = vec![ParticipantShare {
        user_id: tx.payer_id.clone(),
        amount_owed: Decimal::ZERO,
    }];
    for id in &tx.owing_participant_ids {
        participants.push(ParticipantShare {
            user_id: id.clone(),
            amount_owed: tx.amount_per_person,
        });
    }
    ExpandedTransaction {
        payer_id: tx.payer_id.clone(),
        participants,
    }
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SqliteStore { conn }
    }

    pub fn raw_transactions_for_group(&self, group_id: &str) -> Result<Vec<RawTransaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id, group_id, user_owed, user_owing, amount, created_at
             FROM transactions WHERE group_id=?1 ORDER BY transaction_id",
        )?;
        let mut rows = stmt.query(params![group_id])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let amount_s: String = r.get(4)?;
            let created_s: String = r.get(5)?;
            out.push(RawTransaction {
                transaction_id: r.get(0)?,
                group_id: r.get(1)?,
                user_owed: r.get(2)?,
                user_owing: r.get(3)?,
                amount: amount_s
                    .parse::<Decimal>()
                    .with_context(|| format!("Invalid amount '{}' in group {}", amount_s, group_id))?,
                created_at: parse_db_timestamp(&created_s),
            });
        }
        Ok(out)
    }

    /// Grouped transactions for one group, with invariant-violating records
    /// quarantined before they can reach balance math.
    pub fn grouped_transactions_for_group(&self, group_id: &str) -> Result<Vec<GroupedTransaction>> {
        let raw = self.raw_transactions_for_group(group_id)?;
        let mut kept = Vec::new();
        for tx in group_raw_transactions(&raw) {
            match validate_grouped(&tx) {
                Ok(()) => kept.push(tx),
                Err(e) => eprintln!(
                    "warning: quarantined grouped transaction in group {} ({})",
                    group_id, e
                ),
            }
        }
        Ok(kept)
    }

    pub fn member_group_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT group_id FROM group_members WHERE user_id=?1 ORDER BY group_id")?;
        let rows = stmt.query_map(params![user_id], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn user_emails(&self) -> Result<HashMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, email FROM users WHERE email IS NOT NULL")?;
        let rows = stmt.query_map([], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut out = HashMap::new();
        for r in rows {
            let (id, email) = r?;
            out.insert(id, email);
        }
        Ok(out)
    }

    fn group_by_id(&self, group_id: &str) -> Result<Group> {
        let info = self
            .conn
            .query_row(
                "SELECT group_name, group_code, created_by FROM groups WHERE group_id=?1",
                params![group_id],
                |r| {
                    Ok(GroupInformation {
                        group_name: r.get(0)?,
                        group_code: r.get(1)?,
                        created_by: r.get(2)?,
                    })
                },
            )
            .with_context(|| format!("Group '{}' not found", group_id))?;
        Ok(Group {
            group_id: group_id.to_string(),
            group_information: Some(info),
        })
    }
}

fn parse_db_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|n| n.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

impl TransactionStore for SqliteStore<'_> {
    fn load_snapshot(&self, user_id: &str) -> Result<Snapshot> {
        let mut snapshot = Snapshot {
            user_emails: self.user_emails()?,
            ..Default::default()
        };
        for group_id in self.member_group_ids(user_id)? {
            let grouped = self.grouped_transactions_for_group(&group_id)?;
            snapshot.groups.push(self.group_by_id(&group_id)?);
            snapshot.transactions.extend(grouped.iter().cloned());
            snapshot.transactions_by_group.insert(group_id, grouped);
        }
        Ok(snapshot)
    }

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        for group in &snapshot.groups {
            if let Some(info) = &group.group_information {
                self.conn.execute(
                    "INSERT INTO groups(group_id, group_name, group_code, created_by)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(group_id) DO UPDATE SET
                         group_name=excluded.group_name,
                         group_code=excluded.group_code,
                         created_by=excluded.created_by",
                    params![
                        group.group_id,
                        info.group_name,
                        info.group_code,
                        info.created_by
                    ],
                )?;
            }
        }
        for (user_id, email) in &snapshot.user_emails {
            self.conn.execute(
                "INSERT INTO users(user_id, email) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET email=excluded.email",
                params![user_id, email],
            )?;
        }
        for tx in &snapshot.transactions {
            validate_grouped(tx)
                .with_context(|| format!("Rejected grouped transaction in group {}", tx.group_id))?;
            for (i, ower) in tx.owing_participant_ids.iter().enumerate() {
                // Reuse the collaborator's row ids when it sent them, one per ower.
                let id = tx.transaction_ids.get(i).copied();
                self.conn.execute(
                    "INSERT OR REPLACE INTO transactions(transaction_id, group_id, user_owed, user_owing, amount, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        id,
                        tx.group_id,
                        tx.payer_id,
                        ower,
                        tx.amount_per_person.to_string(),
                        tx.created_at.to_rfc3339()
                    ],
                )?;
                for member in [&tx.payer_id, ower] {
                    self.conn.execute(
                        "INSERT OR IGNORE INTO group_members(group_id, user_id) VALUES (?1, ?2)",
                        params![tx.group_id, member],
                    )?;
                }
            }
        }
        Ok(())
    }
}
