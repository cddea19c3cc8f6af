// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CounterpartyBalance, ExpandedTransaction, GroupedTransaction};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// Balances at or below this magnitude are considered settled and dropped
/// from counterparty breakdowns.
pub static SETTLED_EPSILON: Lazy<Decimal> = Lazy::new(|| Decimal::new(1, 4)); // 0.0001

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("payer '{payer_id}' appears in its own owing list")]
    PayerOwesSelf { payer_id: String },
    #[error("amount per person must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
    #[error("owing participant list is empty")]
    NoParticipants,
}

/// Boundary check for a grouped record before it enters balance math.
/// Records that fail are quarantined by the store, never aggregated.
pub fn validate_grouped(tx: &GroupedTransaction) -> Result<(), RecordError> {
    if tx.owing_participant_ids.is_empty() {
        return Err(RecordError::NoParticipants);
    }
    if tx.amount_per_person <= Decimal::ZERO {
        return Err(RecordError::NonPositiveAmount {
            amount: tx.amount_per_person,
        });
    }
    if tx.owing_participant_ids.iter().any(|id| id == &tx.payer_id) {
        return Err(RecordError::PayerOwesSelf {
            payer_id: tx.payer_id.clone(),
        });
    }
    Ok(())
}

/// Net balance of `user_id` within `group_id` across the full transaction
/// list (filtering by group is this function's job, not the caller's).
/// Positive means the user is owed money.
///
/// The payer and ower branches are exclusive: a record violating the
/// payer-not-owing invariant counts once as payer rather than twice.
pub fn compute_group_balance(
    group_id: &str,
    user_id: &str,
    transactions: &[GroupedTransaction],
) -> Decimal {
    let mut balance = Decimal::ZERO;
    for tx in transactions.iter().filter(|t| t.group_id == group_id) {
        if tx.payer_id == user_id {
            balance += tx.amount_per_person * Decimal::from(tx.owing_participant_ids.len());
        } else if tx.owing_participant_ids.iter().any(|id| id == user_id) {
            balance -= tx.amount_per_person;
        }
    }
    balance
}

/// Who-owes-whom for `user_id` over one group's expanded transactions.
/// One entry per counterparty with a nonzero netted amount; entries at or
/// below the settled epsilon are dropped. The user never appears as their
/// own counterparty.
///
/// Sort contract (surface "you owe" first): ascending by signed amount,
/// ties by descending magnitude, then by user id so equal-magnitude ties
/// are deterministic.
pub fn compute_counterparty_breakdown(
    user_id: &str,
    transactions: &[ExpandedTransaction],
    emails: &HashMap<String, String>,
) -> Vec<CounterpartyBalance> {
    let mut balances: HashMap<String, Decimal> = HashMap::new();
    for tx in transactions {
        let owing: Vec<_> = tx
            .participants
            .iter()
            .filter(|p| p.amount_owed > Decimal::ZERO)
            .collect();
        if tx.payer_id == user_id {
            for p in owing {
                *balances.entry(p.user_id.clone()).or_default() += p.amount_owed;
            }
        } else if let Some(me) = owing.iter().find(|p| p.user_id == user_id) {
            *balances.entry(tx.payer_id.clone()).or_default() -= me.amount_owed;
        }
    }

    let mut out: Vec<CounterpartyBalance> = balances
        .into_iter()
        .filter(|(_, amount)| amount.abs() > *SETTLED_EPSILON)
        .map(|(counterparty_id, net_amount)| CounterpartyBalance {
            display_name: display_name(&counterparty_id, emails),
            user_id: counterparty_id,
            net_amount,
        })
        .collect();
    out.sort_by(|a, b| {
        a.net_amount
            .cmp(&b.net_amount)
            .then_with(|| b.net_amount.abs().cmp(&a.net_amount.abs()))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    out
}

/// Email if the directory knows the user, else a truncated id.
pub fn display_name(user_id: &str, emails: &HashMap<String, String>) -> String {
    if let Some(email) = emails.get(user_id) {
        return email.clone();
    }
    if user_id.chars().count() > 8 {
        let head: String = user_id.chars().take(8).collect();
        format!("{}…", head)
    } else {
        user_id.to_string()
    }
}
