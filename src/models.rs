// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One raw ledger row: a single payer->ower pair carved out of a shared
/// expense. Matches the collaborator's `transactions` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub transaction_id: i64,
    pub group_id: String,
    pub user_owed: String,
    pub user_owing: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One settled split-expense event, aggregated from raw ledger rows by
/// (group, payer, amount-per-person). The payer is never in the owing set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedTransaction {
    pub group_id: String,
    pub payer_id: String,
    pub owing_participant_ids: Vec<String>,
    pub amount_per_person: Decimal,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub transaction_ids: Vec<i64>,
}

/// One participant's share of an expanded transaction. The payer carries a
/// zero `amount_owed` row of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantShare {
    pub user_id: String,
    pub amount_owed: Decimal,
}

/// A grouped transaction expanded to one share per participant, the shape the
/// who-owes-whom resolver consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandedTransaction {
    pub payer_id: String,
    pub participants: Vec<ParticipantShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupInformation {
    pub group_name: String,
    pub group_code: String,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub group_id: String,
    pub group_information: Option<GroupInformation>,
}

/// Net position of one user within one group. Positive: the user is owed
/// money. Negative: the user owes money. Derived, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct GroupBalance {
    pub group_id: String,
    pub group_name: String,
    pub net_amount: Decimal,
}

/// Netted position against a single counterparty within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyBalance {
    pub user_id: String,
    pub display_name: String,
    pub net_amount: Decimal,
}

/// Response shape of the transaction-retrieval collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<GroupedTransaction>,
    #[serde(default)]
    pub transactions_by_group: HashMap<String, Vec<GroupedTransaction>>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub user_emails: HashMap<String, String>,
}
