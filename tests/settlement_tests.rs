// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rust_decimal::Decimal;
use splitclip::models::{ExpandedTransaction, GroupedTransaction, ParticipantShare};
use splitclip::settlement::{
    RecordError, compute_counterparty_breakdown, compute_group_balance, validate_grouped,
};
use std::collections::HashMap;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn grouped(group: &str, payer: &str, owing: &[&str], per_person: &str) -> GroupedTransaction {
    GroupedTransaction {
        group_id: group.to_string(),
        payer_id: payer.to_string(),
        owing_participant_ids: owing.iter().map(|s| s.to_string()).collect(),
        amount_per_person: dec(per_person),
        total_amount: dec(per_person) * Decimal::from(owing.len()),
        created_at: Utc::now(),
        transaction_ids: vec![],
    }
}

fn expanded(payer: &str, shares: &[(&str, &str)]) -> ExpandedTransaction {
    ExpandedTransaction {
        payer_id: payer.to_string(),
        participants: shares
            .iter()
            .map(|(id, amt)| ParticipantShare {
                user_id: id.to_string(),
                amount_owed: dec(amt),
            })
            .collect(),
    }
}

#[test]
fn payer_is_owed_per_person_times_owers() {
    // U1 fronts for U2 and U3 at 10 each
    let txs = vec![grouped("g1", "u1", &["u2", "u3"], "10")];
    assert_eq!(compute_group_balance("g1", "u1", &txs), dec("20"));
    assert_eq!(compute_group_balance("g1", "u2", &txs), dec("-10"));
    assert_eq!(compute_group_balance("g1", "u3", &txs), dec("-10"));
}

#[test]
fn empty_group_is_exactly_zero() {
    let txs = vec![grouped("g1", "u1", &["u2"], "10")];
    assert_eq!(compute_group_balance("g2", "u1", &txs), Decimal::ZERO);
    assert_eq!(compute_group_balance("g2", "u1", &[]), Decimal::ZERO);
}

#[test]
fn filters_by_group_itself() {
    let txs = vec![
        grouped("g1", "u1", &["u2"], "10"),
        grouped("g2", "u2", &["u1"], "7"),
    ];
    assert_eq!(compute_group_balance("g1", "u1", &txs), dec("10"));
    assert_eq!(compute_group_balance("g2", "u1", &txs), dec("-7"));
}

#[test]
fn two_party_conservation() {
    let txs = vec![
        grouped("g1", "u1", &["u2"], "12.50"),
        grouped("g1", "u2", &["u1"], "4.25"),
        grouped("g1", "u1", &["u2"], "0.75"),
    ];
    let a = compute_group_balance("g1", "u1", &txs);
    let b = compute_group_balance("g1", "u2", &txs);
    assert_eq!(a + b, Decimal::ZERO);
    assert_eq!(a, dec("9"));
}

#[test]
fn balance_is_idempotent() {
    let txs = vec![grouped("g1", "u1", &["u2", "u3", "u4"], "3.33")];
    let first = compute_group_balance("g1", "u1", &txs);
    let second = compute_group_balance("g1", "u1", &txs);
    assert_eq!(first, second);
    assert_eq!(first, dec("9.99"));
}

#[test]
fn malformed_record_counts_once_as_payer() {
    // Violates the payer-not-owing invariant; the payer branch must win
    // rather than double-counting.
    let txs = vec![grouped("g1", "u1", &["u1", "u2"], "10")];
    assert_eq!(compute_group_balance("g1", "u1", &txs), dec("20"));
}

#[test]
fn breakdown_both_directions_counted() {
    // U1 fronted 10 each for U2/U3; U2 fronted 10 each for U1/U3
    let txs = vec![
        expanded("u1", &[("u1", "0"), ("u2", "10"), ("u3", "10")]),
        expanded("u2", &[("u2", "0"), ("u1", "10"), ("u3", "10")]),
    ];
    let out = compute_counterparty_breakdown("u1", &txs, &HashMap::new());
    // u2 nets to zero and is suppressed; u3 owes 10
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].user_id, "u3");
    assert_eq!(out[0].net_amount, dec("10"));
}

#[test]
fn breakdown_scenario_payer_view() {
    let txs = vec![expanded("u1", &[("u1", "0"), ("u2", "10"), ("u3", "10")])];
    let out = compute_counterparty_breakdown("u1", &txs, &HashMap::new());
    assert_eq!(out.len(), 2);
    // Equal magnitudes tie-break deterministically by user id
    assert_eq!(out[0].user_id, "u2");
    assert_eq!(out[1].user_id, "u3");
    assert!(out.iter().all(|b| b.net_amount == dec("10")));
}

#[test]
fn breakdown_scenario_ower_view() {
    // U2 pays 30 split three ways; U2's own share carries zero owed
    let txs = vec![expanded("u2", &[("u1", "10"), ("u2", "0"), ("u3", "10")])];
    let out = compute_counterparty_breakdown("u1", &txs, &HashMap::new());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].user_id, "u2");
    assert_eq!(out[0].net_amount, dec("-10"));
}

#[test]
fn breakdown_empty_input_is_empty() {
    let out = compute_counterparty_breakdown("u1", &[], &HashMap::new());
    assert!(out.is_empty());
}

#[test]
fn breakdown_nets_opposite_directions() {
    // u1 owes u2 8, u2 owes u1 5 -> u1 owes u2 3 net
    let txs = vec![
        expanded("u2", &[("u2", "0"), ("u1", "8")]),
        expanded("u1", &[("u1", "0"), ("u2", "5")]),
    ];
    let out = compute_counterparty_breakdown("u1", &txs, &HashMap::new());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].user_id, "u2");
    assert_eq!(out[0].net_amount, dec("-3"));
}

#[test]
fn breakdown_never_includes_self() {
    let txs = vec![
        expanded("u1", &[("u1", "0"), ("u2", "10")]),
        expanded("u2", &[("u2", "0"), ("u1", "4")]),
    ];
    let out = compute_counterparty_breakdown("u1", &txs, &HashMap::new());
    assert!(out.iter().all(|b| b.user_id != "u1"));
}

#[test]
fn breakdown_suppresses_settled_dust() {
    let txs = vec![
        expanded("u2", &[("u2", "0"), ("u1", "10.00005")]),
        expanded("u1", &[("u1", "0"), ("u2", "10")]),
    ];
    // |net| = 0.00005 <= epsilon, dropped
    let out = compute_counterparty_breakdown("u1", &txs, &HashMap::new());
    assert!(out.is_empty());
}

#[test]
fn breakdown_sorts_owed_first_then_magnitude() {
    let txs = vec![
        expanded("u2", &[("u2", "0"), ("u1", "20")]),
        expanded("u3", &[("u3", "0"), ("u1", "5")]),
        expanded("u1", &[("u1", "0"), ("u4", "12"), ("u5", "3")]),
    ];
    let out = compute_counterparty_breakdown("u1", &txs, &HashMap::new());
    let order: Vec<&str> = out.iter().map(|b| b.user_id.as_str()).collect();
    // Negative (you owe) ascending first, then positive
    assert_eq!(order, vec!["u2", "u3", "u5", "u4"]);
    for pair in out.windows(2) {
        assert!(pair[0].net_amount <= pair[1].net_amount);
    }
}

#[test]
fn breakdown_resolves_names_from_directory() {
    let mut emails = HashMap::new();
    emails.insert("u2".to_string(), "ben@campus.edu".to_string());
    let txs = vec![expanded(
        "u1",
        &[
            ("u1", "0"),
            ("u2", "10"),
            ("11112222-3333-4444-5555-666677778888", "10"),
        ],
    )];
    let out = compute_counterparty_breakdown("u1", &txs, &emails);
    let by_id: HashMap<_, _> = out
        .iter()
        .map(|b| (b.user_id.as_str(), b.display_name.as_str()))
        .collect();
    assert_eq!(by_id["u2"], "ben@campus.edu");
    // Unknown ids are truncated for display
    assert_eq!(by_id["11112222-3333-4444-5555-666677778888"], "11112222…");
}

#[test]
fn validate_rejects_invariant_violations() {
    let mut tx = grouped("g1", "u1", &["u1", "u2"], "10");
    assert_eq!(
        validate_grouped(&tx),
        Err(RecordError::PayerOwesSelf {
            payer_id: "u1".to_string()
        })
    );

    tx = grouped("g1", "u1", &["u2"], "0");
    assert!(matches!(
        validate_grouped(&tx),
        Err(RecordError::NonPositiveAmount { .. })
    ));

    tx = grouped("g1", "u1", &[], "10");
    assert_eq!(validate_grouped(&tx), Err(RecordError::NoParticipants));

    tx = grouped("g1", "u1", &["u2", "u3"], "10");
    assert!(validate_grouped(&tx).is_ok());
}
