// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use splitclip::{cli, commands, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO groups(group_id, group_name, group_code, created_by)
         VALUES ('g1', 'Road Trip', 'ROAD01', 'u1')",
        [],
    )
    .unwrap();
    for user in ["u1", "u2"] {
        conn.execute(
            "INSERT INTO group_members(group_id, user_id) VALUES ('g1', ?1)",
            params![user],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO transactions(group_id, user_owed, user_owing, amount)
         VALUES ('g1', 'u1', 'u2', '25.50')",
        [],
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, argv: &[&str]) {
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", sub)) = matches.subcommand() {
        commands::exporter::handle(conn, sub).unwrap();
    } else {
        panic!("export command not parsed");
    }
}

#[test]
fn exports_grouped_transactions_to_csv() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("txs.csv");
    let out_s = out.to_str().unwrap();

    run(
        &conn,
        &[
            "splitclip", "export", "transactions", "--group", "g1", "--format", "csv", "--out",
            out_s,
        ],
    );

    let contents = std::fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "created_at,group_id,payer_id,owing_participants,amount_per_person,total_amount,transaction_ids"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("g1,u1,u2,25.50,25.50"));
    assert!(lines.next().is_none());
}

#[test]
fn exports_balances_to_json() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("balances.json");
    let out_s = out.to_str().unwrap();

    run(
        &conn,
        &[
            "splitclip", "export", "balances", "--user", "u2", "--format", "json", "--out", out_s,
        ],
    );

    let contents = std::fs::read_to_string(&out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["group_name"], "Road Trip");
    assert_eq!(arr[0]["net_amount"], "-25.50");
}
