// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let email = sub.get_one::<String>("email").map(|s| s.trim().to_string());
    conn.execute(
        "INSERT INTO users(user_id, email) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET email=excluded.email",
        params![id, email],
    )?;
    match email {
        Some(e) => println!("Recorded {} ({})", id, e),
        None => println!("Recorded {}", id),
    }
    Ok(())
}

#[derive(Serialize)]
struct UserRow {
    user_id: String,
    email: Option<String>,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare("SELECT user_id, email FROM users ORDER BY user_id")?;
    let mut cur = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        data.push(UserRow {
            user_id: r.get(0)?,
            email: r.get(1)?,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|u| vec![u.user_id.clone(), u.email.clone().unwrap_or_default()])
            .collect();
        println!("{}", pretty_table(&["User", "Email"], rows));
    }
    Ok(())
}
