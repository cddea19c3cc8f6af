// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{generate_group_code, generate_group_id, id_for_group, is_valid_group_code, maybe_print_json, pretty_table};
use anyhow::{Context, Result, bail};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("join", sub)) => join(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("members", sub)) => members(conn, sub)?,
        Some(("add-member", sub)) => add_member(conn, sub)?,
        Some(("remove-member", sub)) => remove_member(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn create(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let user = sub.get_one::<String>("user").unwrap().trim().to_string();
    if name.is_empty() {
        bail!("Group name must not be empty");
    }
    let group_id = generate_group_id(&name);
    let code = generate_group_code(&name);
    conn.execute(
        "INSERT INTO groups(group_id, group_name, group_code, created_by) VALUES (?1, ?2, ?3, ?4)",
        params![group_id, name, code, user],
    )
    .with_context(|| format!("Create group '{}'", name))?;
    conn.execute(
        "INSERT INTO group_members(group_id, user_id) VALUES (?1, ?2)",
        params![group_id, user],
    )?;
    println!("Created group '{}' (id: {}, join code: {})", name, group_id, code);
    Ok(())
}

fn join(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
    let user = sub.get_one::<String>("user").unwrap().trim().to_string();
    if !is_valid_group_code(&code) {
        bail!("Invalid join code '{}', expected 6 characters A-Z/0-9", code);
    }
    let found: Option<(String, String)> = conn
        .query_row(
            "SELECT group_id, group_name FROM groups WHERE group_code=?1",
            params![code],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let (group_id, group_name) =
        found.with_context(|| format!("No group with join code '{}'", code))?;
    conn.execute(
        "INSERT OR IGNORE INTO group_members(group_id, user_id) VALUES (?1, ?2)",
        params![group_id, user],
    )?;
    println!("{} joined '{}'", user, group_name);
    Ok(())
}

#[derive(Serialize)]
struct GroupRow {
    group_id: String,
    group_name: String,
    group_code: String,
    created_by: String,
    members: i64,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT g.group_id, g.group_name, g.group_code, g.created_by,
                (SELECT COUNT(*) FROM group_members m WHERE m.group_id=g.group_id)
         FROM groups g ORDER BY g.group_name",
    )?;
    let mut cur = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        data.push(GroupRow {
            group_id: r.get(0)?,
            group_name: r.get(1)?,
            group_code: r.get(2)?,
            created_by: r.get(3)?,
            members: r.get(4)?,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|g| {
                vec![
                    g.group_name.clone(),
                    g.group_id.clone(),
                    g.group_code.clone(),
                    g.created_by.clone(),
                    g.members.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Id", "Code", "Created by", "Members"], rows)
        );
    }
    Ok(())
}

fn members(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = id_for_group(conn, sub.get_one::<String>("group").unwrap())?;
    let mut stmt = conn.prepare(
        "SELECT m.user_id, IFNULL(u.email, ''), m.joined_at
         FROM group_members m LEFT JOIN users u ON u.user_id=m.user_id
         WHERE m.group_id=?1 ORDER BY m.user_id",
    )?;
    let mut cur = stmt.query(params![group_id])?;
    let mut rows = Vec::new();
    while let Some(r) = cur.next()? {
        rows.push(vec![
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ]);
    }
    println!("{}", pretty_table(&["User", "Email", "Joined"], rows));
    Ok(())
}

fn add_member(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = id_for_group(conn, sub.get_one::<String>("group").unwrap())?;
    let user = sub.get_one::<String>("user").unwrap().trim().to_string();
    conn.execute(
        "INSERT OR IGNORE INTO group_members(group_id, user_id) VALUES (?1, ?2)",
        params![group_id, user],
    )?;
    println!("Added {} to group {}", user, group_id);
    Ok(())
}

fn remove_member(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = id_for_group(conn, sub.get_one::<String>("group").unwrap())?;
    let user = sub.get_one::<String>("user").unwrap().trim().to_string();
    let n = conn.execute(
        "DELETE FROM group_members WHERE group_id=?1 AND user_id=?2",
        params![group_id, user],
    )?;
    if n == 0 {
        println!("{} was not a member of group {}", user, group_id);
    } else {
        println!("Removed {} from group {}", user, group_id);
    }
    Ok(())
}
