// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "splitclip/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/splitclip)"
);

static GROUP_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{6}$").unwrap());

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Locale-style absolute amount with currency symbol. Direction ("you owe" /
/// "owes you") is conveyed by surrounding text, never by the sign here.
pub fn format_currency(amount: Decimal) -> String {
    let abs = amount.abs().round_dp(2);
    let s = format!("{:.2}", abs);
    let (whole, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${}.{}", grouped, frac)
}

pub fn is_valid_group_code(code: &str) -> bool {
    GROUP_CODE_RE.is_match(code)
}

/// Six base-36 characters derived from the group name and the current time.
/// Not cryptographic; collisions are rejected by the unique constraint.
pub fn generate_group_code(seed: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    seed.hash(&mut hasher);
    Utc::now().timestamp_nanos_opt().hash(&mut hasher);
    let mut n = hasher.finish();
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut code = String::with_capacity(6);
    for _ in 0..6 {
        code.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    code
}

/// Sixteen hex characters for a new group id, hashed from the name and the
/// current time. Collaborator-assigned ids (UUIDs) pass through untouched.
pub fn generate_group_id(seed: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    seed.hash(&mut hasher);
    Utc::now().timestamp_nanos_opt().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Resolve a group argument given either as an id, a name, or a join code.
pub fn id_for_group(conn: &Connection, name_or_code: &str) -> Result<String> {
    let direct: Option<String> = conn
        .query_row(
            "SELECT group_id FROM groups WHERE group_id=?1 OR group_name=?1 OR group_code=?1",
            params![name_or_code],
            |r| r.get(0),
        )
        .optional()?;
    direct.with_context(|| format!("Group '{}' not found", name_or_code))
}

pub fn fmt_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
