// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print results as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print results as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("splitclip")
        .version(crate_version!())
        .about("Group expense splitting, settlement, and who-owes-whom")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("group")
                .about("Manage expense groups and memberships")
                .subcommand(
                    Command::new("create")
                        .about("Create a group with a generated join code")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("user").long("user").required(true).help("Creator user id")),
                )
                .subcommand(
                    Command::new("join")
                        .about("Join a group by its join code")
                        .arg(Arg::new("code").long("code").required(true))
                        .arg(Arg::new("user").long("user").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List known groups"),
                ))
                .subcommand(
                    Command::new("members")
                        .about("List members of a group")
                        .arg(Arg::new("group").long("group").required(true)),
                )
                .subcommand(
                    Command::new("add-member")
                        .arg(Arg::new("group").long("group").required(true))
                        .arg(Arg::new("user").long("user").required(true)),
                )
                .subcommand(
                    Command::new("remove-member")
                        .arg(Arg::new("group").long("group").required(true))
                        .arg(Arg::new("user").long("user").required(true)),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Manage the user email directory")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect split expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense split evenly among participants")
                        .arg(Arg::new("group").long("group").required(true))
                        .arg(Arg::new("payer").long("payer").required(true))
                        .arg(
                            Arg::new("participants")
                                .long("participants")
                                .required(true)
                                .help("Comma-separated co-owing user ids (payer excluded)"),
                        )
                        .arg(Arg::new("total").long("total").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List grouped transactions for a group")
                        .arg(Arg::new("group").long("group").required(true)),
                )),
        )
        .subcommand(
            Command::new("balance")
                .about("Settlement balances")
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Net balance per group for a user")
                        .arg(Arg::new("user").long("user").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("breakdown")
                        .about("Who owes whom within a group, for a user")
                        .arg(Arg::new("group").long("group").required(true))
                        .arg(Arg::new("user").long("user").required(true)),
                )),
        )
        .subcommand(
            Command::new("settle")
                .about("Settle up with one counterparty in a group")
                .arg(Arg::new("group").long("group").required(true))
                .arg(Arg::new("user").long("user").required(true))
                .arg(Arg::new("with").long("with").required(true).help("Counterparty user id")),
        )
        .subcommand(
            Command::new("sync")
                .about("Ingest a transaction snapshot from the backend")
                .arg(Arg::new("url").long("url"))
                .arg(Arg::new("file").long("file")),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to CSV or JSON")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("group").long("group").required(true))
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("balances")
                        .arg(Arg::new("user").long("user").required(true))
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Audit stored data for invariant violations"))
}
