// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use ticket_desk_rs::export::{render_ticket_document, write_operations_csv, write_ticket_csv};
use ticket_desk_rs::money::{copy_text, format_brl, format_plain};
use ticket_desk_rs::{
    Desk, DeskError, FileStore, KeyValueStore, MemoryStore, NewOperation, Operation, OperationId,
    OperationTotals, Ticket, TicketId, TradingPair,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Ticket Desk - Split totals into transfer tickets and log trades
///
/// Totals above BRL 99,999 are split into several randomized transfers that
/// add up to the exact total. Trades made with the funds are logged against
/// the ticket they came from.
#[derive(Parser, Debug)]
#[command(name = "ticket-desk")]
#[command(about = "Split totals into sub-limit transfer tickets and log trades", long_about = None)]
struct Cli {
    /// Directory holding tickets.json and operations.json
    #[arg(
        long,
        value_name = "DIR",
        env = "TICKET_DESK_DATA_DIR",
        default_value = ".ticket-desk"
    )]
    data_dir: PathBuf,

    /// Keep everything in memory; nothing is read or written
    #[arg(long)]
    ephemeral: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a total into a new ticket
    Split {
        /// Total in BRL, e.g. 150000.50 or 150.000,50
        #[arg(value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Decimal,
    },
    /// List tickets, newest first
    Tickets,
    /// Set the transfer link of one amount
    Link(LinkArgs),
    /// Set the receipt link of one amount
    Receipt(LinkArgs),
    /// Print a ticket as a printable document
    Export {
        ticket: TicketId,
        /// Emit CSV instead of the text document
        #[arg(long)]
        csv: bool,
    },
    /// Log, list and delete trading operations
    #[command(subcommand)]
    Op(OpCommand),
}

#[derive(Args, Debug)]
struct LinkArgs {
    ticket: TicketId,
    /// Position of the amount, starting at 1
    index: usize,
    url: String,
}

#[derive(Subcommand, Debug)]
enum OpCommand {
    /// Log a new operation
    Add {
        #[arg(long)]
        ticket: TicketId,
        #[arg(long, default_value = "USDT/BRL")]
        pair: TradingPair,
        #[arg(long = "order")]
        order_number: String,
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        quantity: Decimal,
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        price: Decimal,
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true, default_value = "0")]
        fee: Decimal,
        /// Trade date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List operations with totals, latest date first
    List {
        /// Only this pair; both pairs are listed when omitted
        #[arg(long)]
        pair: Option<TradingPair>,
        /// Only operations of this ticket
        #[arg(long)]
        ticket: Option<TicketId>,
        #[arg(long)]
        csv: bool,
    },
    /// Delete an operation by id
    Delete { id: OperationId },
}

/// Parses an amount in either `1234.56` or pt-BR `1.234,56` notation.
fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim().trim_start_matches("R$").trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized).map_err(|e| format!("invalid amount '{raw}': {e}"))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store: Box<dyn KeyValueStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        debug!(dir = %cli.data_dir.display(), "using file store");
        Box::new(FileStore::new(&cli.data_dir))
    };
    let mut desk = Desk::open(store);

    if let Err(e) = run(&mut desk, cli.command, std::io::stdout().lock()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run<S, W>(desk: &mut Desk<S>, command: Command, mut out: W) -> Result<(), Box<dyn Error>>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Split { amount } => {
            let ticket = desk.create_ticket(amount, &mut rand::thread_rng())?;
            write_ticket(&mut out, ticket)?;
        }
        Command::Tickets => {
            if desk.tickets().is_empty() {
                writeln!(out, "No tickets yet.")?;
            }
            for ticket in desk.tickets() {
                write_ticket(&mut out, ticket)?;
            }
        }
        Command::Link(args) => {
            desk.set_link(args.ticket, link_position(args.index)?, args.url)?;
        }
        Command::Receipt(args) => {
            desk.set_receipt_link(args.ticket, link_position(args.index)?, args.url)?;
        }
        Command::Export { ticket, csv } => {
            let ticket = desk.ticket(ticket).ok_or(DeskError::TicketNotFound(ticket))?;
            if csv {
                write_ticket_csv(ticket, &mut out)?;
            } else {
                out.write_all(render_ticket_document(ticket).as_bytes())?;
            }
        }
        Command::Op(op) => run_op(desk, op, out)?,
    }
    Ok(())
}

fn run_op<S, W>(desk: &mut Desk<S>, command: OpCommand, mut out: W) -> Result<(), Box<dyn Error>>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        OpCommand::Add {
            ticket,
            pair,
            order_number,
            quantity,
            price,
            fee,
            date,
        } => {
            let op = desk.add_operation(NewOperation {
                ticket_id: ticket,
                pair,
                order_number,
                quantity,
                price,
                fee,
                date: date.unwrap_or_else(|| Local::now().date_naive()),
            })?;
            writeln!(
                out,
                "{}  total {}  final rate {:.8}",
                op.id,
                format_brl(op.total_brl),
                op.final_rate
            )?;
        }
        OpCommand::List { pair, ticket, csv } => {
            let pairs = pair.map_or(TradingPair::ALL.to_vec(), |p| vec![p]);
            if csv {
                let desk: &Desk<S> = desk;
                let operations = pairs
                    .iter()
                    .flat_map(|p| desk.filter_operations(*p, ticket));
                write_operations_csv(operations, &mut out)?;
                return Ok(());
            }
            for pair in pairs {
                write_operations(&mut out, pair, &desk.filter_operations(pair, ticket), ticket)?;
            }
        }
        OpCommand::Delete { id } => {
            let removed = desk.delete_operation(id)?;
            writeln!(out, "Deleted operation {} (order {})", removed.id, removed.order_number)?;
        }
    }
    Ok(())
}

/// Converts a 1-based position from the command line to an index.
fn link_position(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "amount positions start at 1".to_string())
}

fn write_ticket<W: Write>(out: &mut W, ticket: &Ticket) -> std::io::Result<()> {
    writeln!(
        out,
        "Ticket #{}  {}  total {}",
        ticket.id,
        ticket.created_at.with_timezone(&Local).format("%d/%m/%Y %H:%M"),
        format_brl(ticket.total())
    )?;
    for (i, amount) in ticket.amounts.iter().enumerate() {
        let link = ticket.links.get(i).map_or("", String::as_str);
        let receipt = ticket.receipt_links.get(i).map_or("", String::as_str);
        writeln!(
            out,
            "  {:>3}  {:>12}  copy: {:<10}  link: {}  receipt: {}",
            i + 1,
            format_plain(*amount),
            copy_text(*amount),
            if link.is_empty() { "-" } else { link },
            if receipt.is_empty() { "-" } else { receipt },
        )?;
    }
    Ok(())
}

fn write_operations<W: Write>(
    out: &mut W,
    pair: TradingPair,
    operations: &[&Operation],
    ticket: Option<TicketId>,
) -> std::io::Result<()> {
    writeln!(out, "== {pair} ==")?;
    if operations.is_empty() {
        match ticket {
            Some(id) => writeln!(out, "No operations for {pair} on ticket #{id}.")?,
            None => writeln!(out, "No operations for {pair}.")?,
        }
        return Ok(());
    }

    writeln!(
        out,
        "{:<10}  {:>6}  {:<12}  {:>14}  {:>10}  {:>10}  {:>16}  {:>12}  id",
        "date", "ticket", "order", "quantity", "price", "fee", "total", "final rate"
    )?;
    for op in operations {
        writeln!(
            out,
            "{:<10}  {:>6}  {:<12}  {:>14}  {:>10}  {:>10}  {:>16}  {:>12}  {}",
            op.date,
            format!("#{}", op.ticket_id),
            op.order_number,
            op.quantity.to_string(),
            op.price.to_string(),
            format!("{:.4}", op.fee),
            format_brl(op.total_brl),
            format!("{:.8}", op.final_rate),
            op.id
        )?;
    }

    let totals = OperationTotals::from_operations(operations.iter().copied());
    writeln!(
        out,
        "{:<10}  {:>6}  {:<12}  {:>14}  {:>10}  {:>10}  {:>16}  {:>12}",
        "totals",
        totals.count,
        "",
        totals.sum_quantity.to_string(),
        format!("{:.2}", totals.avg_price),
        format!("{:.4}", totals.sum_fee),
        format_brl(totals.sum_total_brl),
        format!("{:.8}", totals.avg_final_rate),
    )?;
    Ok(())
}
