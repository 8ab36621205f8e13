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

//! Printable and tabular renderings of tickets and operations.

use crate::money::{format_brl, format_plain};
use crate::operation::Operation;
use crate::ticket::Ticket;
use csv::{Writer, WriterBuilder};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

const DOCUMENT_WIDTH: usize = 60;

const TICKET_COLUMNS: [&str; 4] = ["index", "amount", "link", "receipt_link"];

const OPERATION_COLUMNS: [&str; 10] = [
    "id",
    "date",
    "ticket",
    "pair",
    "order_number",
    "quantity",
    "price",
    "fee",
    "total_brl",
    "final_rate",
];

/// Renders a ticket as a plain-text document suitable for printing.
///
/// # Format
///
/// ```text
///                        Ticket Order
/// Ticket No: 1                           Date: 14/03/2025 09:30 UTC
/// ------------------------------------------------------------
/// Total to deposit:                               R$ 150.000,50
///
///   #                                      Split amount (BRL)
///   1                                               74.990,25
///   2                                               75.010,25
///
/// Generated automatically. Not an official payment receipt.
/// ```
pub fn render_ticket_document(ticket: &Ticket) -> String {
    let mut out = String::new();
    let width = DOCUMENT_WIDTH;

    out.push_str(&format!("{:^width$}\n", "Ticket Order"));
    push_spread(
        &mut out,
        &format!("Ticket No: {}", ticket.id),
        &format!("Date: {} UTC", ticket.created_at.format("%d/%m/%Y %H:%M")),
    );
    out.push_str(&"-".repeat(width));
    out.push('\n');
    push_spread(&mut out, "Total to deposit:", &format_brl(ticket.total()));
    out.push('\n');

    push_spread(&mut out, "  #", "Split amount (BRL)");
    for (i, amount) in ticket.amounts.iter().enumerate() {
        push_spread(&mut out, &format!("{:>3}", i + 1), &format_plain(*amount));
    }
    out.push('\n');
    out.push_str("Generated automatically. Not an official payment receipt.\n");
    out
}

/// Appends `left` and `right` on one line, `right` flush to the document edge.
fn push_spread(out: &mut String, left: &str, right: &str) {
    let gap = DOCUMENT_WIDTH
        .saturating_sub(left.chars().count() + right.chars().count())
        .max(1);
    out.push_str(left);
    out.push_str(&" ".repeat(gap));
    out.push_str(right);
    out.push('\n');
}

#[derive(Debug, Serialize)]
struct TicketRow<'a> {
    index: usize,
    amount: Decimal,
    link: &'a str,
    receipt_link: &'a str,
}

/// Writes one CSV row per split amount of `ticket`.
///
/// Columns: `index, amount, link, receipt_link` (index starts at 1). The
/// header row is written even when the ticket has no amounts.
pub fn write_ticket_csv<W: Write>(ticket: &Ticket, writer: W) -> Result<(), csv::Error> {
    let mut wtr = headed_writer(writer, &TICKET_COLUMNS)?;

    for (i, amount) in ticket.amounts.iter().enumerate() {
        wtr.serialize(TicketRow {
            index: i + 1,
            amount: *amount,
            link: ticket.links.get(i).map_or("", String::as_str),
            receipt_link: ticket.receipt_links.get(i).map_or("", String::as_str),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct OperationRow<'a> {
    id: String,
    date: String,
    ticket: u32,
    pair: &'static str,
    order_number: &'a str,
    quantity: Decimal,
    price: Decimal,
    fee: Decimal,
    total_brl: Decimal,
    final_rate: Decimal,
}

/// Writes operations as CSV, in the order given, header row first.
pub fn write_operations_csv<'a, I, W>(operations: I, writer: W) -> Result<(), csv::Error>
where
    I: IntoIterator<Item = &'a Operation>,
    W: Write,
{
    let mut wtr = headed_writer(writer, &OPERATION_COLUMNS)?;

    for op in operations {
        wtr.serialize(OperationRow {
            id: op.id.to_string(),
            date: op.date.to_string(),
            ticket: op.ticket_id.0,
            pair: op.pair.as_str(),
            order_number: &op.order_number,
            quantity: op.quantity,
            price: op.price,
            fee: op.fee,
            total_brl: op.total_brl,
            final_rate: op.final_rate,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// CSV writer that has already emitted `columns`; rows are written without
/// the serializer's own header.
fn headed_writer<W: Write>(writer: W, columns: &[&str]) -> Result<Writer<W>, csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(columns)?;
    Ok(wtr)
}
