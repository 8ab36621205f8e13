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

//! Ticket and operation desk.
//!
//! The [`Desk`] owns the two collections an operator works with and keeps
//! them in a [`KeyValueStore`]:
//!
//! - **Tickets**: created by splitting a total, newest first, ids allocated
//!   sequentially.
//! - **Operations**: trades logged against existing tickets, newest first.
//!
//! # Persistence
//!
//! Both collections are read once in [`Desk::open`] and written back whole
//! after every change. Storage is best-effort: failures are logged and the
//! in-memory state stays authoritative for the rest of the session.

use crate::base::{OperationId, TicketId};
use crate::error::DeskError;
use crate::money::{SPLIT_CEILING, round_currency};
use crate::operation::{NewOperation, Operation, TradingPair};
use crate::splitter::{MAX_SPLIT_PARTS, split_amount};
use crate::storage::{KeyValueStore, load_json, save_json};
use crate::ticket::Ticket;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

/// Storage key of the ticket collection.
pub const TICKETS_KEY: &str = "tickets";
/// Storage key of the operation collection.
pub const OPERATIONS_KEY: &str = "operations";

/// Operator desk holding tickets and operations.
///
/// # Invariants
///
/// - Ticket ids are unique and `next_ticket_id` is greater than all of them;
///   it is `None` once `u32::MAX` has been handed out.
/// - Every ticket's `links` and `receipt_links` match its `amounts` in length.
/// - Every operation was validated against an existing ticket when added.
pub struct Desk<S: KeyValueStore> {
    store: S,
    /// Newest first.
    tickets: Vec<Ticket>,
    /// Newest first.
    operations: Vec<Operation>,
    next_ticket_id: Option<TicketId>,
}

impl<S: KeyValueStore> Desk<S> {
    /// Loads the desk from `store`.
    ///
    /// A collection that cannot be read or parsed is logged and started empty.
    pub fn open(store: S) -> Self {
        let tickets: Vec<Ticket> = load_collection(&store, TICKETS_KEY);
        let operations: Vec<Operation> = load_collection(&store, OPERATIONS_KEY);

        let next_ticket_id = tickets
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(Some(TicketId(1)), TicketId::next);

        info!(
            tickets = tickets.len(),
            operations = operations.len(),
            ?next_ticket_id,
            "desk opened"
        );

        Self {
            store,
            tickets,
            operations,
            next_ticket_id,
        }
    }

    /// Returns the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Splits `total` into a new ticket and stores it.
    ///
    /// # Errors
    ///
    /// - [`DeskError::InvalidAmount`] - `total` is not positive at cent precision.
    /// - [`DeskError::AmountTooLarge`] - `total` needs more than
    ///   [`MAX_SPLIT_PARTS`] transfers.
    /// - [`DeskError::TicketIdsExhausted`] - every ticket id is taken.
    pub fn create_ticket<R: Rng + ?Sized>(
        &mut self,
        total: Decimal,
        rng: &mut R,
    ) -> Result<&Ticket, DeskError> {
        let rounded = round_currency(total);
        if rounded <= Decimal::ZERO {
            return Err(DeskError::InvalidAmount {
                field: "amount",
                requirement: "positive",
            });
        }
        if rounded > SPLIT_CEILING * Decimal::from(MAX_SPLIT_PARTS) {
            return Err(DeskError::AmountTooLarge);
        }
        let id = self.next_ticket_id.ok_or(DeskError::TicketIdsExhausted)?;

        let amounts = split_amount(total, rng);
        let ticket = Ticket::new(id, Utc::now(), amounts);
        self.next_ticket_id = id.next();

        info!(ticket = %ticket.id, parts = ticket.amounts.len(), %total, "ticket created");
        self.tickets.insert(0, ticket);
        self.persist_tickets();
        Ok(&self.tickets[0])
    }

    /// Tickets, newest first.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Sets the transfer link of amount `index` on ticket `id`.
    pub fn set_link(
        &mut self,
        id: TicketId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), DeskError> {
        self.ticket_mut(id)?.set_link(index, value)?;
        self.persist_tickets();
        Ok(())
    }

    /// Sets the receipt link of amount `index` on ticket `id`.
    pub fn set_receipt_link(
        &mut self,
        id: TicketId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), DeskError> {
        self.ticket_mut(id)?.set_receipt_link(index, value)?;
        self.persist_tickets();
        Ok(())
    }

    /// Validates and logs a new operation.
    ///
    /// # Errors
    ///
    /// - [`DeskError::TicketNotFound`] - the referenced ticket does not exist.
    /// - [`DeskError::InvalidAmount`] / [`DeskError::EmptyOrderNumber`] - invalid input.
    /// - [`DeskError::ArithmeticOverflow`] - derived totals overflow.
    pub fn add_operation(&mut self, input: NewOperation) -> Result<&Operation, DeskError> {
        if self.ticket(input.ticket_id).is_none() {
            return Err(DeskError::TicketNotFound(input.ticket_id));
        }
        let operation = Operation::from_input(OperationId::new_v4(), input)?;

        info!(
            operation = %operation.id,
            ticket = %operation.ticket_id,
            pair = %operation.pair,
            final_rate = %operation.final_rate,
            "operation added"
        );
        self.operations.insert(0, operation);
        self.persist_operations();
        Ok(&self.operations[0])
    }

    /// Removes an operation and returns it.
    pub fn delete_operation(&mut self, id: OperationId) -> Result<Operation, DeskError> {
        let position = self
            .operations
            .iter()
            .position(|op| op.id == id)
            .ok_or(DeskError::OperationNotFound(id))?;

        let removed = self.operations.remove(position);
        info!(operation = %id, "operation deleted");
        self.persist_operations();
        Ok(removed)
    }

    /// Operations, newest first.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations on `pair`, optionally restricted to one ticket, latest date
    /// first. Operations sharing a date keep their insertion order.
    pub fn filter_operations(&self, pair: TradingPair, ticket: Option<TicketId>) -> Vec<&Operation> {
        let mut filtered: Vec<&Operation> = self
            .operations
            .iter()
            .filter(|op| op.pair == pair)
            .filter(|op| ticket.is_none_or(|id| op.ticket_id == id))
            .collect();
        filtered.sort_by(|a, b| b.date.cmp(&a.date));
        filtered
    }

    fn ticket_mut(&mut self, id: TicketId) -> Result<&mut Ticket, DeskError> {
        self.tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DeskError::TicketNotFound(id))
    }

    fn persist_tickets(&mut self) {
        if let Err(e) = save_json(&mut self.store, TICKETS_KEY, &self.tickets) {
            error!("failed to save tickets: {e}");
        }
    }

    fn persist_operations(&mut self) {
        if let Err(e) = save_json(&mut self.store, OPERATIONS_KEY, &self.operations) {
            error!("failed to save operations: {e}");
        }
    }
}

fn load_collection<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore,
{
    match load_json(store, key) {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("failed to load {key}, starting empty: {e}");
            Vec::new()
        }
    }
}
