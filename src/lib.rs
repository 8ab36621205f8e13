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

//! # Ticket Desk
//!
//! This library backs an operator console that splits large BRL totals into
//! transfers below the BRL 99,999 per-transfer limit and logs the trading
//! operations made with the transferred funds.
//!
//! ## Core Components
//!
//! - [`split_amount`]: Splits a total into randomized transfers that sum to it exactly
//! - [`Desk`]: Ticket and operation store with best-effort persistence
//! - [`Ticket`]: Split amounts plus the operator's transfer and receipt links
//! - [`Operation`]: Logged trade with derived total and effective rate
//! - [`DeskError`]: Error types for desk validation and lookups
//!
//! ## Example
//!
//! ```
//! use ticket_desk_rs::{Desk, MemoryStore, NewOperation, TradingPair};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let mut desk = Desk::open(MemoryStore::new());
//! let mut rng = rand::thread_rng();
//!
//! // Split a total into a ticket
//! let ticket = desk.create_ticket(dec!(150000.50), &mut rng).unwrap();
//! assert_eq!(ticket.amounts.len(), 2);
//! assert_eq!(ticket.total(), dec!(150000.50));
//! let ticket_id = ticket.id;
//!
//! // Log a trade against it
//! let op = desk
//!     .add_operation(NewOperation {
//!         ticket_id,
//!         pair: TradingPair::UsdtBrl,
//!         order_number: "ORD-1".into(),
//!         quantity: dec!(1000),
//!         price: dec!(5.40),
//!         fee: dec!(2.50),
//!         date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
//!     })
//!     .unwrap();
//! assert_eq!(op.final_rate, dec!(5.4025));
//! ```

mod base;
pub mod desk;
pub mod error;
pub mod export;
pub mod money;
pub mod operation;
pub mod splitter;
pub mod storage;
pub mod ticket;

pub use base::{OperationId, TicketId};
pub use desk::Desk;
pub use error::{DeskError, StorageError};
pub use operation::{NewOperation, Operation, OperationTotals, TradingPair};
pub use splitter::split_amount;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use ticket::Ticket;
