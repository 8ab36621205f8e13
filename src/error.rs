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

//! Error types for desk operations and storage.

use crate::base::{OperationId, TicketId};
use thiserror::Error;

/// Desk validation and lookup errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeskError {
    /// A numeric input is zero, negative, or otherwise out of range
    #[error("invalid {field} (must be {requirement})")]
    InvalidAmount {
        field: &'static str,
        requirement: &'static str,
    },

    /// Total would need more transfers than a ticket may hold
    #[error("amount too large to split into a single ticket")]
    AmountTooLarge,

    /// Every ticket id has been allocated
    #[error("no ticket ids left")]
    TicketIdsExhausted,

    /// Order number is empty or whitespace
    #[error("order number cannot be empty")]
    EmptyOrderNumber,

    /// Referenced ticket does not exist
    #[error("ticket #{0} not found")]
    TicketNotFound(TicketId),

    /// Referenced operation does not exist
    #[error("operation {0} not found")]
    OperationNotFound(OperationId),

    /// Link index is past the last split amount of the ticket
    #[error("link index {index} out of range (ticket has {len} amounts)")]
    LinkIndexOutOfRange { index: usize, len: usize },

    /// Derived total or rate overflowed
    #[error("arithmetic overflow computing operation totals")]
    ArithmeticOverflow,

    /// Trading pair is not supported
    #[error("unknown trading pair '{0}' (expected USDT/BRL or USDT/TRX)")]
    UnknownPair(String),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON under key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
