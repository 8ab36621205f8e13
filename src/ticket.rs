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

//! Transfer tickets.
//!
//! A ticket is the result of one split: the transfer amounts plus, for each
//! amount, a transfer link and a receipt link filled in by the operator.

use crate::base::TicketId;
use crate::error::DeskError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub created_at: DateTime<Utc>,
    pub amounts: Vec<Decimal>,
    /// Transfer links, one per amount.
    pub links: Vec<String>,
    /// Receipt links, one per amount.
    pub receipt_links: Vec<String>,
}

impl Ticket {
    /// Creates a ticket with empty links for every amount.
    pub fn new(id: TicketId, created_at: DateTime<Utc>, amounts: Vec<Decimal>) -> Self {
        let len = amounts.len();
        Self {
            id,
            created_at,
            amounts,
            links: vec![String::new(); len],
            receipt_links: vec![String::new(); len],
        }
    }

    /// Sum of all transfer amounts.
    pub fn total(&self) -> Decimal {
        self.amounts.iter().copied().sum()
    }

    pub fn set_link(&mut self, index: usize, value: impl Into<String>) -> Result<(), DeskError> {
        let len = self.amounts.len();
        Self::slot(&mut self.links, index, len).map(|slot| *slot = value.into())
    }

    pub fn set_receipt_link(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), DeskError> {
        let len = self.amounts.len();
        Self::slot(&mut self.receipt_links, index, len).map(|slot| *slot = value.into())
    }

    /// Link slot for `index`, growing `links` if stored data was short.
    fn slot(links: &mut Vec<String>, index: usize, len: usize) -> Result<&mut String, DeskError> {
        if index >= len {
            return Err(DeskError::LinkIndexOutOfRange { index, len });
        }
        if links.len() < len {
            links.resize(len, String::new());
        }
        Ok(&mut links[index])
    }
}
