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

//! Trading operations logged against tickets.
//!
//! An operation records one trade on a [`TradingPair`]. The desk derives two
//! fields from the operator's input:
//!
//! - `total_brl = quantity * price`
//! - `final_rate = (total_brl + fee) / quantity`, the effective price paid per
//!   unit once the fee is included.

use crate::base::{OperationId, TicketId};
use crate::error::DeskError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingPair {
    #[serde(rename = "USDT/BRL")]
    UsdtBrl,
    #[serde(rename = "USDT/TRX")]
    UsdtTrx,
}

impl TradingPair {
    pub const ALL: [TradingPair; 2] = [TradingPair::UsdtBrl, TradingPair::UsdtTrx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsdtBrl => "USDT/BRL",
            Self::UsdtTrx => "USDT/TRX",
        }
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingPair {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "/").as_str() {
            "USDT/BRL" => Ok(Self::UsdtBrl),
            "USDT/TRX" => Ok(Self::UsdtTrx),
            _ => Err(DeskError::UnknownPair(s.to_string())),
        }
    }
}

/// Operator input for a new operation, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOperation {
    pub ticket_id: TicketId,
    pub pair: TradingPair,
    pub order_number: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub date: NaiveDate,
}

impl NewOperation {
    /// Checks the numeric fields and the order number.
    ///
    /// Ticket existence is checked by the desk, which owns the tickets.
    pub fn validate(&self) -> Result<(), DeskError> {
        if self.quantity <= Decimal::ZERO {
            return Err(DeskError::InvalidAmount {
                field: "quantity",
                requirement: "positive",
            });
        }
        if self.price <= Decimal::ZERO {
            return Err(DeskError::InvalidAmount {
                field: "price",
                requirement: "positive",
            });
        }
        if self.fee < Decimal::ZERO {
            return Err(DeskError::InvalidAmount {
                field: "fee",
                requirement: "zero or positive",
            });
        }
        if self.order_number.trim().is_empty() {
            return Err(DeskError::EmptyOrderNumber);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: OperationId,
    pub ticket_id: TicketId,
    pub pair: TradingPair,
    pub order_number: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    #[serde(rename = "totalBRL")]
    pub total_brl: Decimal,
    pub final_rate: Decimal,
    pub date: NaiveDate,
}

impl Operation {
    /// Builds an operation from validated input, computing derived fields.
    ///
    /// # Errors
    ///
    /// - [`DeskError::InvalidAmount`] / [`DeskError::EmptyOrderNumber`] - input fails validation.
    /// - [`DeskError::ArithmeticOverflow`] - derived values do not fit a `Decimal`.
    pub fn from_input(id: OperationId, input: NewOperation) -> Result<Self, DeskError> {
        input.validate()?;
        let (total_brl, final_rate) = derive_rates(input.quantity, input.price, input.fee)?;

        Ok(Self {
            id,
            ticket_id: input.ticket_id,
            pair: input.pair,
            order_number: input.order_number.trim().to_string(),
            quantity: input.quantity,
            price: input.price,
            fee: input.fee,
            total_brl,
            final_rate,
            date: input.date,
        })
    }
}

/// Returns `(total_brl, final_rate)` for a trade.
///
/// A zero quantity has no per-unit cost, so the rate falls back to `price`.
pub fn derive_rates(
    quantity: Decimal,
    price: Decimal,
    fee: Decimal,
) -> Result<(Decimal, Decimal), DeskError> {
    let total_brl = quantity
        .checked_mul(price)
        .ok_or(DeskError::ArithmeticOverflow)?;

    let final_rate = if quantity > Decimal::ZERO {
        total_brl
            .checked_add(fee)
            .and_then(|gross| gross.checked_div(quantity))
            .ok_or(DeskError::ArithmeticOverflow)?
    } else {
        price
    };

    Ok((total_brl, final_rate))
}

/// Footer totals of an operations listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperationTotals {
    pub count: usize,
    pub sum_quantity: Decimal,
    pub avg_price: Decimal,
    pub sum_fee: Decimal,
    pub sum_total_brl: Decimal,
    pub avg_final_rate: Decimal,
}

impl OperationTotals {
    /// Sums and averages over `operations`; all zero when empty.
    pub fn from_operations<'a, I>(operations: I) -> Self
    where
        I: IntoIterator<Item = &'a Operation>,
    {
        let mut totals = Self::default();
        let mut sum_price = Decimal::ZERO;
        let mut sum_final_rate = Decimal::ZERO;

        for op in operations {
            totals.count += 1;
            totals.sum_quantity += op.quantity;
            totals.sum_fee += op.fee;
            totals.sum_total_brl += op.total_brl;
            sum_price += op.price;
            sum_final_rate += op.final_rate;
        }

        if totals.count > 0 {
            let count = Decimal::from(totals.count);
            totals.avg_price = sum_price / count;
            totals.avg_final_rate = sum_final_rate / count;
        }
        totals
    }
}
