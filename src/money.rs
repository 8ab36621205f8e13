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

//! Currency helpers for BRL amounts.
//!
//! Amounts cross the public API as [`Decimal`] and are handled as integer
//! cents wherever arithmetic has to be exact.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ticket_desk_rs::money::{format_brl, from_cents, to_cents};
//!
//! assert_eq!(to_cents(dec!(1234.565)), Some(123457));
//! assert_eq!(from_cents(123457), dec!(1234.57));
//! assert_eq!(format_brl(dec!(1234.57)), "R$ 1.234,57");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest amount, in reais, a single transfer may carry.
pub const SPLIT_CEILING: Decimal = dec!(99999);

/// [`SPLIT_CEILING`] in cents.
pub const SPLIT_CEILING_CENTS: i64 = 9_999_900;

/// Smallest value moved between two parts when making them unequal (BRL 10).
pub const MIN_SHIFT_CENTS: i64 = 1_000;

/// Upper bound of a shift, as a percentage of the donor part.
pub const MAX_SHIFT_PERCENT: i64 = 15;

/// Number of fractional digits of a BRL amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds to currency precision, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an amount to integer cents after rounding it to two decimals.
///
/// Returns `None` when the result does not fit in an `i64`.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    round_currency(amount)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

/// Converts integer cents back to a two-decimal amount.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, CURRENCY_SCALE)
}

/// Formats an amount with pt-BR digit grouping: `1.234,56`.
pub fn format_plain(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{fraction}")
}

/// Formats an amount as BRL currency: `R$ 1.234,56`.
pub fn format_brl(amount: Decimal) -> String {
    let plain = format_plain(amount);
    match plain.strip_prefix('-') {
        Some(positive) => format!("-R$ {positive}"),
        None => format!("R$ {plain}"),
    }
}

/// Text placed on the clipboard for a split amount: `1234,56`.
///
/// Banking apps reject grouping separators, so none are emitted.
pub fn copy_text(amount: Decimal) -> String {
    format!("{:.2}", round_currency(amount)).replace('.', ",")
}
