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

//! Property-based tests for the amount splitter and the desk.
//!
//! These tests verify invariants that should hold for any total, whatever
//! the random generator draws.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use ticket_desk_rs::money::{SPLIT_CEILING, SPLIT_CEILING_CENTS, round_currency};
use ticket_desk_rs::splitter::{part_count, split_cents};
use ticket_desk_rs::{Desk, MemoryStore, split_amount};

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Totals from one cent up to a hundred transfers' worth, in cents.
fn arb_total_cents() -> impl Strategy<Value = i64> {
    1i64..=(100 * SPLIT_CEILING_CENTS)
}

/// Totals above the ceiling, in cents.
fn arb_large_total_cents() -> impl Strategy<Value = i64> {
    (SPLIT_CEILING_CENTS + 1)..=(100 * SPLIT_CEILING_CENTS)
}

/// Decimal totals with up to four fractional digits, so rounding is exercised.
fn arb_decimal_total() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

// =============================================================================
// Splitter Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Parts always add up to the total, exactly.
    #[test]
    fn parts_sum_to_total(total in arb_total_cents(), seed in any::<u64>()) {
        let parts = split_cents(total, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(parts.iter().sum::<i64>(), total);
    }

    /// Every part is positive and within the ceiling.
    #[test]
    fn parts_are_positive_and_bounded(total in arb_total_cents(), seed in any::<u64>()) {
        let parts = split_cents(total, &mut StdRng::seed_from_u64(seed));
        for part in &parts {
            prop_assert!(*part > 0, "non-positive part {}", part);
            prop_assert!(*part <= SPLIT_CEILING_CENTS, "part {} above ceiling", part);
        }
    }

    /// Totals under the ceiling come back whole.
    #[test]
    fn small_totals_are_not_split(total in 1i64..=SPLIT_CEILING_CENTS, seed in any::<u64>()) {
        let parts = split_cents(total, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(parts, vec![total]);
    }

    /// Large totals use the fewest parts the ceiling allows.
    #[test]
    fn part_count_is_minimal(total in arb_large_total_cents(), seed in any::<u64>()) {
        let parts = split_cents(total, &mut StdRng::seed_from_u64(seed));
        let expected = (total + SPLIT_CEILING_CENTS - 1) / SPLIT_CEILING_CENTS;
        prop_assert_eq!(parts.len() as i64, expected);
        prop_assert_eq!(parts.len(), part_count(total));
    }

    /// Count and sum do not depend on the random draws.
    #[test]
    fn count_and_sum_are_stable(total in arb_large_total_cents(), a in any::<u64>(), b in any::<u64>()) {
        let first = split_cents(total, &mut StdRng::seed_from_u64(a));
        let second = split_cents(total, &mut StdRng::seed_from_u64(b));
        prop_assert_eq!(first.len(), second.len());
        prop_assert_eq!(first.iter().sum::<i64>(), second.iter().sum::<i64>());
    }

    /// Decimal totals are rounded to cents before splitting.
    #[test]
    fn decimal_parts_sum_to_rounded_total(total in arb_decimal_total(), seed in any::<u64>()) {
        let parts = split_amount(total, &mut StdRng::seed_from_u64(seed));
        let rounded = round_currency(total);
        if rounded.is_zero() {
            prop_assert!(parts.is_empty());
        } else {
            prop_assert_eq!(parts.iter().copied().sum::<Decimal>(), rounded);
            prop_assert!(parts.iter().all(|p| *p > Decimal::ZERO && *p <= SPLIT_CEILING));
            prop_assert!(parts.iter().all(|p| p.scale() == 2));
        }
    }

    /// Non-positive totals split into nothing.
    #[test]
    fn non_positive_totals_are_empty(units in -10_000_000_000i64..=0, seed in any::<u64>()) {
        let parts = split_amount(Decimal::new(units, 2), &mut StdRng::seed_from_u64(seed));
        prop_assert!(parts.is_empty());
    }
}

// =============================================================================
// Desk Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Ticket ids are sequential and tickets are listed newest first.
    #[test]
    fn ticket_ids_are_sequential(totals in prop::collection::vec(arb_decimal_total(), 1..10)) {
        let mut desk = Desk::open(MemoryStore::new());
        let mut rng = StdRng::seed_from_u64(0);
        let mut created = 0u32;

        for total in &totals {
            if desk.create_ticket(*total, &mut rng).is_ok() {
                created += 1;
            }
        }

        let ids: Vec<u32> = desk.tickets().iter().map(|t| t.id.0).collect();
        let expected: Vec<u32> = (1..=created).rev().collect();
        prop_assert_eq!(ids, expected);
    }

    /// Every ticket carries one link slot per amount.
    #[test]
    fn links_match_amounts(total in arb_decimal_total()) {
        let mut desk = Desk::open(MemoryStore::new());
        if let Ok(ticket) = desk.create_ticket(total, &mut StdRng::seed_from_u64(1)) {
            prop_assert_eq!(ticket.links.len(), ticket.amounts.len());
            prop_assert_eq!(ticket.receipt_links.len(), ticket.amounts.len());
        }
    }
}
