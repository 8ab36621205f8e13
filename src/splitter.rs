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

//! Splitting of a total into transfers below the per-transfer ceiling.
//!
//! A total above [`SPLIT_CEILING`](crate::money::SPLIT_CEILING) is cut into the
//! fewest parts that respect the ceiling. The parts start out equal, then each
//! pair `(i, n - 1 - i)` trades a random slice of value so the transfers do not
//! look machine-generated, and finally the order is shuffled.
//!
//! All arithmetic happens in integer cents. Randomness is supplied by the
//! caller, so tests can pass a seeded or mock generator.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use rust_decimal_macros::dec;
//! use ticket_desk_rs::split_amount;
//!
//! let parts = split_amount(dec!(300000.00), &mut rand::thread_rng());
//! assert_eq!(parts.len(), 4);
//! assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(300000.00));
//! ```

use crate::money::{
    MAX_SHIFT_PERCENT, MIN_SHIFT_CENTS, SPLIT_CEILING_CENTS, from_cents, to_cents,
};
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Most transfers a single split may produce.
///
/// Totals needing more parts split into nothing, as overflowing totals do.
pub const MAX_SPLIT_PARTS: usize = 10_000;

/// Splits `total` into transfers no larger than the ceiling.
///
/// Returns an empty vector when `total` is not positive at currency precision
/// or would need more than [`MAX_SPLIT_PARTS`] transfers. Otherwise the parts
/// sum to `total` rounded to two decimals, exactly.
pub fn split_amount<R: Rng + ?Sized>(total: Decimal, rng: &mut R) -> Vec<Decimal> {
    if total <= Decimal::ZERO {
        return Vec::new();
    }
    let Some(total_cents) = to_cents(total) else {
        warn!(%total, "amount does not fit in cents, not splitting");
        return Vec::new();
    };

    split_cents(total_cents, rng)
        .into_iter()
        .map(from_cents)
        .collect()
}

/// Integer core of [`split_amount`], operating on cents.
///
/// The result holds `ceil(total_cents / SPLIT_CEILING_CENTS)` elements, or none
/// when that exceeds [`MAX_SPLIT_PARTS`].
pub fn split_cents<R: Rng + ?Sized>(total_cents: i64, rng: &mut R) -> Vec<i64> {
    if total_cents <= 0 {
        return Vec::new();
    }
    if total_cents <= SPLIT_CEILING_CENTS {
        return vec![total_cents];
    }

    let parts = part_count(total_cents);
    if parts > MAX_SPLIT_PARTS {
        warn!(total_cents, parts, "amount needs too many transfers, not splitting");
        return Vec::new();
    }
    let mut amounts = equal_partition(total_cents, parts);
    make_unequal(&mut amounts, rng);
    amounts.shuffle(rng);

    debug!(total_cents, parts, "split amount");
    amounts
}

/// Fewest parts such that an equal split stays within the ceiling.
pub fn part_count(total_cents: i64) -> usize {
    if total_cents <= 0 {
        return 0;
    }
    let parts = (total_cents - 1) / SPLIT_CEILING_CENTS + 1;
    usize::try_from(parts).unwrap_or(usize::MAX)
}

/// Equal split of `total_cents`; the first `total_cents % parts` parts carry one
/// extra cent.
fn equal_partition(total_cents: i64, parts: usize) -> Vec<i64> {
    let divisor = parts as i64;
    let base = total_cents / divisor;
    let remainder = (total_cents % divisor) as usize;

    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Moves a random amount from part `i` to part `n - 1 - i` for each pair.
///
/// The shift is drawn from `[MIN_SHIFT_CENTS, max]`, where `max` is
/// `MAX_SHIFT_PERCENT` of the donor, capped by the receiver's headroom under the
/// ceiling. Pairs whose range would be empty are left untouched.
fn make_unequal<R: Rng + ?Sized>(amounts: &mut [i64], rng: &mut R) {
    let n = amounts.len();
    for i in 0..n / 2 {
        let partner = n - 1 - i;
        let headroom = SPLIT_CEILING_CENTS - amounts[partner];
        let max_shift = (amounts[i] * MAX_SHIFT_PERCENT / 100).min(headroom);

        if max_shift < MIN_SHIFT_CENTS {
            debug!(pair = i, max_shift, "shift range empty, skipping pair");
            continue;
        }

        let shift = rng.gen_range(MIN_SHIFT_CENTS..=max_shift);
        if amounts[i] > shift {
            amounts[i] -= shift;
            amounts[partner] += shift;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use rust_decimal_macros::dec;

    fn sorted(mut parts: Vec<Decimal>) -> Vec<Decimal> {
        parts.sort();
        parts
    }

    #[test]
    fn non_positive_totals_yield_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(split_amount(dec!(0), &mut rng).is_empty());
        assert!(split_amount(dec!(-5), &mut rng).is_empty());
        // Rounds to zero cents.
        assert!(split_amount(dec!(0.004), &mut rng).is_empty());
    }

    #[test]
    fn totals_under_ceiling_are_returned_whole() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(split_amount(dec!(50000.00), &mut rng), vec![dec!(50000.00)]);
        assert_eq!(split_amount(dec!(99999.00), &mut rng), vec![dec!(99999.00)]);
        assert_eq!(split_amount(dec!(0.01), &mut rng), vec![dec!(0.01)]);
    }

    #[test]
    fn totals_are_rounded_to_cents_first() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(split_amount(dec!(10.005), &mut rng), vec![dec!(10.01)]);
    }

    #[test]
    fn one_cent_over_ceiling_needs_two_parts() {
        let mut rng = StdRng::seed_from_u64(3);
        let parts = split_amount(dec!(99999.01), &mut rng);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(99999.01));
    }

    #[test]
    fn split_150000_50_into_two_positive_parts() {
        let mut rng = StdRng::seed_from_u64(42);
        let parts = split_amount(dec!(150000.50), &mut rng);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| *p > Decimal::ZERO));
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(150000.50));
    }

    #[test]
    fn split_300000_into_four_parts() {
        // 300000 / 99999 is just above 3, so four parts are needed.
        let mut rng = StdRng::seed_from_u64(7);
        let parts = split_amount(dec!(300000.00), &mut rng);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(300000.00));
    }

    #[test]
    fn split_299997_into_three_parts() {
        let mut rng = StdRng::seed_from_u64(7);
        let parts = split_amount(dec!(299997.00), &mut rng);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(299997.00));
    }

    #[test]
    fn minimum_draw_shifts_exactly_ten_reais() {
        // A zero-valued generator always draws the low end of the range.
        let mut rng = StepRng::new(0, 0);
        let parts = split_amount(dec!(150000.50), &mut rng);
        assert_eq!(sorted(parts), vec![dec!(74990.25), dec!(75010.25)]);
    }

    #[test]
    fn totals_beyond_part_limit_yield_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(split_amount(dec!(10000000000000000), &mut rng).is_empty());
        assert!(split_cents(i64::MAX, &mut rng).is_empty());

        let largest = MAX_SPLIT_PARTS as i64 * SPLIT_CEILING_CENTS;
        assert_eq!(split_cents(largest, &mut rng).len(), MAX_SPLIT_PARTS);
        assert!(split_cents(largest + 1, &mut rng).is_empty());
    }

    #[test]
    fn zero_generator_swaps_the_two_parts() {
        // Donor part 0 ends up smaller; the shuffle then swaps index 1 with 0.
        let mut rng = StepRng::new(0, 0);
        let parts = split_amount(dec!(150000.50), &mut rng);
        assert_eq!(parts, vec![dec!(75010.25), dec!(74990.25)]);
    }

    #[test]
    fn order_depends_on_generator() {
        let mut larger_first = false;
        let mut larger_second = false;
        for seed in 0..64 {
            let parts = split_amount(dec!(150000.50), &mut StdRng::seed_from_u64(seed));
            assert_ne!(parts[0], parts[1]);
            if parts[0] > parts[1] {
                larger_first = true;
            } else {
                larger_second = true;
            }
        }
        assert!(larger_first && larger_second);
    }

    #[test]
    fn remainder_goes_to_leading_parts() {
        assert_eq!(equal_partition(10, 3), vec![4, 3, 3]);
        assert_eq!(equal_partition(9, 3), vec![3, 3, 3]);
    }

    #[test]
    fn part_count_is_ceiling_division() {
        assert_eq!(part_count(0), 0);
        assert_eq!(part_count(1), 1);
        assert_eq!(part_count(SPLIT_CEILING_CENTS), 1);
        assert_eq!(part_count(SPLIT_CEILING_CENTS + 1), 2);
        assert_eq!(part_count(3 * SPLIT_CEILING_CENTS), 3);
    }

    #[test]
    fn small_donor_is_not_shifted() {
        // 15% of 5000 cents is below the 1000 cent minimum.
        let mut amounts = [5_000, 5_000];
        make_unequal(&mut amounts, &mut StdRng::seed_from_u64(9));
        assert_eq!(amounts, [5_000, 5_000]);
    }

    #[test]
    fn receiver_at_ceiling_is_not_shifted() {
        let mut rng = StdRng::seed_from_u64(9);
        let parts = split_amount(dec!(199998.00), &mut rng);
        assert_eq!(parts, vec![dec!(99999.00), dec!(99999.00)]);
    }

    #[test]
    fn odd_part_count_leaves_middle_untouched() {
        let mut amounts = [3_000_000, 3_000_000, 3_000_000];
        make_unequal(&mut amounts, &mut StepRng::new(0, 0));
        assert_eq!(amounts, [2_999_000, 3_000_000, 3_001_000]);
    }

    #[test]
    fn shift_never_exceeds_fifteen_percent() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut amounts = [4_000_000, 4_000_000];
            make_unequal(&mut amounts, &mut rng);
            let shift = 4_000_000 - amounts[0];
            assert!((MIN_SHIFT_CENTS..=600_000).contains(&shift), "shift {shift}");
            assert_eq!(amounts[0] + amounts[1], 8_000_000);
        }
    }
}
