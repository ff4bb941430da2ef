//! Pure earnings calculation.
//!
//! Maps a rate definition plus view counts to a payout amount. No side
//! effects, no I/O: both the ingestion path and the reconciliation sweep
//! call [`compute_earnings`] so the two paths cannot diverge for the same
//! stored state.
//!
//! Policies:
//!
//! - *Flat* rates pay per block of views **gained** over the enrollment
//!   baseline; gained views are clamped at zero against backward counter
//!   drift from stale samples.
//! - *Proportional* rates pay per 1,000 **absolute** current views and
//!   ignore the baseline entirely.
//! - The result never drops below the previously stored payout; a stale
//!   sample can lower the stored counters but not the money. The only
//!   ways earnings decrease are the explicit resets (bounty reassignment,
//!   settlement).

use rust_decimal::Decimal;

use crate::domain::RateShape;

/// Internal monetary precision, in decimal places.
///
/// Amounts are stored at this scale and displayed at 2 places.
pub const MONEY_SCALE: u32 = 4;

/// Result of one earnings computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarningsOutcome {
    /// The payout that should now be stored.
    pub amount: Decimal,
    /// Whether `amount` differs from the previously stored payout.
    /// When `false` the caller must not issue a write.
    pub changed: bool,
}

impl EarningsOutcome {
    /// Outcome that leaves the stored payout untouched.
    #[must_use]
    pub const fn unchanged(previous: Decimal) -> Self {
        Self {
            amount: previous,
            changed: false,
        }
    }
}

/// Computes the payout for a post under the given rate.
///
/// `previous` is the currently stored payout; the returned amount is
/// floored at it. Repeating the call with unchanged inputs returns the
/// same amount with `changed = false` (idempotence).
///
/// A flat rate with a zero block size cannot be created through
/// [`crate::domain::RateDefinition::new`]; if one reaches here anyway it
/// is treated as a lookup miss and the computation is a no-op.
#[must_use]
pub fn compute_earnings(
    shape: &RateShape,
    starting_views: u64,
    current_views: u64,
    previous: Decimal,
) -> EarningsOutcome {
    let raw = match shape {
        RateShape::Flat {
            amount_usd,
            per_views,
        } => {
            if *per_views == 0 {
                return EarningsOutcome::unchanged(previous);
            }
            let gained = current_views.saturating_sub(starting_views);
            (Decimal::from(gained) / Decimal::from(*per_views) * *amount_usd).round_dp(MONEY_SCALE)
        }
        RateShape::Proportional { amount_per_1000 } => {
            (Decimal::from(current_views) / Decimal::from(1000_u64) * *amount_per_1000)
                .round_dp(MONEY_SCALE)
        }
    };

    let amount = raw.max(previous);
    EarningsOutcome {
        amount,
        changed: amount != previous,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flat(amount_usd: Decimal, per_views: u64) -> RateShape {
        RateShape::Flat {
            amount_usd,
            per_views,
        }
    }

    #[test]
    fn flat_rate_worked_example() {
        // $5.00 per 1000 views gained, baseline 2000, now 12000.
        let outcome = compute_earnings(&flat(dec!(5.00), 1000), 2000, 12_000, Decimal::ZERO);
        assert_eq!(outcome.amount, dec!(50.0000));
        assert!(outcome.changed);
    }

    #[test]
    fn proportional_rate_worked_example() {
        // $0.60 per 1000 absolute views, baseline irrelevant.
        let shape = RateShape::Proportional {
            amount_per_1000: dec!(0.60),
        };
        let outcome = compute_earnings(&shape, 9_999, 25_500, Decimal::ZERO);
        assert_eq!(outcome.amount, dec!(15.3000));
        assert!(outcome.changed);
    }

    #[test]
    fn repeated_computation_is_idempotent() {
        let shape = flat(dec!(5.00), 1000);
        let first = compute_earnings(&shape, 2000, 12_000, Decimal::ZERO);
        let second = compute_earnings(&shape, 2000, 12_000, first.amount);
        assert_eq!(second.amount, first.amount);
        assert!(!second.changed);
    }

    #[test]
    fn backward_counter_drift_clamps_gain_to_zero() {
        let outcome = compute_earnings(&flat(dec!(5.00), 1000), 8000, 3000, Decimal::ZERO);
        assert_eq!(outcome.amount, Decimal::ZERO);
        assert!(!outcome.changed);
    }

    #[test]
    fn stale_sample_never_lowers_previous_payout() {
        let shape = flat(dec!(5.00), 1000);
        // Paid out at 12000 views...
        let first = compute_earnings(&shape, 2000, 12_000, Decimal::ZERO);
        // ...then a stale sample reports 7000.
        let second = compute_earnings(&shape, 2000, 7000, first.amount);
        assert_eq!(second.amount, first.amount);
        assert!(!second.changed);
    }

    #[test]
    fn proportional_stale_sample_is_floored_too() {
        let shape = RateShape::Proportional {
            amount_per_1000: dec!(0.60),
        };
        let first = compute_earnings(&shape, 0, 25_500, Decimal::ZERO);
        let second = compute_earnings(&shape, 0, 20_000, first.amount);
        assert_eq!(second.amount, first.amount);
        assert!(!second.changed);
    }

    #[test]
    fn fresh_bounty_with_no_new_views_earns_zero() {
        // starting_views snapshotted at assignment, counters unchanged.
        let outcome = compute_earnings(&flat(dec!(5.00), 1000), 5000, 5000, Decimal::ZERO);
        assert_eq!(outcome.amount, Decimal::ZERO);
        assert!(!outcome.changed);
    }

    #[test]
    fn partial_block_pays_fractionally() {
        // 250 gained views at $5.00 per 1000 = $1.25.
        let outcome = compute_earnings(&flat(dec!(5.00), 1000), 0, 250, Decimal::ZERO);
        assert_eq!(outcome.amount, dec!(1.2500));
    }

    #[test]
    fn result_rounds_to_four_places() {
        // 1 gained view at $1.00 per 3 views = 0.3333...
        let outcome = compute_earnings(&flat(dec!(1.00), 3), 0, 1, Decimal::ZERO);
        assert_eq!(outcome.amount, dec!(0.3333));
    }

    #[test]
    fn zero_block_size_is_a_no_op() {
        let outcome = compute_earnings(&flat(dec!(5.00), 0), 0, 10_000, dec!(2.0000));
        assert_eq!(outcome.amount, dec!(2.0000));
        assert!(!outcome.changed);
    }
}
