//! Correctly rounded floating-point summation.
//!
//! Keeps a list of non-overlapping partial sums (Shewchuk's algorithm) so the
//! result is the exact sum of the inputs rounded once, independent of input
//! order. Used for the learner's dot product.

/// Sum `values` exactly, rounding only the final result (round-half-even).
///
/// Non-finite inputs, or an intermediate sum that overflows, fall back to the
/// plain left-to-right IEEE sum. Infinities and NaN then propagate and an
/// overflow saturates to `±inf` the way a naive loop would.
pub fn fsum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut partials: Vec<f64> = Vec::new();
    let mut plain = 0.0f64;
    let mut exact = true;

    for value in values {
        plain += value;
        if !exact {
            continue;
        }
        if !value.is_finite() {
            exact = false;
            continue;
        }
        let mut x = value;
        let mut kept = 0usize;
        for idx in 0..partials.len() {
            let mut y = partials[idx];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            if !hi.is_finite() {
                exact = false;
                break;
            }
            let lo = y - (hi - x);
            if lo != 0.0 {
                partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        if exact {
            partials.truncate(kept);
            partials.push(x);
        }
    }

    if !exact {
        return plain;
    }
    round_partials(&partials)
}

fn round_partials(partials: &[f64]) -> f64 {
    let Some((&last, rest)) = partials.split_last() else {
        return 0.0;
    };
    let mut hi = last;
    let mut lo = 0.0f64;
    let mut remaining = rest.len();
    while remaining > 0 {
        let x = hi;
        let y = rest[remaining - 1];
        remaining -= 1;
        hi = x + y;
        let y_rounded = hi - x;
        lo = y - y_rounded;
        if lo != 0.0 {
            break;
        }
    }
    // Half-way case: the next partial has the same sign as the rounding error.
    if remaining > 0 {
        let next = rest[remaining - 1];
        if (lo < 0.0 && next < 0.0) || (lo > 0.0 && next > 0.0) {
            let y = lo * 2.0;
            let x = hi + y;
            if y == x - hi {
                hi = x;
            }
        }
    }
    hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sum_is_zero() {
        assert_eq!(fsum(Vec::new()), 0.0);
    }

    #[test]
    fn cancellation_keeps_small_terms() {
        assert_eq!(fsum([1e100, 1.0, -1e100]), 1.0);
        assert_eq!(fsum([1.0, 1e100, 1.0, -1e100]), 2.0);
    }

    #[test]
    fn tenths_sum_exactly() {
        let values = vec![0.1; 10];
        assert_eq!(fsum(values.iter().copied()), 1.0);
        let naive: f64 = values.iter().sum();
        assert_ne!(naive, 1.0);
    }

    #[test]
    fn order_does_not_change_result() {
        let forward = [1e16, 1.0, 1e-3, -1e16, 3.5, 2e-7];
        let mut backward = forward;
        backward.reverse();
        assert_eq!(fsum(forward), fsum(backward));
    }

    #[test]
    fn half_way_rounds_to_even() {
        // 1e16 + 1.0 is a tie between 1e16 and 1e16 + 2; the extra tiny term breaks it.
        assert_eq!(fsum([1e16, 1.0, 1e-16]), 10000000000000002.0);
    }

    #[test]
    fn overflow_saturates_to_infinity() {
        assert_eq!(fsum([1e308, 1e308]), f64::INFINITY);
        assert_eq!(fsum([-1e308, -1e308, 1.0]), f64::NEG_INFINITY);
        assert_eq!(fsum([f64::MAX, 1.0]), f64::MAX);
    }

    #[test]
    fn infinity_propagates() {
        assert_eq!(fsum([1.0, f64::INFINITY]), f64::INFINITY);
        assert!(fsum([f64::INFINITY, f64::NEG_INFINITY]).is_nan());
    }
}
