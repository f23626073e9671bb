//! Direction-aware insertion-point searches shared by the resolvers.
//!
//! These are the only sub-linear paths in the engine. Both bound searches
//! treat `partial_cmp` returning `None` as "keep going right", which makes
//! incomparable targets fall off the end instead of panicking; callers
//! check comparability up front where it matters.

use std::cmp::Ordering;

use crate::lookup::{Locus, Order};
use crate::scalar::Scalar;

/// Which end of a query range a search is resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchSide {
    Lower,
    Upper,
}

/// Insertion point for the lower side of a range.
///
/// Forward order: first index with value `>= target` (`> target` when
/// strict). Reverse order: first index with value `<= target` (`< target`
/// when strict).
pub(crate) fn lower_bound(values: &[Scalar], target: &Scalar, order: Order, strict: bool) -> usize {
    let mut lo = 0usize;
    let mut hi = values.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let cmp = values[mid].partial_cmp(target);
        let go_left = match (order, strict, cmp) {
            (Order::ForwardOrdered, false, Some(Ordering::Greater | Ordering::Equal)) => true,
            (Order::ForwardOrdered, true, Some(Ordering::Greater)) => true,
            (Order::ReverseOrdered, false, Some(Ordering::Less | Ordering::Equal)) => true,
            (Order::ReverseOrdered, true, Some(Ordering::Less)) => true,
            _ => false,
        };
        if go_left {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Insertion point for the upper side of a range, returned end-exclusive.
///
/// Forward order: first index with value `> target` (`>= target` when
/// strict), so the preceding prefix satisfies `<= target` (`< target`).
pub(crate) fn upper_bound(values: &[Scalar], target: &Scalar, order: Order, strict: bool) -> usize {
    let mut lo = 0usize;
    let mut hi = values.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let cmp = values[mid].partial_cmp(target);
        let go_left = match (order, strict, cmp) {
            (Order::ForwardOrdered, true, Some(Ordering::Greater | Ordering::Equal)) => true,
            (Order::ForwardOrdered, false, Some(Ordering::Greater)) => true,
            (Order::ReverseOrdered, true, Some(Ordering::Less | Ordering::Equal)) => true,
            (Order::ReverseOrdered, false, Some(Ordering::Less)) => true,
            _ => false,
        };
        if go_left {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Pick the bound search for one side of a query so that both orders come
/// out right: the returned index is the boundary adjacent to the query's
/// `target` on the given value-space side. For forward order `Lower` is a
/// range start and `Upper` an exclusive range end; reverse order swaps the
/// roles, which is exactly what the caller wants when it also swaps which
/// query bound it passes.
pub(crate) fn side_search(
    side: SearchSide,
    values: &[Scalar],
    target: &Scalar,
    order: Order,
    strict: bool,
) -> usize {
    match (side, order) {
        (SearchSide::Lower, Order::ForwardOrdered) | (SearchSide::Upper, Order::ReverseOrdered) => {
            lower_bound(values, target, order, strict)
        }
        _ => upper_bound(values, target, order, strict),
    }
}

/// Shift a query value so that searching the published coordinates compares
/// against cell centers: the published value sits `step/2` after the center
/// for `Start` locus and `step/2` before it for `End`. The signed step makes
/// the same formula work for both orders.
pub(crate) fn locus_adjust(locus: Locus, step: &Scalar, value: &Scalar) -> Option<Scalar> {
    match locus {
        Locus::Center => Some(value.clone()),
        Locus::Start => value.sub(&step.half()?),
        Locus::End => value.add(&step.half()?),
    }
}

/// Clamp an insertion point to the last valid position.
pub(crate) fn clamp_to_bounds(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Fallible partition point: first index in `0..n` where `pred` is false,
/// assuming `pred` is true on a (possibly empty) prefix. Lets the cell-bound
/// searches propagate reconstruction errors out of the comparison closure.
pub(crate) fn partition_by<E>(
    n: usize,
    mut pred: impl FnMut(usize) -> Result<bool, E>,
) -> Result<usize, E> {
    let mut lo = 0usize;
    let mut hi = n;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid)? {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(v: &[i64]) -> Vec<Scalar> {
        v.iter().copied().map(Scalar::I64).collect()
    }

    #[test]
    fn forward_bounds() {
        let v = vals(&[10, 20, 20, 30]);
        let t = Scalar::I64(20);
        assert_eq!(lower_bound(&v, &t, Order::ForwardOrdered, false), 1);
        assert_eq!(lower_bound(&v, &t, Order::ForwardOrdered, true), 3);
        assert_eq!(upper_bound(&v, &t, Order::ForwardOrdered, false), 3);
        assert_eq!(upper_bound(&v, &t, Order::ForwardOrdered, true), 1);
    }

    #[test]
    fn reverse_bounds() {
        let v = vals(&[30, 20, 10]);
        let t = Scalar::I64(20);
        // First index with value <= 20.
        assert_eq!(lower_bound(&v, &t, Order::ReverseOrdered, false), 1);
        // First index with value < 20.
        assert_eq!(lower_bound(&v, &t, Order::ReverseOrdered, true), 2);
        assert_eq!(upper_bound(&v, &t, Order::ReverseOrdered, false), 2);
        assert_eq!(upper_bound(&v, &t, Order::ReverseOrdered, true), 1);
    }

    #[test]
    fn bounds_off_both_ends() {
        let v = vals(&[10, 20, 30]);
        assert_eq!(
            lower_bound(&v, &Scalar::I64(5), Order::ForwardOrdered, false),
            0
        );
        assert_eq!(
            lower_bound(&v, &Scalar::I64(35), Order::ForwardOrdered, false),
            3
        );
    }

    #[test]
    fn locus_adjustments() {
        let step = Scalar::I64(10);
        let q = Scalar::I64(26);
        assert_eq!(locus_adjust(Locus::Center, &step, &q), Some(Scalar::I64(26)));
        assert_eq!(locus_adjust(Locus::Start, &step, &q), Some(Scalar::I64(21)));
        assert_eq!(locus_adjust(Locus::End, &step, &q), Some(Scalar::I64(31)));
    }

    #[test]
    fn partition_by_finds_prefix_end() {
        let end = partition_by::<()>(10, |i| Ok(i < 7)).unwrap();
        assert_eq!(end, 7);
        assert_eq!(partition_by::<()>(0, |_| Ok(true)).unwrap(), 0);
    }

    #[test]
    fn clamp_stays_in_range() {
        assert_eq!(clamp_to_bounds(5, 3), 2);
        assert_eq!(clamp_to_bounds(1, 3), 1);
        assert_eq!(clamp_to_bounds(0, 0), 0);
    }
}
