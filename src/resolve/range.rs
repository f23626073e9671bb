//! Range resolution: contiguous index spans for bounded queries.
//!
//! `between` keeps the cells lying fully inside the query bounds, `touches`
//! keeps every cell the bounds overlap at all. Both are total over ordered
//! lookups: a query that misses everything resolves to an empty range.

use std::cmp::Ordering;
use std::ops::Range;

use crate::error::{MalformedSelectorSnafu, ResolveResult};
use crate::lookup::{Lookup, Order, Sampling};
use crate::scalar::Scalar;
use crate::search::{partition_by, side_search, SearchSide};

/// Resolve a bounded query to the half-open index range of cells fully
/// inside `[start, end]`, with per-endpoint closure flags.
pub(crate) fn resolve_between(
    lookup: &Lookup,
    start: &Scalar,
    end: &Scalar,
    closed_start: bool,
    closed_end: bool,
    kind: &'static str,
) -> ResolveResult<Range<usize>> {
    let Some((lo, hi, closed_lo, closed_hi)) =
        prepare(lookup, start, end, closed_start, closed_end, kind)?
    else {
        return Ok(0..0);
    };

    if matches!(lookup.sampling(), Sampling::Intervals(_)) {
        return cells_between(lookup, &lo, &hi, closed_lo, closed_hi);
    }

    // Point and categorical values are zero-width: containment degenerates
    // to plain value comparison on the raw coordinates.
    let values = lookup.values();
    let order = lookup.order();
    let (a, b) = match order {
        Order::ReverseOrdered => (
            side_search(SearchSide::Upper, values, &hi, order, !closed_hi),
            side_search(SearchSide::Lower, values, &lo, order, !closed_lo),
        ),
        _ => (
            side_search(SearchSide::Lower, values, &lo, order, !closed_lo),
            side_search(SearchSide::Upper, values, &hi, order, !closed_hi),
        ),
    };
    Ok(a..b.max(a))
}

/// Resolve a bounded query to the half-open index range of cells whose
/// extent overlaps `[start, end]` at all. A shared boundary counts.
pub(crate) fn resolve_touches(
    lookup: &Lookup,
    start: &Scalar,
    end: &Scalar,
) -> ResolveResult<Range<usize>> {
    let Some((lo, hi, _, _)) = prepare(lookup, start, end, true, true, "touches")? else {
        return Ok(0..0);
    };

    let n = lookup.len();
    let (a, b) = match lookup.order() {
        Order::ReverseOrdered => (
            partition_by(n, |i| {
                let (cell_lo, _) = lookup.touch_bounds(i)?;
                Ok(cell_lo > hi)
            })?,
            partition_by(n, |i| {
                let (_, cell_hi) = lookup.touch_bounds(i)?;
                Ok(cell_hi >= lo)
            })?,
        ),
        _ => (
            partition_by(n, |i| {
                let (_, cell_hi) = lookup.touch_bounds(i)?;
                Ok(cell_hi < lo)
            })?,
            partition_by(n, |i| {
                let (cell_lo, _) = lookup.touch_bounds(i)?;
                Ok(cell_lo <= hi)
            })?,
        ),
    };
    Ok(a..b.max(a))
}

/// Shared preamble: reject unordered lookups, short-circuit empty ones, put
/// the query bounds in ascending order, and check comparability once so the
/// searches below never see an incomparable pair. Returns `None` when the
/// result is trivially the empty range.
#[allow(clippy::type_complexity)]
fn prepare(
    lookup: &Lookup,
    start: &Scalar,
    end: &Scalar,
    closed_start: bool,
    closed_end: bool,
    kind: &'static str,
) -> ResolveResult<Option<(Scalar, Scalar, bool, bool)>> {
    if !lookup.order().is_ordered() {
        return Err(lookup.unsupported(kind));
    }
    if lookup.is_empty() {
        return Ok(None);
    }
    let (lo, hi, closed_lo, closed_hi) = match start.partial_cmp(end) {
        Some(Ordering::Greater) => (end.clone(), start.clone(), closed_end, closed_start),
        Some(_) => (start.clone(), end.clone(), closed_start, closed_end),
        None => {
            return MalformedSelectorSnafu {
                reason: format!("range bounds {start} and {end} are not comparable"),
            }
            .fail()
        }
    };
    if let Some(first) = lookup.first() {
        if first.partial_cmp(&lo).is_none() {
            return MalformedSelectorSnafu {
                reason: format!("value {lo} is not comparable with the lookup's values"),
            }
            .fail();
        }
    }
    Ok(Some((lo, hi, closed_lo, closed_hi)))
}

/// Interval-sampled `between`: a cell qualifies when its whole extent sits
/// inside the query bounds, honoring the closure flags. A cell whose
/// boundary lands exactly on an open query endpoint is excluded, matching
/// the strict searches on the point path.
fn cells_between(
    lookup: &Lookup,
    lo: &Scalar,
    hi: &Scalar,
    closed_lo: bool,
    closed_hi: bool,
) -> ResolveResult<Range<usize>> {
    let n = lookup.len();
    let lower_ok = |cell_lo: &Scalar| {
        if closed_lo {
            *cell_lo >= *lo
        } else {
            *cell_lo > *lo
        }
    };
    let upper_ok = |cell_hi: &Scalar| {
        if closed_hi {
            *cell_hi <= *hi
        } else {
            *cell_hi < *hi
        }
    };

    let (a, b) = match lookup.order() {
        Order::ReverseOrdered => (
            partition_by(n, |i| {
                let (_, cell_hi) = lookup.cell_bounds(i)?;
                Ok(!upper_ok(&cell_hi))
            })?,
            partition_by(n, |i| {
                let (cell_lo, _) = lookup.cell_bounds(i)?;
                Ok(lower_ok(&cell_lo))
            })?,
        ),
        _ => (
            partition_by(n, |i| {
                let (cell_lo, _) = lookup.cell_bounds(i)?;
                Ok(!lower_ok(&cell_lo))
            })?,
            partition_by(n, |i| {
                let (_, cell_hi) = lookup.cell_bounds(i)?;
                Ok(upper_ok(&cell_hi))
            })?,
        ),
    };
    Ok(a..b.max(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::lookup::Locus;

    fn vals(v: &[i64]) -> Vec<Scalar> {
        v.iter().copied().map(Scalar::I64).collect()
    }

    fn points(v: &[i64]) -> Lookup {
        Lookup::points_regular(vals(v), Scalar::I64(10)).unwrap()
    }

    fn between(l: &Lookup, a: i64, b: i64) -> Range<usize> {
        resolve_between(l, &Scalar::I64(a), &Scalar::I64(b), true, true, "between").unwrap()
    }

    #[test]
    fn closed_between_on_points() {
        let l = points(&[10, 20, 30, 40, 50]);
        assert_eq!(between(&l, 15, 35), 1..3);
        assert_eq!(between(&l, 20, 40), 1..4);
        assert_eq!(between(&l, 0, 100), 0..5);
    }

    #[test]
    fn open_endpoints_exclude_exact_hits() {
        let l = points(&[10, 20, 30, 40, 50]);
        let r =
            resolve_between(&l, &Scalar::I64(20), &Scalar::I64(40), false, true, "interval")
                .unwrap();
        assert_eq!(r, 2..4);
        let r =
            resolve_between(&l, &Scalar::I64(20), &Scalar::I64(40), true, false, "interval")
                .unwrap();
        assert_eq!(r, 1..3);
    }

    #[test]
    fn miss_is_empty_not_error() {
        let l = points(&[10, 20, 30]);
        assert_eq!(between(&l, 100, 200), 3..3);
        assert_eq!(between(&l, -50, -10), 0..0);
        assert_eq!(between(&l, 21, 29), 2..2);
    }

    #[test]
    fn swapped_bounds_normalize() {
        let l = points(&[10, 20, 30, 40, 50]);
        assert_eq!(between(&l, 35, 15), 1..3);
    }

    #[test]
    fn reverse_order_points() {
        let l = Lookup::points_regular(vals(&[50, 40, 30, 20, 10]), Scalar::I64(-10)).unwrap();
        // Values 40 and 30 sit at indices 1 and 2.
        assert_eq!(between(&l, 25, 45), 1..3);
        assert_eq!(between(&l, 0, 100), 0..5);
        assert_eq!(between(&l, 41, 49), 1..1);
    }

    #[test]
    fn interval_cells_must_fit_entirely() {
        // Cells [10,20), [20,30), [30,40).
        let l =
            Lookup::intervals_regular(vals(&[10, 20, 30]), Locus::Start, Scalar::I64(10)).unwrap();
        assert_eq!(between(&l, 10, 30), 0..2);
        // [15, 35] clips the first and last cell.
        assert_eq!(between(&l, 15, 35), 1..2);
        assert_eq!(between(&l, 10, 40), 0..3);
    }

    #[test]
    fn open_endpoints_exclude_boundary_cells() {
        // Cells [10,20), [20,30), [30,40): a boundary sitting exactly on an
        // open endpoint pushes that side one cell inward.
        let l =
            Lookup::intervals_regular(vals(&[10, 20, 30]), Locus::Start, Scalar::I64(10)).unwrap();
        let r = resolve_between(&l, &Scalar::I64(10), &Scalar::I64(40), true, false, "interval")
            .unwrap();
        assert_eq!(r, 0..2);
        let r = resolve_between(&l, &Scalar::I64(10), &Scalar::I64(40), false, true, "interval")
            .unwrap();
        assert_eq!(r, 1..3);
        let r = resolve_between(&l, &Scalar::I64(10), &Scalar::I64(40), false, false, "interval")
            .unwrap();
        assert_eq!(r, 1..2);
    }

    #[test]
    fn reverse_interval_cells() {
        // Cell extents 20..30, 10..20, 0..10 at indices 0,1,2.
        let l = Lookup::intervals_regular(vals(&[30, 20, 10]), Locus::Start, Scalar::I64(-10))
            .unwrap();
        assert_eq!(between(&l, 0, 30), 0..3);
        assert_eq!(between(&l, 5, 30), 0..2);
        assert_eq!(between(&l, 10, 25), 1..2);
    }

    #[test]
    fn touches_buffers_regular_points() {
        let l = points(&[10, 20, 30, 40, 50]);
        // Buffered cells are [5,15], [15,25], ...; [15,19] grazes the first
        // and lands in the second.
        let r = resolve_touches(&l, &Scalar::I64(15), &Scalar::I64(19)).unwrap();
        assert_eq!(r, 0..2);
        let r = resolve_touches(&l, &Scalar::I64(26), &Scalar::I64(26)).unwrap();
        assert_eq!(r, 2..3);
    }

    #[test]
    fn touches_interval_cells_on_boundary() {
        // Cells [10,20), [20,30), [30,40).
        let l =
            Lookup::intervals_regular(vals(&[10, 20, 30]), Locus::Start, Scalar::I64(10)).unwrap();
        // [20, 20] touches both cells that share the edge.
        let r = resolve_touches(&l, &Scalar::I64(20), &Scalar::I64(20)).unwrap();
        assert_eq!(r, 0..2);
        let r = resolve_touches(&l, &Scalar::I64(15), &Scalar::I64(35)).unwrap();
        assert_eq!(r, 0..3);
        let r = resolve_touches(&l, &Scalar::I64(50), &Scalar::I64(60)).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn touches_reverse_order() {
        let l = Lookup::points_regular(vals(&[50, 40, 30, 20, 10]), Scalar::I64(-10)).unwrap();
        // Buffered cells descend: [45,55], [35,45], [25,35], ...
        let r = resolve_touches(&l, &Scalar::I64(26), &Scalar::I64(36)).unwrap();
        assert_eq!(r, 1..3);
    }

    #[test]
    fn unordered_is_rejected() {
        let l = Lookup::categorical(vals(&[3, 1, 2])).unwrap();
        assert!(matches!(
            resolve_between(&l, &Scalar::I64(1), &Scalar::I64(2), true, true, "between")
                .unwrap_err(),
            ResolveError::UnsupportedCombination { .. }
        ));
        assert!(matches!(
            resolve_touches(&l, &Scalar::I64(1), &Scalar::I64(2)).unwrap_err(),
            ResolveError::UnsupportedCombination { .. }
        ));
    }

    #[test]
    fn empty_lookup_resolves_empty() {
        let l = Lookup::points(vec![]).unwrap();
        assert_eq!(between(&l, 0, 10), 0..0);
        assert_eq!(
            resolve_touches(&l, &Scalar::I64(0), &Scalar::I64(10)).unwrap(),
            0..0
        );
    }

    #[test]
    fn incomparable_bounds_are_malformed() {
        let l = points(&[10, 20, 30]);
        assert!(matches!(
            resolve_between(&l, &Scalar::from("a"), &Scalar::I64(5), true, true, "between")
                .unwrap_err(),
            ResolveError::MalformedSelector { .. }
        ));
    }
}
