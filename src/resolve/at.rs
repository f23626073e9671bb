//! Exact-match resolution.

use std::cmp::Ordering;

use crate::error::{MalformedSelectorSnafu, NotFoundSnafu, OutOfBoundsSnafu, ResolveResult};
use crate::lookup::{Lookup, Span};
use crate::scalar::Scalar;
use crate::search::lower_bound;

/// Resolve an exact-match query to a single index.
///
/// Algorithm selection, cheapest first: exact step inversion for integral
/// regular spans, insertion-point binary search for ordered lookups, linear
/// scan otherwise.
pub(crate) fn resolve_at(
    lookup: &Lookup,
    value: &Scalar,
    atol: Option<f64>,
    rtol: Option<f64>,
) -> ResolveResult<usize> {
    if atol.is_some() && rtol.is_some() {
        return MalformedSelectorSnafu {
            reason: "atol and rtol cannot be combined",
        }
        .fail();
    }

    if atol.is_none() && rtol.is_none() && lookup.order().is_ordered() {
        if let Some(index) = regular_arithmetic(lookup, value)? {
            return Ok(index);
        }
    }

    let values = lookup.values();
    if lookup.order().is_ordered() {
        if let Some(first) = lookup.first() {
            if first.partial_cmp(value).is_none() {
                return MalformedSelectorSnafu {
                    reason: format!("value {value} is not comparable with the lookup's values"),
                }
                .fail();
            }
        }
        let i = lower_bound(values, value, lookup.order(), false);
        // The insertion point and its predecessor are the only candidates;
        // with tolerance both can match, in which case the closer one wins
        // and ties go to the lower index.
        let hit = candidate(values, i, value, atol, rtol);
        let prev_hit = i
            .checked_sub(1)
            .and_then(|p| candidate(values, p, value, atol, rtol));
        match (prev_hit, hit) {
            (Some((p, dp)), Some((c, dc))) => {
                if matches!(dc.partial_cmp(&dp), Some(Ordering::Less)) {
                    return Ok(c);
                }
                return Ok(p);
            }
            (Some((p, _)), None) => return Ok(p),
            (None, Some((c, _))) => return Ok(c),
            (None, None) => {}
        }
    } else {
        for (i, v) in values.iter().enumerate() {
            if matches(v, value, atol, rtol) {
                return Ok(i);
            }
        }
    }

    NotFoundSnafu {
        value: value.clone(),
    }
    .fail()
}

/// O(1) inversion of an integral regular step: `i = (value - first) / step`.
/// Returns `Ok(None)` when the lookup or query does not qualify, deferring
/// to the generic search. An exactly-divisible query outside the index range
/// is out of bounds rather than merely missing.
fn regular_arithmetic(lookup: &Lookup, value: &Scalar) -> ResolveResult<Option<usize>> {
    let Span::Regular(step) = lookup.span() else {
        return Ok(None);
    };
    let (Some(step), Some(first), Some(query)) = (
        step.as_exact_i64(),
        lookup.first().and_then(Scalar::as_exact_i64),
        value.as_exact_i64(),
    ) else {
        return Ok(None);
    };
    if step == 0 {
        return Ok(None);
    }
    let delta = query - first;
    if delta % step != 0 {
        return NotFoundSnafu {
            value: value.clone(),
        }
        .fail();
    }
    let index = delta / step;
    if index < 0 || index as usize >= lookup.len() {
        return OutOfBoundsSnafu {
            value: value.clone(),
            len: lookup.len(),
        }
        .fail();
    }
    Ok(Some(index as usize))
}

fn candidate(
    values: &[Scalar],
    index: usize,
    query: &Scalar,
    atol: Option<f64>,
    rtol: Option<f64>,
) -> Option<(usize, Scalar)> {
    let v = values.get(index)?;
    if matches(v, query, atol, rtol) {
        Some((index, v.abs_diff(query).unwrap_or(Scalar::F64(0.0))))
    } else {
        None
    }
}

/// Equality test used by all `at` paths: exact comparison when no tolerance
/// is requested or the values are not numeric, `|x - y| <= atol` otherwise.
/// `rtol` scales by the query's magnitude.
fn matches(v: &Scalar, query: &Scalar, atol: Option<f64>, rtol: Option<f64>) -> bool {
    let exact = matches!(v.partial_cmp(query), Some(Ordering::Equal))
        || (matches!((v, query), (Scalar::Str(a), Scalar::Str(b)) if a == b));
    if exact {
        return true;
    }
    let (Some(a), Some(b)) = (v.as_f64(), query.as_f64()) else {
        return false;
    };
    let tol = match (atol, rtol) {
        (Some(atol), _) => atol,
        (None, Some(rtol)) => rtol * b.abs(),
        (None, None) => return false,
    };
    (a - b).abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::lookup::Lookup;

    fn points(v: &[i64]) -> Lookup {
        Lookup::points_regular(v.iter().copied().map(Scalar::I64).collect(), Scalar::I64(10))
            .unwrap()
    }

    #[test]
    fn exact_hit_uses_step_inversion() {
        let l = points(&[10, 20, 30, 40, 50]);
        assert_eq!(resolve_at(&l, &Scalar::I64(30), None, None).unwrap(), 2);
        assert_eq!(resolve_at(&l, &Scalar::F64(50.0), None, None).unwrap(), 4);
    }

    #[test]
    fn miss_raises_not_found() {
        let l = points(&[10, 20, 30, 40, 50]);
        let err = resolve_at(&l, &Scalar::I64(31), None, None).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn divisible_but_out_of_range_is_out_of_bounds() {
        let l = points(&[10, 20, 30]);
        let err = resolve_at(&l, &Scalar::I64(60), None, None).unwrap_err();
        assert!(matches!(err, ResolveError::OutOfBounds { len: 3, .. }));
    }

    #[test]
    fn tolerance_goes_through_binary_search() {
        let l = points(&[10, 20, 30, 40, 50]);
        assert_eq!(resolve_at(&l, &Scalar::I64(31), Some(2.0), None).unwrap(), 2);
        assert_eq!(
            resolve_at(&l, &Scalar::F64(19.5), Some(1.0), None).unwrap(),
            1
        );
        // Equidistant between 20 and 30: the lower index wins.
        assert_eq!(resolve_at(&l, &Scalar::I64(25), Some(5.0), None).unwrap(), 1);
    }

    #[test]
    fn rtol_scales_with_magnitude() {
        let l = Lookup::points(vec![Scalar::F64(100.0), Scalar::F64(200.0)]).unwrap();
        assert_eq!(
            resolve_at(&l, &Scalar::F64(202.0), None, Some(0.02)).unwrap(),
            1
        );
        let err = resolve_at(&l, &Scalar::F64(202.0), Some(1.0), Some(0.02)).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedSelector { .. }));
    }

    #[test]
    fn reverse_order_arithmetic() {
        let l = Lookup::points_regular(
            [50, 40, 30, 20, 10].iter().copied().map(Scalar::I64).collect(),
            Scalar::I64(-10),
        )
        .unwrap();
        assert_eq!(resolve_at(&l, &Scalar::I64(30), None, None).unwrap(), 2);
        assert_eq!(resolve_at(&l, &Scalar::I64(50), None, None).unwrap(), 0);
    }

    #[test]
    fn unordered_falls_back_to_scan() {
        let l = Lookup::new(
            vec![Scalar::I64(7), Scalar::I64(3), Scalar::I64(9)],
            crate::lookup::Order::Unordered,
            crate::lookup::Sampling::Points,
            crate::lookup::Span::Irregular { lo: None, hi: None },
        )
        .unwrap();
        assert_eq!(resolve_at(&l, &Scalar::I64(3), None, None).unwrap(), 1);
        assert!(resolve_at(&l, &Scalar::I64(4), None, None).is_err());
    }

    #[test]
    fn string_lookup_exact_match() {
        let l = Lookup::categorical(vec![
            Scalar::from("b"),
            Scalar::from("a"),
            Scalar::from("c"),
        ])
        .unwrap();
        assert_eq!(resolve_at(&l, &Scalar::from("a"), None, None).unwrap(), 1);
    }

    #[test]
    fn identity_lookup_positional() {
        let l = Lookup::identity(5);
        assert_eq!(resolve_at(&l, &Scalar::I64(3), None, None).unwrap(), 3);
        assert_eq!(resolve_at(&l, &Scalar::F64(2.0), None, None).unwrap(), 2);
        assert!(matches!(
            resolve_at(&l, &Scalar::I64(5), None, None).unwrap_err(),
            ResolveError::OutOfBounds { .. }
        ));
        assert!(resolve_at(&l, &Scalar::F64(2.4), None, None).is_err());
    }

    #[test]
    fn incomparable_value_is_malformed() {
        let l = points(&[10, 20, 30]);
        let err = resolve_at(&l, &Scalar::from("x"), None, None).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedSelector { .. }));
    }
}
