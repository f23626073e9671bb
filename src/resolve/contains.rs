//! Interval-containment resolution.

use crate::error::{MalformedSelectorSnafu, NotFoundSnafu, OutOfBoundsSnafu, ResolveResult};
use crate::lookup::{Lookup, Order, Sampling};
use crate::scalar::Scalar;
use crate::search::partition_by;

use super::at;

/// Resolve a containment query: the index of the cell whose interval holds
/// the value.
///
/// Cell edges are reconstructed through [`Lookup::cell_bounds`], which
/// already encodes the span-specific rules (step arithmetic for regular
/// spans, stored rows for explicit ones, neighbor midpoints for irregular
/// center-locus cells). Which edge is closed follows from locus and order
/// via [`Lookup::upper_edge_closed`], so a cell always contains its own
/// published value.
pub(crate) fn resolve_contains(lookup: &Lookup, value: &Scalar) -> ResolveResult<usize> {
    match lookup.sampling() {
        Sampling::NoSampling => return at::resolve_at(lookup, value, None, None),
        Sampling::Points => return Err(lookup.unsupported("contains")),
        Sampling::Intervals(_) => {}
    }
    if !lookup.order().is_ordered() {
        return Err(lookup.unsupported("contains"));
    }
    let n = lookup.len();
    if n == 0 {
        return OutOfBoundsSnafu {
            value: value.clone(),
            len: 0usize,
        }
        .fail();
    }
    if let Some(first) = lookup.first() {
        if first.partial_cmp(value).is_none() {
            return MalformedSelectorSnafu {
                reason: format!("value {value} is not comparable with the lookup's values"),
            }
            .fail();
        }
    }

    let closed_hi = lookup.upper_edge_closed();

    // First cell, in index order, that is not entirely on the query's near
    // side. Cells are ordered along the axis, so if any cell contains the
    // value it is exactly this one.
    let candidate = partition_by(n, |i| {
        let (lo, hi) = lookup.cell_bounds(i)?;
        Ok(match lookup.order() {
            Order::ReverseOrdered => {
                // Cells descend with index: skip while entirely above.
                if closed_hi {
                    matches!(lo.partial_cmp(value), Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal))
                } else {
                    matches!(lo.partial_cmp(value), Some(std::cmp::Ordering::Greater))
                }
            }
            _ => {
                // Skip while entirely below.
                if closed_hi {
                    matches!(hi.partial_cmp(value), Some(std::cmp::Ordering::Less))
                } else {
                    matches!(hi.partial_cmp(value), Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal))
                }
            }
        })
    })?;

    if candidate >= n {
        return OutOfBoundsSnafu {
            value: value.clone(),
            len: n,
        }
        .fail();
    }

    let (lo, hi) = lookup.cell_bounds(candidate)?;
    let inside = if closed_hi {
        lo < *value && *value <= hi
    } else {
        lo <= *value && *value < hi
    };
    if inside {
        return Ok(candidate);
    }

    // The candidate starts past the query: either the query precedes the
    // whole lookup, or it fell into a gap between stored cells.
    if candidate == 0 {
        OutOfBoundsSnafu {
            value: value.clone(),
            len: n,
        }
        .fail()
    } else {
        NotFoundSnafu {
            value: value.clone(),
        }
        .fail()
    }
}
