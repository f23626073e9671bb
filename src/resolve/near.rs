//! Nearest-neighbor resolution.

use std::cmp::Ordering;

use snafu::prelude::*;

use crate::error::{MalformedSelectorSnafu, OutOfBoundsSnafu, ResolveResult};
use crate::lookup::{Locus, Lookup, Sampling, Span};
use crate::scalar::Scalar;
use crate::search::{clamp_to_bounds, locus_adjust, lower_bound};

use super::at;

/// Resolve a nearest-neighbor query to a single index.
///
/// Total for ordered lookups: out-of-range queries clamp to the nearest
/// extreme instead of raising. A value exactly halfway between two cells is
/// claimed by whichever neighbor's boundary convention is closed on that
/// side: `Start`-locus ties go to the next cell, everything else keeps the
/// previous one.
pub(crate) fn resolve_near(lookup: &Lookup, value: &Scalar) -> ResolveResult<usize> {
    if matches!(lookup.sampling(), Sampling::NoSampling) {
        // Nearest has no meaning without comparable spacing; exact match is
        // the best a categorical lookup can do.
        return at::resolve_at(lookup, value, None, None);
    }
    if !lookup.order().is_ordered() {
        return Err(lookup.unsupported("near"));
    }
    if lookup.is_empty() {
        return OutOfBoundsSnafu {
            value: value.clone(),
            len: 0usize,
        }
        .fail();
    }

    let locus = lookup.sampling().locus();
    if matches!(lookup.span(), Span::Irregular { .. } | Span::Explicit { .. })
        && matches!(lookup.sampling(), Sampling::Intervals(Locus::Start | Locus::End))
    {
        // Distance to a cell center is ill-defined without a uniform step;
        // Contains is the right query for these lookups.
        return Err(lookup.unsupported("near"));
    }

    let adjusted = match (lookup.sampling(), lookup.span()) {
        (Sampling::Intervals(locus), Span::Regular(step)) => locus_adjust(locus, step, value)
            .context(MalformedSelectorSnafu {
                reason: "near requires numeric or time-typed values",
            })?,
        _ => value.clone(),
    };
    if let Some(first) = lookup.first() {
        if first.partial_cmp(&adjusted).is_none() {
            return MalformedSelectorSnafu {
                reason: format!("value {value} is not comparable with the lookup's values"),
            }
            .fail();
        }
    }

    let values = lookup.values();
    let i = lower_bound(values, &adjusted, lookup.order(), false);
    if i == 0 {
        return Ok(0);
    }
    if i >= values.len() {
        return Ok(clamp_to_bounds(i, values.len()));
    }

    let dist = |x: &Scalar| -> ResolveResult<Scalar> {
        x.abs_diff(&adjusted).context(MalformedSelectorSnafu {
            reason: "near requires numeric or time-typed values",
        })
    };
    let d_prev = dist(&values[i - 1])?;
    let d_here = dist(&values[i])?;
    let keep_prev_on_tie = !matches!(locus, Locus::Start);
    match d_prev.partial_cmp(&d_here) {
        Some(Ordering::Less) => Ok(i - 1),
        Some(Ordering::Equal) if keep_prev_on_tie => Ok(i - 1),
        _ => Ok(i),
    }
}
