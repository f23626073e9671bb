//! Coordinate scalar values.
//!
//! Lookups hold a homogeneous sequence of these; selectors carry them as
//! query values. Cross-kind comparison promotes through `i128` (integer and
//! time kinds) or `f64` (anything involving floats), so an `I64` lookup can
//! be queried with an `F64` value and vice versa.

use std::cmp::Ordering;
use std::fmt;

/// A single coordinate value.
#[derive(Debug, Clone)]
pub enum Scalar {
    I64(i64),
    U64(u64),
    F64(f64),
    /// Nanoseconds since unix epoch.
    DatetimeNs(i64),
    /// Nanoseconds duration.
    DurationNs(i64),
    /// Categorical code or label.
    Str(String),
}

impl Scalar {
    fn as_i128_orderable(&self) -> Option<i128> {
        match self {
            Scalar::I64(v) => Some(*v as i128),
            Scalar::U64(v) => Some(*v as i128),
            Scalar::DatetimeNs(v) => Some(*v as i128),
            Scalar::DurationNs(v) => Some(*v as i128),
            Scalar::F64(_) | Scalar::Str(_) => None,
        }
    }

    /// Lossy float view. `None` for categorical values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(v) => Some(*v as f64),
            Scalar::U64(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            Scalar::DatetimeNs(v) => Some(*v as f64),
            Scalar::DurationNs(v) => Some(*v as f64),
            Scalar::Str(_) => None,
        }
    }

    /// Exact integer view, if this value is integral and fits in `i64`.
    pub(crate) fn as_exact_i64(&self) -> Option<i64> {
        match self {
            Scalar::I64(v) | Scalar::DatetimeNs(v) | Scalar::DurationNs(v) => Some(*v),
            Scalar::U64(v) => i64::try_from(*v).ok(),
            Scalar::F64(v) => {
                if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Some(*v as i64)
                } else {
                    None
                }
            }
            Scalar::Str(_) => None,
        }
    }

    /// Sum of two scalars. Integer and time kinds stay exact; overflow and
    /// mixed float operands promote to `F64`. `None` for categorical values.
    pub(crate) fn add(&self, other: &Scalar) -> Option<Scalar> {
        use Scalar::*;
        match (self, other) {
            (Str(_), _) | (_, Str(_)) => None,
            (I64(a), I64(b)) => Some(match a.checked_add(*b) {
                Some(v) => I64(v),
                None => F64(*a as f64 + *b as f64),
            }),
            (U64(a), U64(b)) => Some(match a.checked_add(*b) {
                Some(v) => U64(v),
                None => F64(*a as f64 + *b as f64),
            }),
            (DatetimeNs(a), DurationNs(b) | I64(b)) | (DurationNs(b) | I64(b), DatetimeNs(a)) => {
                Some(match a.checked_add(*b) {
                    Some(v) => DatetimeNs(v),
                    None => F64(*a as f64 + *b as f64),
                })
            }
            (DurationNs(a), DurationNs(b) | I64(b)) | (I64(b), DurationNs(a)) => {
                Some(match a.checked_add(*b) {
                    Some(v) => DurationNs(v),
                    None => F64(*a as f64 + *b as f64),
                })
            }
            _ => Some(F64(self.as_f64()? + other.as_f64()?)),
        }
    }

    /// Difference of two scalars, `self - other`. The difference of two
    /// datetimes is a duration.
    pub(crate) fn sub(&self, other: &Scalar) -> Option<Scalar> {
        use Scalar::*;
        match (self, other) {
            (Str(_), _) | (_, Str(_)) => None,
            (I64(a), I64(b)) => Some(match a.checked_sub(*b) {
                Some(v) => I64(v),
                None => F64(*a as f64 - *b as f64),
            }),
            (U64(a), U64(b)) => Some(if a >= b {
                U64(a - b)
            } else {
                match i64::try_from(b - a) {
                    Ok(d) => I64(-d),
                    Err(_) => F64(*a as f64 - *b as f64),
                }
            }),
            (DatetimeNs(a), DatetimeNs(b)) => Some(match a.checked_sub(*b) {
                Some(v) => DurationNs(v),
                None => F64(*a as f64 - *b as f64),
            }),
            (DatetimeNs(a), DurationNs(b) | I64(b)) => Some(match a.checked_sub(*b) {
                Some(v) => DatetimeNs(v),
                None => F64(*a as f64 - *b as f64),
            }),
            (DurationNs(a), DurationNs(b) | I64(b)) => Some(match a.checked_sub(*b) {
                Some(v) => DurationNs(v),
                None => F64(*a as f64 - *b as f64),
            }),
            _ => Some(F64(self.as_f64()? - other.as_f64()?)),
        }
    }

    /// Half of a scalar. Stays exact for even integers, promotes to `F64`
    /// for odd ones.
    pub(crate) fn half(&self) -> Option<Scalar> {
        use Scalar::*;
        match self {
            I64(v) => Some(if v % 2 == 0 { I64(v / 2) } else { F64(*v as f64 / 2.0) }),
            U64(v) => Some(if v % 2 == 0 { U64(v / 2) } else { F64(*v as f64 / 2.0) }),
            F64(v) => Some(F64(v / 2.0)),
            DatetimeNs(v) => Some(if v % 2 == 0 {
                DatetimeNs(v / 2)
            } else {
                F64(*v as f64 / 2.0)
            }),
            DurationNs(v) => Some(if v % 2 == 0 {
                DurationNs(v / 2)
            } else {
                F64(*v as f64 / 2.0)
            }),
            Str(_) => None,
        }
    }

    fn abs(self) -> Option<Scalar> {
        use Scalar::*;
        match self {
            I64(v) => Some(I64(v.saturating_abs())),
            U64(v) => Some(U64(v)),
            F64(v) => Some(F64(v.abs())),
            DatetimeNs(v) => Some(DatetimeNs(v.saturating_abs())),
            DurationNs(v) => Some(DurationNs(v.saturating_abs())),
            Str(_) => None,
        }
    }

    /// Absolute distance between two scalars, used by nearest-neighbor
    /// resolution. Exact for integer and time kinds.
    pub(crate) fn abs_diff(&self, other: &Scalar) -> Option<Scalar> {
        self.sub(other)?.abs()
    }
}

/// Midpoint of two scalars, computed as `a + (b - a) / 2` so that time kinds
/// stay in their own kind (datetime midpoints go through a duration).
pub(crate) fn midpoint(a: &Scalar, b: &Scalar) -> Option<Scalar> {
    a.add(&b.sub(a)?.half()?)
}

// Equality goes through the same promotion as ordering so that, e.g.,
// `I64(3)`, `U64(3)` and `F64(3.0)` are one value.
impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        matches!(self.partial_cmp(other), Some(Ordering::Equal))
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::F64(a), Scalar::F64(b)) => a.partial_cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => Some(a.cmp(b)),
            (Scalar::Str(_), _) | (_, Scalar::Str(_)) => None,
            (Scalar::F64(a), b) => a.partial_cmp(&(b.as_i128_orderable()? as f64)),
            (a, Scalar::F64(b)) => (a.as_i128_orderable()? as f64).partial_cmp(b),
            _ => Some(self.as_i128_orderable()?.cmp(&other.as_i128_orderable()?)),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::U64(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v}"),
            Scalar::DatetimeNs(v) => write!(f, "{v}ns"),
            Scalar::DurationNs(v) => write!(f, "{v}ns"),
            Scalar::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Scalar {
        Scalar::I64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Scalar {
        Scalar::I64(v as i64)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Scalar {
        Scalar::U64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Scalar {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Scalar {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Scalar {
        Scalar::Str(v)
    }
}
