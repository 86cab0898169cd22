use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest magnitude an `f64` can hold while still converting to `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Promotes an integer to a numeric value.
///
/// Integers beyond 2^53 lose precision, exactly as they would in any other
/// mixed integer/numeric operation.
///
/// ## Example
/// ```
/// use bloc::util::num::int_to_numeric;
///
/// assert_eq!(int_to_numeric(42), 42.0);
/// assert_eq!(int_to_numeric(-7), -7.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn int_to_numeric(value: i64) -> f64 {
    value as f64
}

/// Truncates a numeric value toward zero into an integer.
///
/// ## Errors
/// Returns `OutOfRange` for NaN, infinities and values outside the `i64`
/// range.
///
/// ## Example
/// ```
/// use bloc::util::num::numeric_to_int;
///
/// assert_eq!(numeric_to_int(4.56, 1).unwrap(), 4);
/// assert_eq!(numeric_to_int(-4.56, 1).unwrap(), -4);
/// assert!(numeric_to_int(f64::NAN, 1).is_err());
/// assert!(numeric_to_int(1e300, 1).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn numeric_to_int(value: f64, line: usize) -> EvalResult<i64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated >= I64_BOUND || truncated < -I64_BOUND {
        return Err(RuntimeError::OutOfRange { details: format!("{value} does not fit in an integer"),
                                              line });
    }
    Ok(truncated as i64)
}

/// Converts a script position into a `usize`.
///
/// ## Errors
/// Returns `IndexRange` when the position is negative.
///
/// ## Example
/// ```
/// use bloc::util::num::position;
///
/// assert_eq!(position(3, 10, 1).unwrap(), 3);
/// assert!(position(-1, 10, 1).is_err());
/// ```
pub fn position(value: i64, size: usize, line: usize) -> EvalResult<usize> {
    usize::try_from(value).map_err(|_| RuntimeError::IndexRange { index: value,
                                                                  size,
                                                                  line })
}

/// Converts a length into a script integer, saturating at `i64::MAX`.
///
/// ## Example
/// ```
/// use bloc::util::num::length;
///
/// assert_eq!(length(12), 12);
/// ```
#[must_use]
pub fn length(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Converts a non-negative script integer into a `usize` count.
///
/// ## Errors
/// Returns `OutOfRange` when the value is negative.
pub fn count(value: i64, what: &str, line: usize) -> EvalResult<usize> {
    usize::try_from(value).map_err(|_| RuntimeError::OutOfRange { details: format!("{what} must not be negative, found {value}"),
                                                                  line })
}

/// Builds `n` copies of `value`, failing instead of aborting when the
/// allocation cannot be made.
///
/// ## Errors
/// Returns `OutOfRange` when `n` elements do not fit in memory.
///
/// ## Example
/// ```
/// use bloc::util::num::filled;
///
/// assert_eq!(filled(3, 0u8, "byte count", 1).unwrap(), vec![0, 0, 0]);
/// assert!(filled(usize::MAX, 0u8, "byte count", 1).is_err());
/// ```
pub fn filled<T: Clone>(n: usize, value: T, what: &str, line: usize) -> EvalResult<Vec<T>> {
    let mut items = Vec::new();
    items.try_reserve_exact(n)
         .map_err(|_| RuntimeError::OutOfRange { details: format!("{what} {n} is too large"),
                                                 line })?;
    items.resize(n, value);
    Ok(items)
}

/// Narrows a script integer to a byte.
///
/// ## Errors
/// Returns `OutOfRange` for values outside `0..=255`.
///
/// ## Example
/// ```
/// use bloc::util::num::byte;
///
/// assert_eq!(byte(65, 1).unwrap(), b'A');
/// assert!(byte(256, 1).is_err());
/// ```
pub fn byte(value: i64, line: usize) -> EvalResult<u8> {
    u8::try_from(value).map_err(|_| RuntimeError::OutOfRange { details: format!("{value} is not a byte"),
                                                               line })
}
