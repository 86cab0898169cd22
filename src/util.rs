/// Numeric conversion helpers.
///
/// This module provides the conversions shared by operators, builtins and
/// member calls: integer/numeric promotion, truncation back to integers, and
/// the narrowing of script integers into positions, counts and bytes. Every
/// fallible conversion reports a `RuntimeError` instead of wrapping silently.
pub mod num;
