/// The builtin table and call dispatch.
///
/// Declares every builtin with its arity, argument classes, result type and
/// null policy, and evaluates calls to builtins and native constructors.
pub mod core;
/// Numeric builtins.
///
/// Rounding, roots, logarithms, trigonometry, `min`/`max`/`clamp`, `pow`,
/// imaginary construction and `random`.
pub mod math;
/// `hex`, `hash`, base64 and `bytes`.
pub mod encoding;
/// String builtins: trimming, case, substrings and `chr`.
pub mod string;
/// Conversions and type inspection: `bool`, `num`, `int`, `str`, `isnull`,
/// `typeof`, `tup` and `tab`.
pub mod convert;
/// Standard input and the `input` builtin.
pub mod input;
/// `print` and `assert`.
pub mod print;
