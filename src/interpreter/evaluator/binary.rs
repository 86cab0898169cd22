/// Operator dispatch.
///
/// Evaluates operands with their ownership, checks the operator's domain and
/// routes to the operator families below.
pub mod core;

/// `+ - * / %` on numbers.
pub mod arithmetic;

/// String and byte array concatenation with `+`.
pub mod concat;

/// Exponentiation, shared by `**` and `pow`.
pub mod power;

/// Equality and ordering with their null rules.
pub mod comparison;

/// Three-valued `and`, `or` and `xor` with short-circuit evaluation.
pub mod logic;

/// Bitwise operators on integers and booleans.
pub mod bitwise;

/// Regular expression match `~=`.
pub mod matching;
