/// The runtime value.
///
/// Defines the `Value` enum, its typed accessors, conversion into a declared
/// type and display formatting.
pub mod core;
/// Static types.
///
/// A `Type` is a major kind, an array nesting level and, for tuples and
/// objects, a schema. Defines which types may be stored into which.
pub mod types;
/// Operator type rules shared by the checker and the evaluator.
pub mod promotion;
/// The `imaginary` complex number scalar.
pub mod imaginary;
/// Fixed-arity tuples with declared field types.
pub mod tuple;
/// Homogeneous, resizable collections.
pub mod collection;
/// Native object wrappers.
///
/// A `Complex` aliases a plugin-owned instance and releases it through its
/// native type when the last alias is dropped.
pub mod object;
