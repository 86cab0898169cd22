/// Core evaluation logic and context management.
///
/// Contains the runtime context with its variable scopes, native type
/// registry, random generator and stop flag, and the expression dispatch.
pub mod core;

/// Operand ownership.
///
/// Tells variables apart from temporaries so operators only allocate when
/// both operands are variables.
pub mod operand;

/// Unary operator evaluation logic.
///
/// Implements negation, unary plus, logical NOT and bitwise NOT.
pub mod unary;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, concatenation, power, comparisons, three-valued logic,
/// bitwise operators and regex matching.
pub mod binary;

/// Builtin functions and native type constructors.
pub mod function;

/// Member calls on strings, byte arrays, tuples, collections and objects.
pub mod member;

/// Statement execution: declarations, assignments, control flow, `try` and
/// `import`.
pub mod statement;
