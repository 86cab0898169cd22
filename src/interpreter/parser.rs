/// Entry points of the parser.
///
/// Contains the expression entry point and the statement sequence parser
/// shared by scripts and blocks.
pub mod core;

/// Unary, power, postfix and primary expressions.
///
/// Handles prefix operators, `**`, indexing, tuple fields, member calls,
/// literals, calls and grouping.
pub mod unary;

/// Binary operator precedence levels.
///
/// Implements the left-associative levels from `or` down to `* / %`.
pub mod binary;

/// Block parsing.
///
/// Parses brace-delimited statement lists and `do { ... }` bodies.
pub mod block;

/// Utility functions for the parser.
pub mod utils;

/// Statement parsing.
///
/// Implements declarations, assignments, control flow, `raise`, `try` and
/// `import`.
pub mod statement;
