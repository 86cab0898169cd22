/// The checker state: scoped static types, imports and the registry.
pub mod core;
/// Static types of expressions.
///
/// Operators follow the promotion rules, calls are matched against the
/// builtin table or a native type's constructors, and member calls against the
/// sequence methods or a native type's method table.
pub mod expression;
/// Statement checking: declarations, assignments, conditions, loops, `try`
/// and `import`.
pub mod statement;
