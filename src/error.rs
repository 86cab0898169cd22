use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing, parsing and static
/// checking of source code: syntax mistakes, unexpected tokens, invalid
/// literals, unknown names and static type or arity mismatches.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, together
/// with their fixed numeric codes and the exception names used by `catch`.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::{ErrorCode, RuntimeError};

/// Any failure of a complete script run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// The script was rejected before execution.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The script failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
