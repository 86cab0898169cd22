use thiserror::Error;

/// Numeric error codes surfaced to embedders.
///
/// The numbering is fixed: scripts and host applications may persist or
/// compare these values, so new kinds are only ever appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// Division or modulo by an integer or numeric zero.
    DivideByZero      = 1,
    /// A numeric argument is outside the domain accepted by an operation.
    OutOfRange        = 2,
    /// A position is outside the bounds of a string, byte array or collection.
    IndexRange        = 3,
    /// A value does not have the type required by the operation.
    TypeMismatch      = 4,
    /// An operator was applied to operands outside its domain.
    InvalidExpression = 5,
    /// The operation exists but is not implemented for these operands.
    NotImplemented    = 6,
    /// A literal could not be converted to a number or boolean.
    StringToNumber    = 7,
    /// A structural operation was attempted on a null value.
    NullPointer       = 8,
    /// An error raised by the script with `raise`.
    UserRaised        = 9,
    /// A name could not be resolved at run time.
    UnknownSymbol     = 10,
    /// A call supplied the wrong number of arguments.
    ArgumentCount     = 11,
    /// An `assert` did not hold.
    AssertionFailed   = 12,
    /// A regular expression could not be compiled.
    Regex             = 13,
    /// A native object reported a failure.
    Plugin            = 14,
    /// Evaluation was stopped through the context stop flag.
    Interrupted       = 15,
    /// Reading from standard input failed.
    Io                = 16,
}

#[derive(Debug, Clone, PartialEq, Error)]
/// Represents all errors that can occur during evaluation.
///
/// Every variant carries the source line of the expression that failed, so
/// the message can point the user at the offending statement.
pub enum RuntimeError {
    /// Division or modulo by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivideByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric argument is outside the accepted domain.
    #[error("Error on line {line}: Value out of range: {details}.")]
    OutOfRange {
        /// What was out of range.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A position is outside the bounds of the receiver.
    #[error("Error on line {line}: Index {index} is out of range for size {size}.")]
    IndexRange {
        /// The requested position.
        index: i64,
        /// The size of the indexed value.
        size:  usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A value had an unexpected type.
    #[error("Error on line {line}: Type mismatch: {details}.")]
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An operator was applied outside its domain.
    #[error("Error on line {line}: Invalid expression: {details}.")]
    InvalidExpression {
        /// Details about the invalid operation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The operation is not supported for these operands.
    #[error("Error on line {line}: Not implemented: {details}.")]
    NotImplemented {
        /// The unsupported operation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A literal could not be converted to a number.
    #[error("Error on line {line}: Cannot convert '{text}' to a number.")]
    StringToNumber {
        /// The offending text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A structural operation was applied to a null value.
    #[error("Error on line {line}: Null value.")]
    NullPointer {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to use an undefined variable.
    #[error("Error on line {line}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called an unknown function or constructor.
    #[error("Error on line {line}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Imported a native type that is not registered.
    #[error("Error on line {line}: Unknown type '{name}'.")]
    UnknownType {
        /// The name of the type.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The wrong number of arguments was supplied to a call.
    #[error("Error on line {line}: Argument count mismatch calling '{name}'.")]
    ArgumentCountMismatch {
        /// The function or method being called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An assertion failed during execution.
    #[error("Error on line {line}: Assertion failed.")]
    AssertionFailed {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A regular expression did not compile.
    #[error("Error on line {line}: Invalid regular expression: {message}")]
    Regex {
        /// The message of the regex engine.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A native object reported an error.
    #[error("Error on line {line}: {name}: {message}.")]
    Plugin {
        /// The native type name.
        name:    String,
        /// The failure reported by the native type.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A script raised an error with `raise`.
    #[error("Error on line {line}: Unhandled exception '{name}'.")]
    Raised {
        /// The exception name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Evaluation was stopped from outside.
    #[error("Error on line {line}: Interrupted.")]
    Interrupted {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Reading from standard input failed.
    #[error("Error on line {line}: I/O error: {message}.")]
    Io {
        /// The underlying I/O message.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl RuntimeError {
    /// Returns the fixed numeric code of this error.
    ///
    /// # Example
    /// ```
    /// use bloc::error::{ErrorCode, RuntimeError};
    ///
    /// let err = RuntimeError::DivideByZero { line: 3 };
    /// assert_eq!(err.code(), ErrorCode::DivideByZero);
    /// assert_eq!(err.code() as u16, 1);
    /// ```
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DivideByZero { .. } => ErrorCode::DivideByZero,
            Self::OutOfRange { .. } => ErrorCode::OutOfRange,
            Self::IndexRange { .. } => ErrorCode::IndexRange,
            Self::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Self::InvalidExpression { .. } => ErrorCode::InvalidExpression,
            Self::NotImplemented { .. } => ErrorCode::NotImplemented,
            Self::StringToNumber { .. } => ErrorCode::StringToNumber,
            Self::NullPointer { .. } => ErrorCode::NullPointer,
            Self::UnknownVariable { .. } | Self::UnknownFunction { .. } | Self::UnknownType { .. } => {
                ErrorCode::UnknownSymbol
            },
            Self::ArgumentCountMismatch { .. } => ErrorCode::ArgumentCount,
            Self::AssertionFailed { .. } => ErrorCode::AssertionFailed,
            Self::Regex { .. } => ErrorCode::Regex,
            Self::Plugin { .. } => ErrorCode::Plugin,
            Self::Raised { .. } => ErrorCode::UserRaised,
            Self::Interrupted { .. } => ErrorCode::Interrupted,
            Self::Io { .. } => ErrorCode::Io,
        }
    }

    /// Returns the exception name a `catch` clause matches against.
    ///
    /// Errors raised by scripts keep the name they were raised with, so
    /// `raise divide_by_zero` is caught by the same handler as a real division
    /// by zero.
    ///
    /// # Example
    /// ```
    /// use bloc::error::RuntimeError;
    ///
    /// let err = RuntimeError::IndexRange { index: 7,
    ///                                      size:  3,
    ///                                      line:  1, };
    /// assert_eq!(err.exception_name(), "index_range");
    ///
    /// let raised = RuntimeError::Raised { name: "my_error".to_string(),
    ///                                     line: 2, };
    /// assert_eq!(raised.exception_name(), "my_error");
    /// ```
    #[must_use]
    pub fn exception_name(&self) -> &str {
        match self {
            Self::DivideByZero { .. } => "divide_by_zero",
            Self::OutOfRange { .. } => "out_of_range",
            Self::IndexRange { .. } => "index_range",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::InvalidExpression { .. } => "invalid_expression",
            Self::NotImplemented { .. } => "not_implemented",
            Self::StringToNumber { .. } => "string_to_number",
            Self::NullPointer { .. } => "null_pointer",
            Self::UnknownVariable { .. } | Self::UnknownFunction { .. } | Self::UnknownType { .. } => {
                "unknown_symbol"
            },
            Self::ArgumentCountMismatch { .. } => "argument_count",
            Self::AssertionFailed { .. } => "assertion_failed",
            Self::Regex { .. } => "regex",
            Self::Plugin { .. } => "plugin",
            Self::Raised { name, .. } => name.as_str(),
            Self::Interrupted { .. } => "interrupted",
            Self::Io { .. } => "io",
        }
    }

    /// Whether a `try` block may intercept this error.
    ///
    /// Interruption always unwinds to the host.
    #[must_use]
    pub const fn is_catchable(&self) -> bool {
        !matches!(self, Self::Interrupted { .. })
    }
}
