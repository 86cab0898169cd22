use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during lexing, parsing or static
/// checking.
///
/// Static checking reports type and arity problems before any statement runs,
/// so a script with a `ParseError` never has side effects.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    #[error("Error on line {line}: Expected closing parenthesis ')' but none found.")]
    ExpectedClosingParen {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A literal could not be represented.
    #[error("Error on line {line}: Invalid literal: {details}.")]
    InvalidLiteral {
        /// What is wrong with the literal.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A variable is used before being declared.
    #[error("Error on line {line}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function or constructor is not known.
    #[error("Error on line {line}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A member call names a method the receiver does not have.
    #[error("Error on line {line}: Type '{receiver}' has no method '{name}'.")]
    UnknownMethod {
        /// The method name.
        name:     String,
        /// The static type of the receiver.
        receiver: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An `import` names a native type that is not registered.
    #[error("Error on line {line}: Unknown type '{name}'.")]
    UnknownType {
        /// The name of the type.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call supplied the wrong number of arguments.
    #[error("Error on line {line}: '{name}' does not take {found} argument(s).")]
    ArgumentCount {
        /// The function or method name.
        name:  String,
        /// The number of arguments supplied.
        found: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An argument has a static type the callee does not accept.
    #[error("Error on line {line}: Argument {position} of '{name}' must be {expected}, found {found}.")]
    ArgumentType {
        /// The function or method name.
        name:     String,
        /// The 1-based argument position.
        position: usize,
        /// The accepted types.
        expected: String,
        /// The static type found.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Two static types cannot be combined or assigned.
    #[error("Error on line {line}: Type mismatch: {details}.")]
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An operator is applied to operands outside its domain.
    #[error("Error on line {line}: Invalid expression: {details}.")]
    InvalidExpression {
        /// Details about the invalid operation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An in-out argument is not a variable.
    #[error("Error on line {line}: Argument {position} of '{name}' must be a variable.")]
    NotAssignable {
        /// The function or method name.
        name:     String,
        /// The 1-based argument position.
        position: usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Tried to use a reserved identifier name.
    #[error("Error on line {line}: Identifier {name} is reserved.")]
    IdentifierReserved {
        /// The reserved identifier name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
}
