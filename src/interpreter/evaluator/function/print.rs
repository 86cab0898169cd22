use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Prints a value to standard output and returns it unchanged.
///
/// Literals print without quotes and nulls print as `null`.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::print::print, value::core::Value};
///
/// let result = print(&[Value::Integer(42)], 1).unwrap();
/// assert_eq!(result, Value::Integer(42));
/// ```
pub fn print(args: &[Value], _line: usize) -> EvalResult<Value> {
    println!("{}", args[0]);
    Ok(args[0].clone())
}

/// Fails with `AssertionFailed` unless the argument is `true`.
///
/// A null condition fails.
///
/// # Example
/// ```
/// use bloc::interpreter::{
///     evaluator::function::print::assert,
///     value::{core::Value, types::Type},
/// };
///
/// assert_eq!(assert(&[Value::Boolean(true)], 1).unwrap(), Value::Boolean(true));
/// assert!(assert(&[Value::Boolean(false)], 1).is_err());
/// assert!(assert(&[Value::Null(Type::boolean())], 1).is_err());
/// ```
pub fn assert(args: &[Value], line: usize) -> EvalResult<Value> {
    if args[0].condition(line)? {
        return Ok(Value::Boolean(true));
    }
    Err(RuntimeError::AssertionFailed { line })
}
