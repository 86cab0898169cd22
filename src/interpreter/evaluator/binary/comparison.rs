use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Value,
            types::{Major, Type},
        },
    },
    util::num::int_to_numeric,
};

/// Evaluates `== != < <= > >=`.
///
/// Null rules:
/// - exactly one null operand compares `false` under every operator,
/// - two boolean nulls give a null boolean for `==` and `!=`,
/// - two other nulls are equal: `==` is `true`, `!=` is `false`,
/// - two nulls never order.
///
/// Integers and numerics compare after promotion, strings and byte arrays
/// lexicographically and booleans as `false < true`. Imaginaries, tuples,
/// collections and objects only support equality; objects are equal when
/// they are the same instance.
///
/// # Errors
/// `InvalidExpression` when the operands cannot be ordered.
///
/// # Example
/// ```
/// use bloc::{
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::binary::comparison::eval_comparison,
///         value::{core::Value, types::Type},
///     },
/// };
///
/// let lt = eval_comparison(BinaryOperator::Less, &Value::Integer(2), &Value::Numeric(2.5), 1);
/// assert_eq!(lt.unwrap(), Value::Boolean(true));
///
/// let one_null = eval_comparison(BinaryOperator::NotEqual,
///                                &Value::Null(Type::integer()),
///                                &Value::Integer(3),
///                                1);
/// assert_eq!(one_null.unwrap(), Value::Boolean(false));
///
/// let both_null = eval_comparison(BinaryOperator::Equal,
///                                 &Value::Null(Type::boolean()),
///                                 &Value::Null(Type::boolean()),
///                                 1);
/// assert_eq!(both_null.unwrap(), Value::Null(Type::boolean()));
/// ```
pub fn eval_comparison(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
    use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

    match (left.is_null(), right.is_null()) {
        (true, true) => {
            let boolean = left.value_type().is_scalar(Major::Boolean)
                          || right.value_type().is_scalar(Major::Boolean);
            return Ok(match op {
                Equal | NotEqual if boolean => Value::Null(Type::boolean()),
                Equal => Value::Boolean(true),
                _ => Value::Boolean(false),
            });
        },
        (true, false) | (false, true) => return Ok(Value::Boolean(false)),
        (false, false) => {},
    }

    let result = match op {
        Equal => values_equal(left, right),
        NotEqual => !values_equal(left, right),
        Less => order(left, right, line)? == Ordering::Less,
        LessEqual => order(left, right, line)? != Ordering::Greater,
        Greater => order(left, right, line)? == Ordering::Greater,
        GreaterEqual => order(left, right, line)? != Ordering::Less,
        _ => {
            return Err(RuntimeError::InvalidExpression { details: format!("'{op}' is not a comparison"),
                                                         line });
        },
    };
    Ok(Value::Boolean(result))
}

/// Structural equality used by `==`.
///
/// Numbers compare across integer, numeric and imaginary; two nulls are
/// equal.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null(_), Value::Null(_)) => true,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Integer(_) | Value::Numeric(_), Value::Integer(_) | Value::Numeric(_)) => {
            OrderedFloat(as_numeric(left)) == OrderedFloat(as_numeric(right))
        },
        (Value::Imaginary(_), Value::Integer(_) | Value::Numeric(_) | Value::Imaginary(_))
        | (Value::Integer(_) | Value::Numeric(_), Value::Imaginary(_)) => {
            left.imaginary(0).ok() == right.imaginary(0).ok()
        },
        (Value::Tuple(a), Value::Tuple(b)) => {
            a.arity() == b.arity()
            && a.fields()
                .iter()
                .zip(b.fields())
                .all(|(x, y)| values_equal(x, y))
        },
        (Value::Collection(a), Value::Collection(b)) => {
            a.len() == b.len()
            && a.items()
                .iter()
                .zip(b.items())
                .all(|(x, y)| values_equal(x, y))
        },
        (a, b) => a == b,
    }
}

/// Total order of two non-null orderable scalars.
///
/// # Errors
/// `InvalidExpression` for operands without an order.
pub fn order(left: &Value, right: &Value, line: usize) -> EvalResult<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
        (Value::Integer(_) | Value::Numeric(_), Value::Integer(_) | Value::Numeric(_)) => {
            Ok(OrderedFloat(as_numeric(left)).cmp(&OrderedFloat(as_numeric(right))))
        },
        (Value::Literal(a), Value::Literal(b)) => Ok(a.cmp(b)),
        (Value::TabChar(a), Value::TabChar(b)) => Ok(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
        _ => Err(RuntimeError::InvalidExpression { details: format!("cannot order {} and {}",
                                                                    left.value_type(),
                                                                    right.value_type()),
                                                   line }),
    }
}

fn as_numeric(value: &Value) -> f64 {
    match value {
        Value::Integer(n) => int_to_numeric(*n),
        Value::Numeric(x) => *x,
        _ => f64::NAN,
    }
}
