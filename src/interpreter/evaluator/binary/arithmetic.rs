use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Value,
            imaginary::Imaginary,
            types::{Major, Type},
        },
    },
};

/// Applies `+ - * / %` to two non-null numbers in their promoted type.
///
/// Integer arithmetic wraps. Integer division truncates toward zero and the
/// remainder takes the sign of the dividend, so `(a / b) * b + a % b == a`.
/// Numeric remainder is `fmod`.
///
/// # Errors
/// `DivideByZero` for a zero divisor, `InvalidExpression` for `%` on
/// imaginaries.
///
/// # Example
/// ```
/// use bloc::{
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::binary::arithmetic::eval_arithmetic,
///         value::{core::Value, types::Type},
///     },
/// };
///
/// let q = eval_arithmetic(BinaryOperator::Div, &Value::Integer(-7), &Value::Integer(2),
///                         &Type::integer(), 1);
/// assert_eq!(q.unwrap(), Value::Integer(-3));
///
/// let r = eval_arithmetic(BinaryOperator::Mod, &Value::Integer(-7), &Value::Integer(2),
///                         &Type::integer(), 1);
/// assert_eq!(r.unwrap(), Value::Integer(-1));
/// ```
pub fn eval_arithmetic(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       ty: &Type,
                       line: usize)
                       -> EvalResult<Value> {
    match ty.major {
        Major::Integer => integer_op(op, left.integer(line)?, right.integer(line)?, line),
        Major::Numeric => numeric_op(op, left.numeric(line)?, right.numeric(line)?, line),
        Major::Imaginary => imaginary_op(op, left.imaginary(line)?, right.imaginary(line)?, line),
        _ => Err(RuntimeError::InvalidExpression { details: format!("cannot apply '{op}' to {} and {}",
                                                                    left.value_type(),
                                                                    right.value_type()),
                                                   line }),
    }
}

fn integer_op(op: BinaryOperator, a: i64, b: i64, line: usize) -> EvalResult<Value> {
    let n = match op {
        BinaryOperator::Add => a.wrapping_add(b),
        BinaryOperator::Sub => a.wrapping_sub(b),
        BinaryOperator::Mul => a.wrapping_mul(b),
        BinaryOperator::Div | BinaryOperator::Mod if b == 0 => {
            return Err(RuntimeError::DivideByZero { line });
        },
        BinaryOperator::Div => a.wrapping_div(b),
        BinaryOperator::Mod => a.wrapping_rem(b),
        _ => return Err(unsupported(op, "integer", line)),
    };
    Ok(Value::Integer(n))
}

fn numeric_op(op: BinaryOperator, a: f64, b: f64, line: usize) -> EvalResult<Value> {
    let x = match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div | BinaryOperator::Mod if b == 0.0 => {
            return Err(RuntimeError::DivideByZero { line });
        },
        BinaryOperator::Div => a / b,
        BinaryOperator::Mod => a % b,
        _ => return Err(unsupported(op, "numeric", line)),
    };
    Ok(Value::Numeric(x))
}

fn imaginary_op(op: BinaryOperator, a: Imaginary, b: Imaginary, line: usize) -> EvalResult<Value> {
    let z = match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div if b.is_zero() => return Err(RuntimeError::DivideByZero { line }),
        BinaryOperator::Div => a / b,
        _ => return Err(unsupported(op, "imaginary", line)),
    };
    Ok(Value::Imaginary(z))
}

fn unsupported(op: BinaryOperator, kind: &str, line: usize) -> RuntimeError {
    RuntimeError::InvalidExpression { details: format!("cannot apply '{op}' to {kind} operands"),
                                      line }
}
