use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{binary::core::invalid, core::EvalResult},
        value::core::Value,
    },
};

/// Evaluates `& | ^ << >>` on two non-null operands.
///
/// On booleans `& | ^` are non-short-circuit logical operators. Shift counts
/// are masked to `0..=63` and `>>` is arithmetic.
///
/// # Errors
/// `InvalidExpression` for operands outside the operator's domain.
///
/// # Example
/// ```
/// use bloc::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::bitwise::eval_bitwise, value::core::Value},
/// };
///
/// let v = eval_bitwise(BinaryOperator::ShiftLeft, &Value::Integer(1), &Value::Integer(65), 1);
/// assert_eq!(v.unwrap(), Value::Integer(2));
///
/// let v = eval_bitwise(BinaryOperator::BitXor, &Value::Boolean(true), &Value::Boolean(true), 1);
/// assert_eq!(v.unwrap(), Value::Boolean(false));
/// ```
pub fn eval_bitwise(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let shift = u32::try_from(b & 63).unwrap_or_default();
            let n = match op {
                BinaryOperator::BitAnd => a & b,
                BinaryOperator::BitOr => a | b,
                BinaryOperator::BitXor => a ^ b,
                BinaryOperator::ShiftLeft => a.wrapping_shl(shift),
                BinaryOperator::ShiftRight => a.wrapping_shr(shift),
                _ => return Err(invalid(op, &left.value_type(), &right.value_type(), line)),
            };
            Ok(Value::Integer(n))
        },
        (Value::Boolean(a), Value::Boolean(b)) => {
            let v = match op {
                BinaryOperator::BitAnd => a & b,
                BinaryOperator::BitOr => a | b,
                BinaryOperator::BitXor => a ^ b,
                _ => return Err(invalid(op, &left.value_type(), &right.value_type(), line)),
            };
            Ok(Value::Boolean(v))
        },
        _ => Err(invalid(op, &left.value_type(), &right.value_type(), line)),
    }
}
