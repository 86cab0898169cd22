use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::Value,
            types::{Major, Type},
        },
    },
};

/// Reads a logical operand as a three-valued boolean.
///
/// # Errors
/// `InvalidExpression` for anything but a boolean or a boolean/untyped null.
fn truth(value: &Value, op: BinaryOperator, line: usize) -> EvalResult<Option<bool>> {
    match value {
        Value::Boolean(b) => Ok(Some(*b)),
        Value::Null(ty) if ty.is_opaque() || ty.is_scalar(Major::Boolean) => Ok(None),
        other => Err(RuntimeError::InvalidExpression { details: format!("'{op}' expects boolean operands, found {}",
                                                                        other.value_type()),
                                                       line }),
    }
}

fn from_truth(value: Option<bool>) -> Value {
    value.map_or(Value::Null(Type::boolean()), Value::Boolean)
}

/// Three-valued `and`: `false` wins over null, null wins over `true`.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::binary::logic::and3;
///
/// assert_eq!(and3(None, Some(false)), Some(false));
/// assert_eq!(and3(None, Some(true)), None);
/// assert_eq!(and3(Some(true), Some(true)), Some(true));
/// ```
#[must_use]
pub const fn and3(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

/// Three-valued `or`: `true` wins over null, null wins over `false`.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::binary::logic::or3;
///
/// assert_eq!(or3(None, Some(true)), Some(true));
/// assert_eq!(or3(None, Some(false)), None);
/// assert_eq!(or3(Some(false), Some(false)), Some(false));
/// ```
#[must_use]
pub const fn or3(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

impl Context {
    /// Evaluates `and` / `or` left to right.
    ///
    /// The right operand is skipped only when the left one decides the
    /// result: `false and ...` and `true or ...`. A null left operand never
    /// decides, so the right operand is evaluated and its errors surface.
    pub(crate) fn eval_short_circuit(&mut self,
                                     left: &Expr,
                                     op: BinaryOperator,
                                     right: &Expr,
                                     line: usize)
                                     -> EvalResult<Value> {
        let left = self.operand(left)?;
        let lhs = truth(left.get(self, line)?, op, line)?;
        match (op, lhs) {
            (BinaryOperator::And, Some(false)) => return Ok(Value::Boolean(false)),
            (BinaryOperator::Or, Some(true)) => return Ok(Value::Boolean(true)),
            _ => {},
        }

        let right = self.operand(right)?;
        self.lval2(&left, &right, line, |_, _, r| {
                let rhs = truth(r, op, line)?;
                Ok(from_truth(if op == BinaryOperator::And { and3(lhs, rhs) } else { or3(lhs, rhs) }))
            })
    }
}

/// Evaluates `and`, `or` and `xor` on two already evaluated operands.
///
/// `xor` is null when either operand is null.
///
/// # Errors
/// `InvalidExpression` for non-boolean operands.
pub fn eval_logical(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    let a = truth(left, op, line)?;
    let b = truth(right, op, line)?;
    Ok(from_truth(match op {
                      BinaryOperator::And => and3(a, b),
                      BinaryOperator::Or => or3(a, b),
                      _ => a.zip(b).map(|(a, b)| a != b),
                  }))
}
