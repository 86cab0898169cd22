use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::core::invalid, core::EvalResult},
        value::{
            core::Value,
            imaginary::Imaginary,
            promotion::promote_numbers,
            types::Major,
        },
    },
    util::num::int_to_numeric,
};

/// Raises `base` to `exponent`, shared by `**` and `pow`.
///
/// - integer ** non-negative integer stays an integer and wraps,
/// - integer ** negative integer is numeric,
/// - any numeric operand gives a numeric,
/// - any imaginary operand gives an imaginary on the principal branch.
///
/// # Errors
/// `DivideByZero` for zero raised to a negative power and
/// `InvalidExpression` for non-numbers.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::binary::power::eval_power, value::core::Value};
///
/// assert_eq!(eval_power(&Value::Integer(2), &Value::Integer(10), 1).unwrap(),
///            Value::Integer(1024));
/// assert_eq!(eval_power(&Value::Integer(2), &Value::Integer(-1), 1).unwrap(),
///            Value::Numeric(0.5));
/// assert!(eval_power(&Value::Integer(0), &Value::Integer(-1), 1).is_err());
/// ```
pub fn eval_power(base: &Value, exponent: &Value, line: usize) -> EvalResult<Value> {
    let (bt, et) = (base.value_type(), exponent.value_type());
    let ty = promote_numbers(&bt, &et).ok_or_else(|| invalid(BinaryOperator::Exp, &bt, &et, line))?;
    if base.is_null() || exponent.is_null() {
        return Ok(Value::Null(ty));
    }

    match ty.major {
        Major::Integer => {
            let (b, e) = (base.integer(line)?, exponent.integer(line)?);
            if e >= 0 {
                return Ok(Value::Integer(wrapping_pow(b, e.unsigned_abs())));
            }
            if b == 0 {
                return Err(RuntimeError::DivideByZero { line });
            }
            Ok(Value::Numeric(int_to_numeric(b).powf(int_to_numeric(e))))
        },
        Major::Numeric => {
            let (b, e) = (base.numeric(line)?, exponent.numeric(line)?);
            if b == 0.0 && e < 0.0 {
                return Err(RuntimeError::DivideByZero { line });
            }
            Ok(Value::Numeric(b.powf(e)))
        },
        _ => {
            let (b, e) = (base.imaginary(line)?, exponent.imaginary(line)?);
            Ok(Value::Imaginary(imaginary_power(b, e, line)?))
        },
    }
}

/// `b ** e` by repeated squaring, wrapping on overflow.
fn wrapping_pow(mut b: i64, mut e: u64) -> i64 {
    let mut acc: i64 = 1;
    while e > 0 {
        if e & 1 == 1 {
            acc = acc.wrapping_mul(b);
        }
        b = b.wrapping_mul(b);
        e >>= 1;
    }
    acc
}

fn imaginary_power(b: Imaginary, e: Imaginary, line: usize) -> EvalResult<Imaginary> {
    if !b.is_zero() {
        return Ok(b.powc(e));
    }
    if e.is_zero() {
        Ok(Imaginary::from(1.0))
    } else if e.re > 0.0 {
        Ok(Imaginary::from(0.0))
    } else {
        Err(RuntimeError::DivideByZero { line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_power_wraps() {
        assert_eq!(wrapping_pow(3, 4), 81);
        assert_eq!(wrapping_pow(2, 64), 0);
        assert_eq!(wrapping_pow(-2, 3), -8);
        assert_eq!(wrapping_pow(7, 0), 1);
    }

    #[test]
    fn zero_base_imaginary() {
        let zero = Imaginary::from(0.0);
        assert_eq!(imaginary_power(zero, Imaginary::from(2.0), 1).unwrap(), zero);
        assert!(imaginary_power(zero, Imaginary::from(-1.0), 1).is_err());
    }
}
