use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{collection::Collection, core::Value, tuple::Tuple},
    },
    util::num::{count, filled, int_to_numeric, numeric_to_int},
};

fn not_a_number(text: &str, line: usize) -> RuntimeError {
    RuntimeError::StringToNumber { text: text.to_string(),
                                   line }
}

fn unsupported(what: &str, value: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("cannot convert {} to {what}", value.value_type()),
                                 line }
}

fn real_part(value: &Value, what: &str, line: usize) -> EvalResult<f64> {
    let z = value.imaginary(line)?;
    if z.im != 0.0 {
        return Err(RuntimeError::OutOfRange { details: format!("{z} has no {what} value"),
                                              line });
    }
    Ok(z.re)
}

fn parse_numeric(text: &str, line: usize) -> EvalResult<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| not_a_number(text, line))
}

/// `bool(x)`
///
/// Numbers are true when non-zero. Text must read `true` or `false` in any
/// case, or be a number.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::convert::to_bool, value::core::Value};
///
/// assert_eq!(to_bool(&[Value::Integer(2)], 1).unwrap(), Value::Boolean(true));
/// assert_eq!(to_bool(&[Value::from("False")], 1).unwrap(), Value::Boolean(false));
/// assert!(to_bool(&[Value::from("maybe")], 1).is_err());
/// ```
pub fn to_bool(args: &[Value], line: usize) -> EvalResult<Value> {
    let b = match &args[0] {
        Value::Boolean(b) => *b,
        Value::Integer(n) => *n != 0,
        Value::Numeric(x) => *x != 0.0,
        Value::Imaginary(z) => !z.is_zero(),
        Value::Literal(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => parse_numeric(s, line)? != 0.0,
        },
        other => return Err(unsupported("boolean", other, line)),
    };
    Ok(Value::Boolean(b))
}

/// `num(x)`
///
/// # Errors
/// `StringToNumber` for text that is not a number and `OutOfRange` for an
/// imaginary with a non-zero imaginary part.
pub fn to_num(args: &[Value], line: usize) -> EvalResult<Value> {
    let x = match &args[0] {
        Value::Boolean(b) => int_to_numeric(i64::from(*b)),
        Value::Integer(n) => int_to_numeric(*n),
        Value::Numeric(x) => *x,
        v @ Value::Imaginary(_) => real_part(v, "numeric", line)?,
        Value::Literal(s) => parse_numeric(s, line)?,
        other => return Err(unsupported("numeric", other, line)),
    };
    Ok(Value::Numeric(x))
}

/// `int(x)`: numerics and numeric text truncate toward zero.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::convert::to_int, value::core::Value};
///
/// assert_eq!(to_int(&[Value::Numeric(-4.56)], 1).unwrap(), Value::Integer(-4));
/// assert_eq!(to_int(&[Value::from(" 42 ")], 1).unwrap(), Value::Integer(42));
/// assert_eq!(to_int(&[Value::from("7.9")], 1).unwrap(), Value::Integer(7));
/// assert!(to_int(&[Value::from("seven")], 1).is_err());
/// ```
pub fn to_int(args: &[Value], line: usize) -> EvalResult<Value> {
    let n = match &args[0] {
        Value::Boolean(b) => i64::from(*b),
        Value::Integer(n) => *n,
        Value::Numeric(x) => numeric_to_int(*x, line)?,
        v @ Value::Imaginary(_) => numeric_to_int(real_part(v, "integer", line)?, line)?,
        Value::Literal(s) => match s.trim().parse::<i64>() {
            Ok(n) => n,
            Err(_) => numeric_to_int(parse_numeric(s, line)?, line)?,
        },
        other => return Err(unsupported("integer", other, line)),
    };
    Ok(Value::Integer(n))
}

/// `str(x)`: the display form.
pub fn to_str(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Literal(args[0].to_string()))
}

/// `isnull(x)`, never null itself.
pub fn isnull(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Boolean(args[0].is_null()))
}

/// `typeof(x)`: the name of the value's type, also for typed nulls.
///
/// # Example
/// ```
/// use bloc::interpreter::{
///     evaluator::function::convert::type_name,
///     value::{core::Value, types::Type},
/// };
///
/// assert_eq!(type_name(&[Value::Integer(1)], 1).unwrap(), Value::from("integer"));
/// assert_eq!(type_name(&[Value::Null(Type::literal())], 1).unwrap(), Value::from("literal"));
/// ```
pub fn type_name(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Literal(args[0].value_type().to_string()))
}

/// `tup(a, b, ...)`
pub fn tup(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Tuple(Tuple::new(args.to_vec())))
}

/// `tab(n, init)`: a collection of `n` copies of `init`, typed after
/// `init`. A null count gives a null collection.
///
/// # Errors
/// `OutOfRange` for a negative count or one too large to allocate.
pub fn tab(args: &[Value], line: usize) -> EvalResult<Value> {
    let (n, init) = (&args[0], &args[1]);
    let ty = init.value_type();
    if n.is_null() {
        return Ok(Value::Null(ty.array_of()));
    }
    let n = count(n.integer(line)?, "collection size", line)?;
    let items = filled(n, init.clone(), "collection size", line)?;
    let c = Collection::from_values(items, line)?.retype(&ty, line)?;
    Ok(Value::Collection(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::{imaginary::Imaginary, types::Type};

    #[test]
    fn numeric_text() {
        assert_eq!(to_num(&[Value::from("2.5e3")], 1).unwrap(), Value::Numeric(2500.0));
        assert!(matches!(to_num(&[Value::from("x")], 1),
                         Err(RuntimeError::StringToNumber { .. })));
    }

    #[test]
    fn imaginary_conversions() {
        let real = Value::Imaginary(Imaginary::new(3.0, 0.0));
        assert_eq!(to_num(&[real], 1).unwrap(), Value::Numeric(3.0));
        let complex = Value::Imaginary(Imaginary::new(3.0, 1.0));
        assert!(to_int(&[complex], 1).is_err());
    }

    #[test]
    fn tab_of_nulls_keeps_the_type() {
        let c = tab(&[Value::Integer(3), Value::Null(Type::integer())], 1).unwrap();
        assert_eq!(c.value_type(), Type::integer().array_of());
        assert_eq!(c.collection(1).unwrap().len(), 3);

        let empty = tab(&[Value::Integer(0), Value::from("")], 1).unwrap();
        assert_eq!(empty.value_type(), Type::literal().array_of());
    }
}
