use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{binary::core::invalid, core::EvalResult},
        value::{core::Value, promotion::binary_result},
    },
};

/// Concatenates `right` onto `left`, reusing `left`'s buffer.
///
/// A string on either side concatenates display forms. A byte array on the
/// left takes the bytes of a byte array or of a string's UTF-8 encoding.
///
/// # Errors
/// `InvalidExpression` when the operands cannot be concatenated.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::binary::concat::append_in_place, value::core::Value};
///
/// let joined = append_in_place(Value::from("pi="), &Value::Numeric(3.25), 1).unwrap();
/// assert_eq!(joined, Value::from("pi=3.25"));
///
/// let bytes = append_in_place(Value::TabChar(b"ab".to_vec()), &Value::from("c"), 1).unwrap();
/// assert_eq!(bytes, Value::TabChar(b"abc".to_vec()));
/// ```
pub fn append_in_place(left: Value, right: &Value, line: usize) -> EvalResult<Value> {
    let (lt, rt) = (left.value_type(), right.value_type());
    let result_ty = binary_result(BinaryOperator::Add, &lt, &rt)
        .ok_or_else(|| invalid(BinaryOperator::Add, &lt, &rt, line))?;
    if left.is_null() || right.is_null() {
        return Ok(Value::Null(result_ty));
    }

    match (left, right) {
        (Value::Literal(mut s), rhs) => {
            s.push_str(&rhs.to_string());
            Ok(Value::Literal(s))
        },
        (Value::TabChar(mut bytes), Value::TabChar(more)) => {
            bytes.extend_from_slice(more);
            Ok(Value::TabChar(bytes))
        },
        (Value::TabChar(mut bytes), Value::Literal(more)) => {
            bytes.extend_from_slice(more.as_bytes());
            Ok(Value::TabChar(bytes))
        },
        (lhs, rhs) => Ok(Value::Literal(format!("{lhs}{rhs}"))),
    }
}
