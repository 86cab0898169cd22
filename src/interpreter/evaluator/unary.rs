use crate::{
    ast::{Expr, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, promotion::unary_result},
    },
};

impl Context {
    /// Evaluates the operand of a unary operator and applies it.
    pub(crate) fn eval_unary_op(&mut self,
                                op: UnaryOperator,
                                expr: &Expr,
                                line: usize)
                                -> EvalResult<Value> {
        let operand = self.operand(expr)?;
        self.lval1(&operand, line, |value| Self::eval_unary(op, value, line))
    }

    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: wrapping negation of integers, negation of numerics and
    ///   imaginaries.
    /// - `Plus`: the number itself.
    /// - `Not`: boolean negation.
    /// - `BitNot`: two's complement of an integer, negation of a boolean.
    ///
    /// A null operand gives a null of the result type.
    ///
    /// # Errors
    /// `InvalidExpression` for operands outside the operator's domain.
    ///
    /// # Example
    /// ```
    /// use bloc::{
    ///     ast::UnaryOperator,
    ///     interpreter::{
    ///         evaluator::core::Context,
    ///         value::{core::Value, types::Type},
    ///     },
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Integer(5), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// let v = Context::eval_unary(UnaryOperator::BitNot, &Value::Integer(0), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-1));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::Null(Type::boolean()), 1).unwrap();
    /// assert_eq!(v, Value::Null(Type::boolean()));
    ///
    /// assert!(Context::eval_unary(UnaryOperator::Negate, &Value::from("a"), 1).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        let ty = value.value_type();
        let result_ty = unary_result(op, &ty).ok_or_else(|| RuntimeError::InvalidExpression {
            details: format!("cannot apply '{op}' to {ty}"),
            line,
        })?;
        if value.is_null() {
            return Ok(Value::Null(result_ty));
        }

        match (op, value) {
            (UnaryOperator::Negate, Value::Integer(n)) => Ok(Value::Integer(n.wrapping_neg())),
            (UnaryOperator::Negate, Value::Numeric(x)) => Ok(Value::Numeric(-x)),
            (UnaryOperator::Negate, Value::Imaginary(z)) => Ok(Value::Imaginary(-*z)),
            (UnaryOperator::Plus, number) => Ok(number.clone()),
            (UnaryOperator::Not | UnaryOperator::BitNot, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            (UnaryOperator::BitNot, Value::Integer(n)) => Ok(Value::Integer(!n)),
            _ => Err(RuntimeError::InvalidExpression { details: format!("cannot apply '{op}' to {ty}"),
                                                       line }),
        }
    }
}
