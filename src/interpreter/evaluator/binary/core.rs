use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{
                arithmetic::eval_arithmetic, bitwise::eval_bitwise, comparison::eval_comparison,
                concat::append_in_place, logic::eval_logical, power::eval_power,
            },
            core::{Context, EvalResult},
            operand::Operand,
        },
        value::{core::Value, promotion::binary_result, types::Type},
    },
};

impl Context {
    /// Evaluates both operands of a binary operator and applies it.
    ///
    /// `and` and `or` evaluate their right operand only when the left one
    /// does not decide the result. Concatenation onto a temporary string or
    /// byte array appends in place.
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 line: usize)
                                 -> EvalResult<Value> {
        if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
            return self.eval_short_circuit(left, op, right, line);
        }

        let left = self.operand(left)?;
        let right = self.operand(right)?;

        if op == BinaryOperator::Add
           && let Operand::Temp(Value::Literal(_) | Value::TabChar(_)) = &left
        {
            let rhs = right.get(self, line)?;
            if let Operand::Temp(lhs) = left {
                return append_in_place(lhs, rhs, line);
            }
        }

        self.lval2(&left, &right, line, |ctx, l, r| ctx.eval_binary(op, l, r, line))
    }

    /// Evaluates a binary operation between two values.
    ///
    /// The operator's domain is checked first with the same promotion rules
    /// the static checker uses. Then:
    /// - comparisons apply their own null rules,
    /// - any other operator with a null operand gives a null of its result
    ///   type,
    /// - otherwise the operation is routed to its family: arithmetic,
    ///   concatenation, power, logic, bitwise or regex match.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// `InvalidExpression` for operands outside the operator's domain, and
    /// the errors of the operation itself such as `DivideByZero`.
    ///
    /// # Example
    /// ```
    /// use bloc::{
    ///     ast::BinaryOperator,
    ///     interpreter::{
    ///         evaluator::core::Context,
    ///         value::{core::Value, types::Type},
    ///     },
    /// };
    ///
    /// let context = Context::new();
    ///
    /// let sum = context.eval_binary(BinaryOperator::Add, &Value::Integer(3), &Value::Numeric(0.5), 1);
    /// assert_eq!(sum.unwrap(), Value::Numeric(3.5));
    ///
    /// let text = context.eval_binary(BinaryOperator::Add, &Value::from("n="), &Value::Integer(4), 1);
    /// assert_eq!(text.unwrap(), Value::from("n=4"));
    ///
    /// let null = context.eval_binary(BinaryOperator::Mul,
    ///                                &Value::Null(Type::integer()),
    ///                                &Value::Numeric(2.0),
    ///                                1);
    /// assert_eq!(null.unwrap(), Value::Null(Type::numeric()));
    ///
    /// assert!(context.eval_binary(BinaryOperator::Div, &Value::Integer(1), &Value::Integer(0), 1)
    ///                .is_err());
    /// ```
    pub fn eval_binary(&self,
                       op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, BitAnd, BitOr, BitXor, Div, Equal, Exp, Greater, GreaterEqual, Less,
            LessEqual, Match, Mod, Mul, NotEqual, Or, ShiftLeft, ShiftRight, Sub, Xor,
        };

        let (lt, rt) = (left.value_type(), right.value_type());
        let result_ty = binary_result(op, &lt, &rt).ok_or_else(|| invalid(op, &lt, &rt, line))?;

        if matches!(op, Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual) {
            return eval_comparison(op, left, right, line);
        }
        if matches!(op, And | Or | Xor) {
            return eval_logical(op, left, right, line);
        }
        if left.is_null() || right.is_null() {
            return Ok(Value::Null(result_ty));
        }

        match op {
            Add if result_ty == Type::literal() || result_ty == Type::tabchar() => {
                append_in_place(left.clone(), right, line)
            },
            Add | Sub | Mul | Div | Mod => eval_arithmetic(op, left, right, &result_ty, line),
            Exp => eval_power(left, right, line),
            And | Or | Xor => eval_logical(op, left, right, line),
            BitAnd | BitOr | BitXor | ShiftLeft | ShiftRight => eval_bitwise(op, left, right, line),
            Match => self.eval_match(left, right, line),
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
                eval_comparison(op, left, right, line)
            },
        }
    }
}

/// The error for an operator applied outside its domain.
pub(crate) fn invalid(op: BinaryOperator, lt: &Type, rt: &Type, line: usize) -> RuntimeError {
    RuntimeError::InvalidExpression { details: format!("cannot apply '{op}' to {lt} and {rt}"),
                                      line }
}
