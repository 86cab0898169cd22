use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    value::core::Value,
};

/// An evaluated operand and who owns it.
///
/// A `Named` operand is a variable: operators read it but never reuse its
/// storage. A `Temp` operand was produced during evaluation and belongs to
/// the expression, so an operator may overwrite it with its result.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<'e> {
    /// The variable with this name.
    Named(&'e str),
    /// A temporary value.
    Temp(Value),
}

impl Operand<'_> {
    /// True when the operand is a variable.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// Borrows the operand's value.
    ///
    /// # Errors
    /// `UnknownVariable` when a named operand no longer exists.
    pub fn get<'a>(&'a self, ctx: &'a Context, line: usize) -> EvalResult<&'a Value> {
        match self {
            Self::Named(name) => ctx.lookup(name, line),
            Self::Temp(value) => Ok(value),
        }
    }

    /// Turns the operand into an owned value, copying a variable.
    ///
    /// # Errors
    /// `UnknownVariable` when a named operand no longer exists.
    pub fn into_value(self, ctx: &Context, line: usize) -> EvalResult<Value> {
        match self {
            Self::Named(name) => ctx.lookup(name, line).cloned(),
            Self::Temp(value) => Ok(value),
        }
    }
}

impl Context {
    /// Applies a binary operation to two operands.
    ///
    /// The result replaces a temporary operand, the left one first. Only
    /// when both operands are variables is a fresh value allocated on the
    /// context.
    pub(crate) fn lval2(&mut self,
                        left: &Operand<'_>,
                        right: &Operand<'_>,
                        line: usize,
                        op: impl FnOnce(&Self, &Value, &Value) -> EvalResult<Value>)
                        -> EvalResult<Value> {
        let value = op(self, left.get(self, line)?, right.get(self, line)?)?;
        if left.is_named() && right.is_named() {
            return Ok(self.allocate(value));
        }
        Ok(value)
    }

    /// Applies a unary operation to one operand, allocating only when the
    /// operand is a variable.
    pub(crate) fn lval1(&mut self,
                        operand: &Operand<'_>,
                        line: usize,
                        op: impl FnOnce(&Value) -> EvalResult<Value>)
                        -> EvalResult<Value> {
        let value = op(operand.get(self, line)?)?;
        if operand.is_named() {
            return Ok(self.allocate(value));
        }
        Ok(value)
    }
}
