use std::fmt::{self, Display};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, types::Type},
    },
    util::num::length,
};

/// A fixed-arity row of independently typed fields.
///
/// The field types are snapshotted when the tuple is built and every later
/// assignment into a field is converted to the declared type.
///
/// # Example
/// ```
/// use bloc::interpreter::value::{core::Value, tuple::Tuple};
///
/// let mut row = Tuple::new(vec![Value::from("abcd"), Value::Integer(1234), Value::Numeric(0.123)]);
/// row.set(2, Value::Numeric(4.56), 1).unwrap();
/// assert_eq!(row.field(2, 1).unwrap(), &Value::Integer(4));
/// assert_eq!(row.to_string(), "(\"abcd\", 4, 0.123)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    fields: Vec<Value>,
    decl:   Vec<Type>,
}

impl Tuple {
    /// Builds a tuple whose declaration is the type of each field.
    #[must_use]
    pub fn new(fields: Vec<Value>) -> Self {
        let decl = fields.iter().map(Value::value_type).collect();
        Self { fields, decl }
    }

    /// Number of fields.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.fields.len()
    }

    /// The declared field types.
    #[must_use]
    pub fn declaration(&self) -> &[Type] {
        &self.decl
    }

    /// The tuple type, carrying the declared field types.
    #[must_use]
    pub fn row_type(&self) -> Type {
        Type::row(self.decl.clone())
    }

    /// All fields in order.
    #[must_use]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    fn slot(&self, position: usize, line: usize) -> EvalResult<usize> {
        if position == 0 || position > self.fields.len() {
            return Err(RuntimeError::IndexRange { index: length(position),
                                                  size: self.fields.len(),
                                                  line });
        }
        Ok(position - 1)
    }

    /// Reads field `position`, counted from 1.
    ///
    /// # Errors
    /// `IndexRange` when the position is outside `1..=arity`.
    pub fn field(&self, position: usize, line: usize) -> EvalResult<&Value> {
        let slot = self.slot(position, line)?;
        Ok(&self.fields[slot])
    }

    /// Replaces field `position`, counted from 1, converting the value to the
    /// declared field type.
    ///
    /// # Errors
    /// `IndexRange` for a bad position and `TypeMismatch` when the value does
    /// not convert.
    pub fn set(&mut self, position: usize, value: Value, line: usize) -> EvalResult<()> {
        let slot = self.slot(position, line)?;
        self.fields[slot] = value.coerce_into(&self.decl[slot], line)?;
        Ok(())
    }
}

impl Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            field.fmt_nested(f)?;
        }
        f.write_str(")")
    }
}
