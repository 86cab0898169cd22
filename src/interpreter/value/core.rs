use std::fmt::{self, Display};

use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            collection::Collection,
            imaginary::Imaginary,
            object::Complex,
            tuple::Tuple,
            types::{Major, Type},
        },
    },
    util::num::{int_to_numeric, numeric_to_int},
};

/// Represents a runtime value in the interpreter.
///
/// Every variant owns its payload. Cloning a value produces an independent
/// deep copy, except for native objects where the clone aliases the same
/// instance. A null keeps the static type of the slot it stands for, so a
/// null integer and a null literal are different values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A null of the given type. `Type::opaque()` is the untyped `null`.
    Null(Type),
    /// `true` or `false`.
    Boolean(bool),
    /// 64-bit signed integer with wrapping arithmetic.
    Integer(i64),
    /// Double precision floating point.
    Numeric(f64),
    /// Complex number.
    Imaginary(Imaginary),
    /// Character string.
    Literal(String),
    /// Byte array.
    TabChar(Vec<u8>),
    /// Fixed-arity tuple.
    Tuple(Tuple),
    /// Homogeneous, resizable sequence.
    Collection(Collection),
    /// Native object owned by a plugin.
    Complex(Complex),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Numeric(v)
    }
}

impl From<Imaginary> for Value {
    fn from(v: Imaginary) -> Self {
        Self::Imaginary(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Literal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Literal(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::TabChar(v)
    }
}

impl From<Tuple> for Value {
    fn from(v: Tuple) -> Self {
        Self::Tuple(v)
    }
}

impl From<Collection> for Value {
    fn from(v: Collection) -> Self {
        Self::Collection(v)
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Null => Self::Null(Type::opaque()),
            LiteralValue::Boolean(b) => Self::Boolean(*b),
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Numeric(x) => Self::Numeric(*x),
            LiteralValue::Imaginary(im) => Self::Imaginary(Imaginary::new(0.0, *im)),
            LiteralValue::Literal(s) => Self::Literal(s.clone()),
        }
    }
}

/// Formats a numeric so that it always reads as a numeric.
///
/// Whole values keep a `.0` suffix and very large or very small magnitudes
/// switch to exponent notation.
///
/// # Example
/// ```
/// use bloc::interpreter::value::core::format_numeric;
///
/// assert_eq!(format_numeric(3.0), "3.0");
/// assert_eq!(format_numeric(0.125), "0.125");
/// assert_eq!(format_numeric(2.5e20), "2.5e20");
/// ```
#[must_use]
pub fn format_numeric(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-7..1e15).contains(&magnitude) {
        format!("{x:e}")
    } else if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

impl Value {
    /// Null of the given type.
    #[must_use]
    pub const fn null(ty: Type) -> Self {
        Self::Null(ty)
    }

    /// Returns `true` if the value is a null of any type.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Returns the type of this value.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::{core::Value, types::Type};
    ///
    /// assert_eq!(Value::Integer(4).value_type(), Type::integer());
    /// assert_eq!(Value::Null(Type::literal()).value_type(), Type::literal());
    /// ```
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Null(ty) => ty.clone(),
            Self::Boolean(_) => Type::boolean(),
            Self::Integer(_) => Type::integer(),
            Self::Numeric(_) => Type::numeric(),
            Self::Imaginary(_) => Type::imaginary(),
            Self::Literal(_) => Type::literal(),
            Self::TabChar(_) => Type::tabchar(),
            Self::Tuple(t) => t.row_type(),
            Self::Collection(c) => c.collection_type(),
            Self::Complex(c) => c.object_type(),
        }
    }

    fn mismatch(&self, expected: &str, line: usize) -> RuntimeError {
        if self.is_null() {
            RuntimeError::NullPointer { line }
        } else {
            RuntimeError::TypeMismatch { details: format!("expected {expected}, found {}",
                                                          self.value_type()),
                                         line }
        }
    }

    /// Returns the boolean payload.
    ///
    /// # Errors
    /// `NullPointer` for nulls and `TypeMismatch` for other variants.
    pub fn boolean(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch("boolean", line)),
        }
    }

    /// Returns the integer payload.
    ///
    /// # Errors
    /// `NullPointer` for nulls and `TypeMismatch` for other variants.
    pub fn integer(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            _ => Err(self.mismatch("integer", line)),
        }
    }

    /// Returns the value as a numeric, promoting integers.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(10).numeric(1).unwrap(), 10.0);
    /// assert!(Value::from("10").numeric(1).is_err());
    /// ```
    pub fn numeric(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Integer(n) => Ok(int_to_numeric(*n)),
            Self::Numeric(x) => Ok(*x),
            _ => Err(self.mismatch("numeric", line)),
        }
    }

    /// Returns the value as an imaginary, promoting integers and numerics.
    pub fn imaginary(&self, line: usize) -> EvalResult<Imaginary> {
        match self {
            Self::Imaginary(z) => Ok(*z),
            Self::Integer(_) | Self::Numeric(_) => Ok(Imaginary::from(self.numeric(line)?)),
            _ => Err(self.mismatch("imaginary", line)),
        }
    }

    /// Borrows the string payload.
    pub fn literal(&self, line: usize) -> EvalResult<&str> {
        match self {
            Self::Literal(s) => Ok(s),
            _ => Err(self.mismatch("literal", line)),
        }
    }

    /// Borrows the byte array payload.
    pub fn tabchar(&self, line: usize) -> EvalResult<&[u8]> {
        match self {
            Self::TabChar(bytes) => Ok(bytes),
            _ => Err(self.mismatch("tabchar", line)),
        }
    }

    /// Borrows the tuple payload.
    pub fn tuple(&self, line: usize) -> EvalResult<&Tuple> {
        match self {
            Self::Tuple(t) => Ok(t),
            _ => Err(self.mismatch("tuple", line)),
        }
    }

    /// Borrows the collection payload.
    pub fn collection(&self, line: usize) -> EvalResult<&Collection> {
        match self {
            Self::Collection(c) => Ok(c),
            _ => Err(self.mismatch("collection", line)),
        }
    }

    /// Borrows the native object payload.
    pub fn complex(&self, line: usize) -> EvalResult<&Complex> {
        match self {
            Self::Complex(c) => Ok(c),
            _ => Err(self.mismatch("object", line)),
        }
    }

    /// Takes the collection payload.
    ///
    /// # Errors
    /// `NullPointer` for nulls and `TypeMismatch` for other variants.
    pub fn into_collection(self, line: usize) -> EvalResult<Collection> {
        match self {
            Self::Collection(c) => Ok(c),
            other => Err(other.mismatch("collection", line)),
        }
    }

    /// Mutably borrows the tuple payload.
    ///
    /// # Errors
    /// `NullPointer` for nulls and `TypeMismatch` for other variants.
    pub fn tuple_mut(&mut self, line: usize) -> EvalResult<&mut Tuple> {
        match self {
            Self::Tuple(t) => Ok(t),
            other => Err(other.mismatch("tuple", line)),
        }
    }

    /// Interprets the value as a branch or loop condition.
    ///
    /// A null boolean is false.
    ///
    /// # Errors
    /// `TypeMismatch` for non-boolean values.
    pub fn condition(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Null(ty) if ty.is_opaque() || ty.is_scalar(Major::Boolean) => Ok(false),
            _ => Err(self.mismatch("boolean", line)),
        }
    }

    /// Moves the payload out, leaving a null of the same type behind.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::{core::Value, types::Type};
    ///
    /// let mut v = Value::from("text");
    /// let moved = v.take();
    /// assert_eq!(moved, Value::from("text"));
    /// assert_eq!(v, Value::Null(Type::literal()));
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        let ty = self.value_type();
        std::mem::replace(self, Self::Null(ty))
    }

    /// Exchanges the payloads of two values.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Converts the value so that it can be stored in a slot of type `target`.
    ///
    /// Integers and numerics convert into each other (numerics truncate toward
    /// zero) and into imaginaries. A null becomes a null of the target type.
    /// Collections convert element by element.
    ///
    /// # Errors
    /// `TypeMismatch` when the value does not fit the target type.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::{core::Value, types::Type};
    ///
    /// let v = Value::Numeric(4.56).coerce_into(&Type::integer(), 1).unwrap();
    /// assert_eq!(v, Value::Integer(4));
    ///
    /// let n = Value::Null(Type::opaque()).coerce_into(&Type::literal(), 1).unwrap();
    /// assert_eq!(n, Value::Null(Type::literal()));
    ///
    /// assert!(Value::from("x").coerce_into(&Type::integer(), 1).is_err());
    /// ```
    pub fn coerce_into(self, target: &Type, line: usize) -> EvalResult<Self> {
        if target.is_opaque() {
            return Ok(self);
        }
        let own = self.value_type();
        if !target.accepts(&own) {
            return Err(RuntimeError::TypeMismatch { details: format!("cannot store {own} into {target}"),
                                                    line });
        }
        match self {
            Self::Null(_) => Ok(Self::Null(target.clone())),
            Self::Integer(n) if target.is_scalar(Major::Numeric) => {
                Ok(Self::Numeric(int_to_numeric(n)))
            },
            Self::Integer(_) | Self::Numeric(_) if target.is_scalar(Major::Imaginary) => {
                Ok(Self::Imaginary(self.imaginary(line)?))
            },
            Self::Numeric(x) if target.is_scalar(Major::Integer) => {
                Ok(Self::Integer(numeric_to_int(x, line)?))
            },
            Self::Collection(c) if &c.collection_type() != target => match target.element() {
                Some(element) => Ok(Self::Collection(c.retype(&element, line)?)),
                None => Ok(Self::Collection(c)),
            },
            other => Ok(other),
        }
    }

    /// Writes the value for display inside a tuple or collection, quoting
    /// strings.
    pub(crate) fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "{s:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null(_) => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Numeric(x) => f.write_str(&format_numeric(*x)),
            Self::Imaginary(z) => write!(f, "{z}"),
            Self::Literal(s) => f.write_str(s),
            Self::TabChar(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Self::Tuple(t) => write!(f, "{t}"),
            Self::Collection(c) => write!(f, "{c}"),
            Self::Complex(c) => write!(f, "<{}>", c.type_name()),
        }
    }
}
