use std::fmt::{self, Display};

/// The major kind of a value.
///
/// Collections are not a major kind of their own: a collection of integers is
/// an `Integer` type with a nesting `level` of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Major {
    /// The type of an untyped `null` before it unifies with anything.
    NoType,
    /// `true` / `false`.
    Boolean,
    /// 64-bit signed integer.
    Integer,
    /// Double precision floating point.
    Numeric,
    /// Complex number built into the language.
    Imaginary,
    /// Character string.
    Literal,
    /// Byte array.
    TabChar,
    /// Native object provided by a plugin.
    Complex,
    /// Fixed-arity tuple.
    RowType,
}

/// Structural detail attached to tuple and object types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Schema {
    /// No sub-schema.
    None,
    /// Ordered field types of a tuple.
    Row(Vec<Type>),
    /// Registered name of a native object type.
    Object(String),
}

/// Static type descriptor of a value.
///
/// A type is a major kind, an array nesting level (0 for scalars) and, for
/// tuples and native objects, a structural schema.
///
/// # Example
/// ```
/// use bloc::interpreter::value::types::{Major, Type};
///
/// let ints = Type::integer().array_of();
/// assert_eq!(ints.level, 1);
/// assert_eq!(ints.element(), Some(Type::integer()));
/// assert_eq!(ints.to_string(), "integer[]");
/// assert_eq!(Type::scalar(Major::Literal).to_string(), "literal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    /// Major kind.
    pub major:  Major,
    /// Array nesting level, 0 for scalars.
    pub level:  usize,
    /// Tuple fields or object type name.
    pub schema: Schema,
}

impl Type {
    /// Scalar type of the given major kind.
    #[must_use]
    pub const fn scalar(major: Major) -> Self {
        Self { major,
               level: 0,
               schema: Schema::None }
    }

    /// The untyped null type.
    #[must_use]
    pub const fn opaque() -> Self {
        Self::scalar(Major::NoType)
    }

    /// `boolean`
    #[must_use]
    pub const fn boolean() -> Self {
        Self::scalar(Major::Boolean)
    }

    /// `integer`
    #[must_use]
    pub const fn integer() -> Self {
        Self::scalar(Major::Integer)
    }

    /// `numeric`
    #[must_use]
    pub const fn numeric() -> Self {
        Self::scalar(Major::Numeric)
    }

    /// `imaginary`
    #[must_use]
    pub const fn imaginary() -> Self {
        Self::scalar(Major::Imaginary)
    }

    /// `literal`
    #[must_use]
    pub const fn literal() -> Self {
        Self::scalar(Major::Literal)
    }

    /// `tabchar`
    #[must_use]
    pub const fn tabchar() -> Self {
        Self::scalar(Major::TabChar)
    }

    /// Tuple type with the given field types.
    #[must_use]
    pub const fn row(fields: Vec<Self>) -> Self {
        Self { major:  Major::RowType,
               level:  0,
               schema: Schema::Row(fields), }
    }

    /// Type of instances of the named native type.
    #[must_use]
    pub fn object(name: &str) -> Self {
        Self { major:  Major::Complex,
               level:  0,
               schema: Schema::Object(name.to_string()), }
    }

    /// The collection type whose elements have this type.
    #[must_use]
    pub fn array_of(&self) -> Self {
        Self { major:  self.major,
               level:  self.level + 1,
               schema: self.schema.clone(), }
    }

    /// The element type if this is a collection type.
    #[must_use]
    pub fn element(&self) -> Option<Self> {
        (self.level > 0).then(|| Self { major:  self.major,
                                        level:  self.level - 1,
                                        schema: self.schema.clone(), })
    }

    /// True for the untyped null type.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.major == Major::NoType && self.level == 0
    }

    /// True for collection types.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.level > 0
    }

    /// True when this is a scalar of the given major kind.
    #[must_use]
    pub fn is_scalar(&self, major: Major) -> bool {
        self.level == 0 && self.major == major
    }

    /// True for scalar integer, numeric and imaginary types.
    #[must_use]
    pub fn is_number(&self) -> bool {
        self.level == 0 && matches!(self.major, Major::Integer | Major::Numeric | Major::Imaginary)
    }

    /// Tuple field types, if this is a tuple type.
    #[must_use]
    pub fn fields(&self) -> Option<&[Self]> {
        match (&self.schema, self.level) {
            (Schema::Row(fields), 0) => Some(fields),
            _ => None,
        }
    }

    /// Native type name, if this is an object type.
    #[must_use]
    pub fn object_name(&self) -> Option<&str> {
        match (&self.schema, self.level) {
            (Schema::Object(name), 0) => Some(name),
            _ => None,
        }
    }

    /// Whether a value of type `other` may be stored in a slot of this type.
    ///
    /// The untyped null type is compatible with everything. Integers and
    /// numerics convert into each other and into imaginaries, element-wise for
    /// collections of the same level. Tuples require identical field
    /// sequences.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::types::Type;
    ///
    /// assert!(Type::numeric().accepts(&Type::integer()));
    /// assert!(Type::integer().accepts(&Type::opaque()));
    /// assert!(!Type::integer().accepts(&Type::literal()));
    ///
    /// let row = Type::row(vec![Type::literal(), Type::integer()]);
    /// assert!(row.accepts(&row.clone()));
    /// assert!(!row.accepts(&Type::row(vec![Type::literal()])));
    /// ```
    #[must_use]
    pub fn accepts(&self, other: &Self) -> bool {
        if self.is_opaque() || other.is_opaque() {
            return true;
        }
        if self.level != other.level {
            return false;
        }
        if self.major == Major::NoType || other.major == Major::NoType {
            return true;
        }
        let numeric = |major| matches!(major, Major::Integer | Major::Numeric | Major::Imaginary);
        if numeric(self.major) && numeric(other.major) {
            return self.major == Major::Imaginary || other.major != Major::Imaginary;
        }
        self.major == other.major && self.schema == other.schema
    }
}

impl Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoType => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Numeric => "numeric",
            Self::Imaginary => "imaginary",
            Self::Literal => "literal",
            Self::TabChar => "tabchar",
            Self::Complex => "object",
            Self::RowType => "tuple",
        };
        f.write_str(name)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Schema::None => write!(f, "{}", self.major)?,
            Schema::Object(name) => f.write_str(name)?,
            Schema::Row(fields) => {
                f.write_str("tuple(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(")")?;
            },
        }
        for _ in 0..self.level {
            f.write_str("[]")?;
        }
        Ok(())
    }
}
