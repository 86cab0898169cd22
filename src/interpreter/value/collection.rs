use std::fmt::{self, Display};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Value,
            promotion::unify,
            types::{Major, Type},
        },
    },
    util::num::{length, position},
};

/// An ordered, resizable sequence whose elements share one declared type.
///
/// Every element is either a value of the element type or a null. A
/// collection built without any typed element (for example `[]`) has an
/// untyped element type and adopts the type of the first value stored in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    element: Type,
    items:   Vec<Value>,
}

impl Collection {
    /// Creates an empty collection of the given element type.
    #[must_use]
    pub const fn new(element: Type) -> Self {
        Self { element,
               items: Vec::new() }
    }

    /// Builds a collection from values, inferring the element type.
    ///
    /// # Errors
    /// `TypeMismatch` when the values have no common type.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::{collection::Collection, core::Value, types::Type};
    ///
    /// let c = Collection::from_values(vec![Value::Integer(1), Value::Numeric(2.5)], 1).unwrap();
    /// assert_eq!(c.element_type(), &Type::numeric());
    /// assert_eq!(c.items()[0], Value::Numeric(1.0));
    ///
    /// assert!(Collection::from_values(vec![Value::Integer(1), Value::from("a")], 1).is_err());
    /// ```
    pub fn from_values(values: Vec<Value>, line: usize) -> EvalResult<Self> {
        let mut element = Type::opaque();
        for value in &values {
            let ty = value.value_type();
            element = unify(&element, &ty).ok_or_else(|| RuntimeError::TypeMismatch {
                details: format!("collection of {element} cannot hold {ty}"),
                line,
            })?;
        }
        let items = values.into_iter()
                          .map(|v| v.coerce_into(&element, line))
                          .collect::<EvalResult<Vec<_>>>()?;
        Ok(Self { element, items })
    }

    /// The declared element type.
    #[must_use]
    pub const fn element_type(&self) -> &Type {
        &self.element
    }

    /// The type of the collection itself.
    #[must_use]
    pub fn collection_type(&self) -> Type {
        self.element.array_of()
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All elements in order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Consumes the collection, returning its elements.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    fn index_error(&self, index: i64, line: usize) -> RuntimeError {
        RuntimeError::IndexRange { index,
                                   size: self.items.len(),
                                   line }
    }

    /// Element at `index`.
    ///
    /// # Errors
    /// `IndexRange` outside `[0, len)`.
    pub fn get(&self, index: i64, line: usize) -> EvalResult<&Value> {
        let at = position(index, self.items.len(), line)?;
        self.items.get(at).ok_or_else(|| self.index_error(index, line))
    }

    /// Converts a value to the element type, fixing an untyped element type
    /// on first use.
    fn admit(&mut self, value: Value, line: usize) -> EvalResult<Value> {
        if self.element.major == Major::NoType && !value.is_null() {
            let ty = value.value_type();
            if ty.level == self.element.level {
                self.element = ty;
            }
        }
        value.coerce_into(&self.element, line)
    }

    /// Whether `ty` is the type of a whole collection that can be spliced in.
    #[must_use]
    pub fn is_spliceable(&self, ty: &Type) -> bool {
        ty.level == self.element.level + 1 && self.collection_type().accepts(ty)
    }

    /// Inserts one element before position `index`, which may equal the
    /// length.
    ///
    /// # Errors
    /// `IndexRange` outside `[0, len]`, `TypeMismatch` for a foreign value.
    pub fn insert(&mut self, index: i64, value: Value, line: usize) -> EvalResult<()> {
        let at = position(index, self.items.len(), line)?;
        if at > self.items.len() {
            return Err(self.index_error(index, line));
        }
        let value = self.admit(value, line)?;
        self.items.insert(at, value);
        Ok(())
    }

    /// Moves every element of `source` into this collection, starting at
    /// position `index` and keeping their order.
    ///
    /// # Errors
    /// `IndexRange` outside `[0, len]`, `TypeMismatch` for a foreign element.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::value::{collection::Collection, core::Value};
    ///
    /// let mut c = Collection::from_values(vec![Value::Integer(1), Value::Integer(4)], 1).unwrap();
    /// let more = Collection::from_values(vec![Value::Integer(2), Value::Integer(3)], 1).unwrap();
    /// c.splice(1, more, 1).unwrap();
    /// assert_eq!(c.to_string(), "[1, 2, 3, 4]");
    /// ```
    pub fn splice(&mut self, index: i64, source: Self, line: usize) -> EvalResult<()> {
        let at = position(index, self.items.len(), line)?;
        if at > self.items.len() {
            return Err(self.index_error(index, line));
        }
        let admitted = source.items
                             .into_iter()
                             .map(|v| self.admit(v, line))
                             .collect::<EvalResult<Vec<_>>>()?;
        self.items.splice(at..at, admitted);
        Ok(())
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// The new element is installed before the old one is handed back, so
    /// the caller releases the old element last.
    ///
    /// # Errors
    /// `IndexRange` outside `[0, len)`, `TypeMismatch` for a foreign value.
    pub fn put(&mut self, index: i64, value: Value, line: usize) -> EvalResult<Value> {
        let at = position(index, self.items.len(), line)?;
        if at >= self.items.len() {
            return Err(self.index_error(index, line));
        }
        let value = self.admit(value, line)?;
        Ok(std::mem::replace(&mut self.items[at], value))
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    /// `IndexRange` outside `[0, len)`.
    pub fn remove(&mut self, index: i64, line: usize) -> EvalResult<Value> {
        let at = position(index, self.items.len(), line)?;
        if at >= self.items.len() {
            return Err(self.index_error(index, line));
        }
        Ok(self.items.remove(at))
    }

    /// Converts every element to `element`, which becomes the declared
    /// element type.
    ///
    /// # Errors
    /// `TypeMismatch` when an element does not convert.
    pub fn retype(self, element: &Type, line: usize) -> EvalResult<Self> {
        let items = self.items
                        .into_iter()
                        .map(|v| v.coerce_into(element, line))
                        .collect::<EvalResult<Vec<_>>>()?;
        Ok(Self { element: element.clone(),
                  items })
    }

    /// Element count as a script integer.
    #[must_use]
    pub fn count(&self) -> i64 {
        length(self.items.len())
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt_nested(f)?;
        }
        f.write_str("]")
    }
}
