use std::{any::Any, collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        plugin::{csv::CsvType, file::FileType},
        value::{core::Value, types::Type},
    },
};

/// How a method parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The method only reads the argument.
    In,
    /// The method may store a new value into the argument, which must be a
    /// variable at the call site.
    InOut,
}

/// One declared parameter of a constructor or method.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name, used in messages.
    pub name:      &'static str,
    /// Declared type.
    pub kind:      Type,
    /// Passing direction.
    pub direction: Direction,
}

impl Param {
    /// An input parameter.
    #[must_use]
    pub const fn input(name: &'static str, kind: Type) -> Self {
        Self { name,
               kind,
               direction: Direction::In }
    }

    /// An in-out parameter.
    #[must_use]
    pub const fn inout(name: &'static str, kind: Type) -> Self {
        Self { name,
               kind,
               direction: Direction::InOut }
    }
}

/// One declared method of a native type.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Method name as written after the dot.
    pub name:   &'static str,
    /// Declared return type.
    pub ret:    Type,
    /// Declared parameters.
    pub params: Vec<Param>,
}

/// The metadata a native type declares: its name, its constructor
/// signatures and its method table.
///
/// Constructors and methods are referred to by their position in these
/// tables when the evaluator dispatches a call.
///
/// # Example
/// ```
/// use bloc::interpreter::{
///     plugin::core::{Interface, Param},
///     value::types::Type,
/// };
///
/// let iface = Interface::new("point").constructor(vec![])
///                                    .constructor(vec![Param::input("x", Type::numeric()),
///                                                      Param::input("y", Type::numeric())])
///                                    .method("norm", Type::numeric(), vec![]);
///
/// assert_eq!(iface.find_constructor(2), Some(1));
/// assert_eq!(iface.find_method("norm", 0).map(|(id, _)| id), Some(0));
/// assert!(iface.find_method("norm", 1).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    /// Type name used by `import` and constructor calls.
    pub name:    String,
    /// Parameter lists of the constructors.
    pub ctors:   Vec<Vec<Param>>,
    /// Method table.
    pub methods: Vec<Method>,
}

impl Interface {
    /// Starts an interface with no constructors or methods.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name:    name.to_string(),
               ctors:   Vec::new(),
               methods: Vec::new(), }
    }

    /// Adds a constructor signature.
    #[must_use]
    pub fn constructor(mut self, params: Vec<Param>) -> Self {
        self.ctors.push(params);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, name: &'static str, ret: Type, params: Vec<Param>) -> Self {
        self.methods.push(Method { name, ret, params });
        self
    }

    /// Index of the constructor taking `arity` arguments.
    #[must_use]
    pub fn find_constructor(&self, arity: usize) -> Option<usize> {
        self.ctors.iter().position(|params| params.len() == arity)
    }

    /// Index and declaration of the method `name` taking `arity` arguments.
    #[must_use]
    pub fn find_method(&self, name: &str, arity: usize) -> Option<(usize, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == name && m.params.len() == arity)
    }

    /// Whether any method is called `name`, whatever its arity.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }
}

/// An argument handed to a native method or stateful builtin.
///
/// `variable` names the variable the argument was read from, if it was a
/// plain variable reference, so in-out parameters can be written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// The evaluated value.
    pub value:    Value,
    /// The source variable, if any.
    pub variable: Option<String>,
}

impl Argument {
    /// Writes `value` back into the argument's variable through the context.
    ///
    /// # Errors
    /// `TypeMismatch` when the argument was not a variable or the value does
    /// not fit the variable's type.
    pub fn store(&self, ctx: &mut Context, value: Value, line: usize) -> EvalResult<()> {
        let Some(name) = &self.variable else {
            return Err(RuntimeError::TypeMismatch { details: "in-out argument is not a variable".to_string(),
                                                    line });
        };
        ctx.store(name, value, line)
    }
}

/// The protocol a foreign type implements to live in the value space.
///
/// The core never looks inside an instance: it only asks the native type to
/// build one, to run a method on one and to release one.
pub trait NativeType {
    /// The declared constructors and methods.
    fn interface(&self) -> &Interface;

    /// Builds a new instance with constructor number `ctor`.
    ///
    /// # Errors
    /// Any runtime error, typically `Plugin`.
    fn construct(&self,
                 ctor: usize,
                 ctx: &mut Context,
                 args: &[Value],
                 line: usize)
                 -> EvalResult<Box<dyn Any>>;

    /// Runs method number `method` on `object`.
    ///
    /// # Errors
    /// Any runtime error, typically `Plugin`.
    fn invoke(&self,
              object: &mut dyn Any,
              method: usize,
              ctx: &mut Context,
              args: &[Argument],
              line: usize)
              -> EvalResult<Value>;

    /// Releases an instance. Called exactly once per constructed instance.
    fn destroy(&self, object: Box<dyn Any>) {
        drop(object);
    }
}

/// Builds the error a native type reports for a failed operation.
pub fn plugin_error(native: &dyn NativeType, message: impl Into<String>, line: usize) -> RuntimeError {
    RuntimeError::Plugin { name: native.interface().name.clone(),
                           message: message.into(),
                           line }
}

/// Recovers the concrete instance a native type stored in a `Complex`.
///
/// # Errors
/// `Plugin` when the instance has a different concrete type.
pub fn downcast<'a, T: 'static>(native: &dyn NativeType,
                                object: &'a mut dyn Any,
                                line: usize)
                                -> EvalResult<&'a mut T> {
    object.downcast_mut::<T>()
          .ok_or_else(|| plugin_error(native, "foreign instance", line))
}

/// Lookup table of native types keyed by type name.
#[derive(Clone, Default)]
pub struct Registry {
    types: HashMap<String, Rc<dyn NativeType>>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the bundled `csv` and `file` types.
    #[must_use]
    pub fn with_bundled() -> Self {
        let mut registry = Self::new();
        registry.register(Rc::new(CsvType::new()));
        registry.register(Rc::new(FileType::new()));
        registry
    }

    /// Registers a native type under its interface name, replacing any type
    /// registered under the same name.
    pub fn register(&mut self, native: Rc<dyn NativeType>) {
        let name = native.interface().name.clone();
        debug!(%name, "registered native type");
        self.types.insert(name, native);
    }

    /// The native type registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<dyn NativeType>> {
        self.types.get(name)
    }

    /// True when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.types.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("types", &names).finish()
    }
}
