use std::collections::{HashMap, HashSet};

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        evaluator::core::Context,
        parser::core::ParseResult,
        plugin::core::{Interface, Registry},
        value::types::{Major, Type},
    },
};

/// Walks a parsed script and rejects it before anything runs when an
/// operator, call or assignment is statically ill-typed.
///
/// The checker sees the variables and imports the context already holds, so
/// a script may build on an earlier run against the same context.
///
/// # Example
/// ```
/// use bloc::{
///     interpreter::{checker::core::Checker, evaluator::core::Context},
///     parse_source,
/// };
///
/// let ctx = Context::new();
/// let good = parse_source("let s = \"ab\"\ns.insert(1, 'x')").unwrap();
/// assert!(Checker::new(&ctx).check_program(&good).is_ok());
///
/// let bad = parse_source("let s = \"ab\"\ns - 1").unwrap();
/// assert!(Checker::new(&ctx).check_program(&bad).is_err());
/// ```
pub struct Checker<'c> {
    scopes:   Vec<HashMap<String, Type>>,
    imports:  HashSet<String>,
    registry: &'c Registry,
}

impl<'c> Checker<'c> {
    /// Starts a checker seeded from the context's variables and imports.
    #[must_use]
    pub fn new(ctx: &'c Context) -> Self {
        Self { scopes:   vec![ctx.variables()],
               imports:  ctx.imports().clone(),
               registry: ctx.registry(), }
    }

    /// Checks every statement of a script.
    ///
    /// # Errors
    /// The first static error found.
    pub fn check_program(&mut self, program: &[Statement]) -> ParseResult<()> {
        program.iter().try_for_each(|s| self.check_statement(s))
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Runs `f` inside a nested scope.
    pub(crate) fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.push_scope();
        let result = f(self);
        self.pop_scope();
        result
    }

    pub(crate) fn define(&mut self, name: &str, ty: Type) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    pub(crate) fn lookup(&self, name: &str, line: usize) -> ParseResult<&Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| ParseError::UnknownVariable { name: name.to_string(),
                                                         line })
    }

    /// Lets a variable declared from an untyped `null` take the type of the
    /// first typed value assigned to it.
    pub(crate) fn adopt(&mut self, name: &str, ty: &Type) {
        if ty.major == Major::NoType {
            return;
        }
        if let Some(slot) = self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))
           && slot.major == Major::NoType
           && (slot.is_opaque() || slot.level == ty.level)
        {
            *slot = ty.clone();
        }
    }

    /// The interface of an imported native type.
    pub(crate) fn imported(&self, name: &str) -> Option<&'c Interface> {
        if !self.imports.contains(name) {
            return None;
        }
        self.registry.get(name).map(|native| native.interface())
    }

    /// The interface of any registered native type, imported or not.
    pub(crate) fn interface(&self, name: &str) -> Option<&'c Interface> {
        self.registry.get(name).map(|native| native.interface())
    }

    pub(crate) fn import(&mut self, name: &str, line: usize) -> ParseResult<()> {
        if !self.registry.contains(name) {
            return Err(ParseError::UnknownType { name: name.to_string(),
                                                 line });
        }
        self.imports.insert(name.to_string());
        Ok(())
    }
}
