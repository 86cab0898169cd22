use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    io::BufRead,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use rand::{SeedableRng, rngs::StdRng};
use regex::Regex;
use tracing::{debug, trace};

use crate::{
    ast::Expr,
    config::Config,
    error::RuntimeError,
    interpreter::{
        evaluator::{function::input::LineReader, operand::Operand},
        plugin::core::{NativeType, Registry},
        value::{
            collection::Collection,
            core::Value,
            types::{Major, Type},
        },
    },
    util::num::position,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// A variable: its declared type and its current value.
///
/// A slot declared from an untyped `null` has the opaque type and adopts the
/// type of the first non-null value stored into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Declared type.
    pub kind:  Type,
    /// Current value, always of type `kind` or a null.
    pub value: Value,
}

/// Stores the runtime evaluation context.
///
/// The context owns every variable, the registry of native types, the
/// imported type names, the `random` generator, the stop flag and the
/// standard input reader.
///
/// ## Usage
///
/// A `Context` is created once and reused for every script or statement run
/// against it, so variables and imports persist between runs. It is meant for
/// one thread; only the stop flag may be shared.
pub struct Context {
    scopes:        Vec<HashMap<String, Slot>>,
    registry:      Registry,
    imports:       HashSet<String>,
    rng:           StdRng,
    stop:          Arc<AtomicBool>,
    allocations:   usize,
    regex_cache:   RefCell<HashMap<String, Regex>>,
    input:         Option<LineReader>,
    input_timeout: Duration,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with the bundled native types and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates a context with the bundled native types and the given
    /// settings.
    ///
    /// # Example
    /// ```
    /// use bloc::{config::Config, interpreter::evaluator::core::Context, run};
    ///
    /// let mut a = Context::with_config(&Config::default().with_seed(42));
    /// let mut b = Context::with_config(&Config::default().with_seed(42));
    /// assert_eq!(run("random(1000)", &mut a).unwrap(),
    ///            run("random(1000)", &mut b).unwrap());
    /// ```
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        let rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { scopes: vec![HashMap::new()],
               registry: Registry::with_bundled(),
               imports: HashSet::new(),
               rng,
               stop: Arc::new(AtomicBool::new(false)),
               allocations: 0,
               regex_cache: RefCell::new(HashMap::new()),
               input: None,
               input_timeout: config.input_timeout }
    }

    /// Replaces standard input as the source of `input` lines.
    #[must_use]
    pub fn with_input(mut self, reader: impl BufRead + Send + 'static) -> Self {
        self.input = Some(LineReader::spawn(reader));
        self
    }

    /// Registers an additional native type.
    pub fn register(&mut self, native: Rc<dyn NativeType>) {
        self.registry.register(native);
    }

    /// The registered native types.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Names made visible with `import`.
    #[must_use]
    pub const fn imports(&self) -> &HashSet<String> {
        &self.imports
    }

    /// Makes a registered native type visible.
    ///
    /// # Errors
    /// `UnknownType` when no type is registered under `name`.
    pub fn import(&mut self, name: &str, line: usize) -> EvalResult<()> {
        if !self.registry.contains(name) {
            return Err(RuntimeError::UnknownType { name: name.to_string(),
                                                   line });
        }
        debug!(%name, "imported native type");
        self.imports.insert(name.to_string());
        Ok(())
    }

    /// The imported native type called `name`.
    #[must_use]
    pub fn native(&self, name: &str) -> Option<Rc<dyn NativeType>> {
        self.imports
            .contains(name)
            .then(|| self.registry.get(name).cloned())
            .flatten()
    }

    /// A handle that stops evaluation when set from any thread.
    ///
    /// Loops and `input` consult the flag and fail with `Interrupted`.
    #[must_use]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Fails with `Interrupted` once the stop flag is set.
    pub(crate) fn check_stop(&self, line: usize) -> EvalResult<()> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(RuntimeError::Interrupted { line });
        }
        Ok(())
    }

    /// Hands out a fresh transient value.
    ///
    /// Operators call this only when neither operand is a temporary whose
    /// storage could hold the result.
    pub(crate) fn allocate(&mut self, value: Value) -> Value {
        self.allocations += 1;
        trace!(allocations = self.allocations, ty = %value.value_type(), "allocated transient value");
        value
    }

    /// Number of transient values allocated so far.
    #[must_use]
    pub const fn allocations(&self) -> usize {
        self.allocations
    }

    pub(crate) const fn regex_cache(&self) -> &RefCell<HashMap<String, Regex>> {
        &self.regex_cache
    }

    pub(crate) const fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Reads the next line for `input`, starting the standard input reader
    /// on first use.
    ///
    /// # Returns
    /// `None` at end of input.
    pub(crate) fn read_line(&mut self, line: usize) -> EvalResult<Option<String>> {
        let reader = self.input.get_or_insert_with(LineReader::stdin);
        reader.next_line(&self.stop, self.input_timeout, line)
    }

    /// Opens a nested variable scope.
    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Closes the innermost variable scope, dropping its variables.
    pub(crate) fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares `name` in the innermost scope, shadowing any outer variable.
    pub fn define(&mut self, name: &str, value: Value) {
        let kind = value.value_type();
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), Slot { kind, value });
        }
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }

    /// Reads a variable.
    ///
    /// # Errors
    /// `UnknownVariable` when no scope declares `name`.
    pub fn lookup(&self, name: &str, line: usize) -> EvalResult<&Value> {
        self.slot(name)
            .map(|slot| &slot.value)
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                           line })
    }

    /// Runs `f` on a variable's value in place.
    ///
    /// An opaque slot adopts the type the value has afterwards.
    pub(crate) fn with_variable<T>(&mut self,
                                   name: &str,
                                   line: usize,
                                   f: impl FnOnce(&mut Value) -> EvalResult<T>)
                                   -> EvalResult<T> {
        let slot = self.slot_mut(name)
                       .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                                      line })?;
        let result = f(&mut slot.value)?;
        adopt(slot);
        Ok(result)
    }

    /// Stores `value` into an existing variable, converting it to the
    /// variable's type.
    ///
    /// # Errors
    /// `UnknownVariable` for an undeclared name and `TypeMismatch` when the
    /// value does not convert.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut ctx = Context::new();
    /// ctx.define("n", Value::Integer(1));
    /// ctx.store("n", Value::Numeric(7.9), 1).unwrap();
    /// assert_eq!(ctx.lookup("n", 1).unwrap(), &Value::Integer(7));
    /// assert!(ctx.store("n", Value::from("x"), 1).is_err());
    /// ```
    pub fn store(&mut self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        let slot = self.slot_mut(name)
                       .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                                      line })?;
        slot.value = value.coerce_into(&slot.kind, line)?;
        adopt(slot);
        Ok(())
    }

    /// Declared types of the variables visible at the outermost level,
    /// used to seed the static checker.
    #[must_use]
    pub fn variables(&self) -> HashMap<String, Type> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.iter().map(|(name, slot)| (name.clone(), slot.kind.clone())))
            .collect()
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. A variable
    /// yields a copy of its value; every other expression yields the
    /// temporary it produced.
    ///
    /// # Example
    /// ```
    /// use bloc::{
    ///     ast::{BinaryOperator, Expr, LiteralValue},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut ctx = Context::new();
    /// let expr = Expr::BinaryOp { left:  Box::new(Expr::Literal { value: LiteralValue::from(2),
    ///                                                             line:  1, }),
    ///                             op:    BinaryOperator::Mul,
    ///                             right: Box::new(Expr::Literal { value: LiteralValue::from(2.5),
    ///                                                             line:  1, }),
    ///                             line:  1, };
    /// assert_eq!(ctx.eval(&expr).unwrap(), Value::Numeric(5.0));
    /// ```
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        let line = expr.line_number();
        self.operand(expr)?.into_value(self, line)
    }

    /// Evaluates an expression without copying a variable it names.
    ///
    /// Operators use the result to decide whether they may reuse an
    /// operand's storage.
    pub(crate) fn operand<'e>(&mut self, expr: &'e Expr) -> EvalResult<Operand<'e>> {
        match expr {
            Expr::Literal { value, .. } => Ok(Operand::Temp(Value::from(value))),
            Expr::Variable { name, line } => {
                self.lookup(name, *line)?;
                Ok(Operand::Named(name))
            },
            Expr::UnaryOp { op, expr, line } => self.eval_unary_op(*op, expr, *line).map(Operand::Temp),
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => self.eval_binary_op(left, *op, right, *line).map(Operand::Temp),
            Expr::FunctionCall { name,
                                 arguments,
                                 line, } => self.eval_call(name, arguments, *line).map(Operand::Temp),
            Expr::MemberCall { receiver,
                               method,
                               arguments,
                               line, } => self.eval_member_call(receiver, method, arguments, *line),
            Expr::Index { target, index, line } => {
                self.eval_index(target, index, *line).map(Operand::Temp)
            },
            Expr::Field { target,
                          position,
                          line, } => self.eval_field(target, *position, *line).map(Operand::Temp),
            Expr::CollectionLiteral { elements, line } => {
                let values = elements.iter()
                                     .map(|e| self.eval(e))
                                     .collect::<EvalResult<Vec<_>>>()?;
                Ok(Operand::Temp(Value::Collection(Collection::from_values(values, *line)?)))
            },
        }
    }

    /// Evaluates `target[index]`.
    ///
    /// A temporary collection gives up the element; a variable keeps it and
    /// the result is a copy.
    fn eval_index(&mut self, target: &Expr, index: &Expr, line: usize) -> EvalResult<Value> {
        let target = self.operand(target)?;
        let index = self.eval(index)?.integer(line)?;
        match target {
            Operand::Temp(value) => {
                let collection = value.into_collection(line)?;
                collection.get(index, line)?;
                let at = position(index, collection.len(), line)?;
                Ok(collection.into_items().swap_remove(at))
            },
            Operand::Named(name) => Ok(self.lookup(name, line)?
                                           .collection(line)?
                                           .get(index, line)?
                                           .clone()),
        }
    }

    /// Evaluates `target@position`.
    fn eval_field(&mut self, target: &Expr, position: usize, line: usize) -> EvalResult<Value> {
        let target = self.operand(target)?;
        Ok(target.get(self, line)?.tuple(line)?.field(position, line)?.clone())
    }
}

/// Lets an opaque slot take the type of its first non-null value.
fn adopt(slot: &mut Slot) {
    let ty = slot.value.value_type();
    if slot.kind.major == Major::NoType
       && ty.major != Major::NoType
       && (slot.kind.is_opaque() || slot.kind.level == ty.level)
    {
        slot.kind = ty;
    }
}
