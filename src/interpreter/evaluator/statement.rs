use tracing::debug;

use crate::{
    ast::{ForSource, Handler, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            operand::Operand,
        },
        value::core::Value,
    },
};

/// Name of the variable holding the caught error's message in a handler.
pub const ERROR_VARIABLE: &str = "error";

/// Catch-all exception name.
pub const OTHERS: &str = "others";

impl Context {
    /// Runs a script in the global scope.
    ///
    /// Variables declared at the top level stay in the context after the run.
    ///
    /// # Returns
    /// The value of the last top-level expression statement, if any.
    ///
    /// # Example
    /// ```
    /// use bloc::{
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    ///     parse_source,
    /// };
    ///
    /// let mut ctx = Context::new();
    /// let program = parse_source("let n = 0\nfor i in 1..=4 do { n += i }\nn * 10").unwrap();
    /// assert_eq!(ctx.exec_program(&program).unwrap(), Some(Value::Integer(100)));
    /// assert_eq!(ctx.lookup("n", 1).unwrap(), &Value::Integer(10));
    /// ```
    pub fn exec_program(&mut self, program: &[Statement]) -> EvalResult<Option<Value>> {
        let mut last = None;
        for statement in program {
            if let Some(value) = self.exec_statement(statement)? {
                last = Some(value);
            }
        }
        Ok(last)
    }

    /// Runs `f` inside a fresh variable scope, closing it on every path.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        self.push_scope();
        let result = f(self);
        self.pop_scope();
        result
    }

    fn run_statements(&mut self, body: &[Statement]) -> EvalResult<()> {
        body.iter().try_for_each(|s| self.exec_statement(s).map(drop))
    }

    /// Runs a block in its own scope.
    pub fn exec_block(&mut self, body: &[Statement]) -> EvalResult<()> {
        self.scoped(|ctx| ctx.run_statements(body))
    }

    /// Executes one statement.
    ///
    /// # Returns
    /// The value of an expression statement; `None` for every other kind.
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Option<Value>> {
        match statement {
            Statement::Expression { expr, .. } => return self.eval(expr).map(Some),
            Statement::VariableDeclaration { name, value, .. } => {
                let value = self.eval(value)?;
                self.define(name, value);
            },
            Statement::Assignment { name, value, line } => {
                let value = self.eval(value)?;
                self.store(name, value, *line)?;
            },
            Statement::CompoundAssignment { name, op, value, line } => {
                let right = self.operand(value)?;
                let result =
                    self.lval2(&Operand::Named(name), &right, *line, |ctx, l, r| ctx.eval_binary(*op, l, r, *line))?;
                self.store(name, result, *line)?;
            },
            Statement::If { branches, otherwise, line } => {
                for (condition, body) in branches {
                    if self.eval(condition)?.condition(*line)? {
                        return self.exec_block(body).map(|()| None);
                    }
                }
                if let Some(body) = otherwise {
                    self.exec_block(body)?;
                }
            },
            Statement::While { condition, body, line } => loop {
                self.check_stop(*line)?;
                if !self.eval(condition)?.condition(*line)? {
                    break;
                }
                self.exec_block(body)?;
            },
            Statement::For { var, source, body, line } => self.exec_for(var, source, body, *line)?,
            Statement::Raise { name, line } => {
                debug!(%name, line, "raising exception");
                return Err(RuntimeError::Raised { name: name.clone(),
                                                   line: *line });
            },
            Statement::Try { body, handlers, .. } => self.exec_try(body, handlers)?,
            Statement::Import { name, line } => self.import(name, *line)?,
        }
        Ok(None)
    }

    /// Runs a `for` loop. The loop variable lives in a scope around each
    /// iteration; a collection is snapshotted before the first iteration.
    fn exec_for(&mut self, var: &str, source: &ForSource, body: &[Statement], line: usize) -> EvalResult<()> {
        let values: Box<dyn Iterator<Item = Value>> = match source {
            ForSource::Range { start, end, inclusive } => {
                let start = self.eval(start)?.integer(line)?;
                let end = self.eval(end)?.integer(line)?;
                if *inclusive {
                    Box::new((start..=end).map(Value::Integer))
                } else {
                    Box::new((start..end).map(Value::Integer))
                }
            },
            ForSource::Collection(expr) => {
                Box::new(self.eval(expr)?.into_collection(line)?.into_items().into_iter())
            },
        };

        for value in values {
            self.check_stop(line)?;
            self.scoped(|ctx| {
                    ctx.define(var, value);
                    ctx.exec_block(body)
                })?;
        }
        Ok(())
    }

    /// Runs a `try` block and the first handler matching a caught error.
    ///
    /// Handlers are matched by exception name, then by `others`. Inside the
    /// handler the literal variable `error` holds the error message.
    /// Interruptions are never caught.
    fn exec_try(&mut self, body: &[Statement], handlers: &[Handler]) -> EvalResult<()> {
        let err = match self.exec_block(body) {
            Err(err) if err.is_catchable() => err,
            other => return other,
        };

        let name = err.exception_name();
        let Some(handler) = handlers.iter()
                                    .find(|h| h.name == name)
                                    .or_else(|| handlers.iter().find(|h| h.name == OTHERS))
        else {
            return Err(err);
        };

        debug!(exception = name, line = handler.line, "caught exception");
        let message = err.to_string();
        self.scoped(|ctx| {
                ctx.define(ERROR_VARIABLE, Value::Literal(message));
                ctx.run_statements(&handler.body)
            })
    }
}
