use crate::{
    ast::{Expr, ForSource, Statement},
    error::ParseError,
    interpreter::{
        checker::core::Checker,
        evaluator::{function::core::Class, statement::ERROR_VARIABLE},
        parser::core::ParseResult,
        value::{
            promotion::binary_result,
            types::{Major, Type},
        },
    },
};

fn condition(ty: &Type, line: usize) -> ParseResult<()> {
    if ty.is_opaque() || ty.is_scalar(Major::Boolean) {
        return Ok(());
    }
    Err(ParseError::TypeMismatch { details: format!("condition must be a boolean, found {ty}"),
                                   line })
}

impl Checker<'_> {
    /// Checks one statement, declaring what it declares.
    ///
    /// # Errors
    /// Any error of [`Checker::type_of`], plus `TypeMismatch` for an
    /// assignment the variable cannot hold or a non-boolean condition and
    /// `UnknownType` for an import of an unregistered type.
    pub fn check_statement(&mut self, statement: &Statement) -> ParseResult<()> {
        match statement {
            Statement::Expression { expr, .. } => {
                self.type_of(expr)?;
            },
            Statement::VariableDeclaration { name, value, .. } => {
                let ty = self.type_of(value)?;
                self.define(name, ty);
            },
            Statement::Assignment { name, value, line } => {
                let ty = self.type_of(value)?;
                self.assign(name, &ty, *line)?;
            },
            Statement::CompoundAssignment { name, op, value, line } => {
                let target = self.lookup(name, *line)?.clone();
                let ty = self.type_of(value)?;
                let result = binary_result(*op, &target, &ty).ok_or_else(|| ParseError::InvalidExpression {
                    details: format!("'{op}=' cannot combine {target} and {ty}"),
                    line: *line,
                })?;
                self.assign(name, &result, *line)?;
            },
            Statement::If { branches, otherwise, line } => {
                for (cond, body) in branches {
                    condition(&self.type_of(cond)?, *line)?;
                    self.check_block(body)?;
                }
                if let Some(body) = otherwise {
                    self.check_block(body)?;
                }
            },
            Statement::While { condition: cond, body, line } => {
                condition(&self.type_of(cond)?, *line)?;
                self.check_block(body)?;
            },
            Statement::For { var, source, body, line } => {
                let element = self.for_element(source, *line)?;
                self.scoped(|checker| {
                        checker.define(var, element);
                        checker.check_block(body)
                    })?;
            },
            Statement::Raise { .. } => {},
            Statement::Try { body, handlers, .. } => {
                self.check_block(body)?;
                for handler in handlers {
                    self.scoped(|checker| {
                            checker.define(ERROR_VARIABLE, Type::literal());
                            handler.body.iter().try_for_each(|s| checker.check_statement(s))
                        })?;
                }
            },
            Statement::Import { name, line } => self.import(name, *line)?,
        }
        Ok(())
    }

    fn check_block(&mut self, body: &[Statement]) -> ParseResult<()> {
        self.scoped(|checker| body.iter().try_for_each(|s| checker.check_statement(s)))
    }

    fn assign(&mut self, name: &str, ty: &Type, line: usize) -> ParseResult<()> {
        let target = self.lookup(name, line)?;
        if !target.accepts(ty) {
            return Err(ParseError::TypeMismatch { details: format!("cannot assign {ty} to '{name}' of type {target}"),
                                                  line });
        }
        self.adopt(name, ty);
        Ok(())
    }

    /// Type of the loop variable.
    fn for_element(&mut self, source: &ForSource, line: usize) -> ParseResult<Type> {
        match source {
            ForSource::Range { start, end, .. } => {
                self.bound(start, line)?;
                self.bound(end, line)?;
                Ok(Type::integer())
            },
            ForSource::Collection(expr) => {
                let ty = self.type_of(expr)?;
                if ty.is_opaque() {
                    return Ok(Type::opaque());
                }
                ty.element()
                  .ok_or_else(|| ParseError::TypeMismatch { details: format!("cannot iterate over {ty}"),
                                                            line })
            },
        }
    }

    fn bound(&mut self, expr: &Expr, line: usize) -> ParseResult<()> {
        let ty = self.type_of(expr)?;
        if Class::Integer.admits(&ty) {
            return Ok(());
        }
        Err(ParseError::TypeMismatch { details: format!("range bound must be an integer, found {ty}"),
                                       line })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ParseError,
        interpreter::{checker::core::Checker, evaluator::core::Context},
        parse_source,
        run,
    };

    fn check(ctx: &Context, source: &str) -> Result<(), ParseError> {
        let program = parse_source(source)?;
        Checker::new(ctx).check_program(&program)
    }

    #[test]
    fn assignments_follow_declared_types() {
        let ctx = Context::new();
        assert!(check(&ctx, "let n = 1\nn = 2.5").is_ok());
        assert!(check(&ctx, "let x = 1.5\nx += 1").is_ok());
        assert!(matches!(check(&ctx, "let n = 1\nn = \"a\""), Err(ParseError::TypeMismatch { .. })));
        assert!(matches!(check(&ctx, "let s = \"a\"\ns -= 1"), Err(ParseError::InvalidExpression { .. })));
        assert!(matches!(check(&ctx, "m = 1"), Err(ParseError::UnknownVariable { .. })));
    }

    #[test]
    fn untyped_null_adopts_first_type() {
        let ctx = Context::new();
        assert!(check(&ctx, "let v = null\nv = 1\nv = 2.0").is_ok());
        assert!(matches!(check(&ctx, "let v = null\nv = 1\nv = \"a\""),
                         Err(ParseError::TypeMismatch { .. })));
    }

    #[test]
    fn conditions_are_boolean() {
        let ctx = Context::new();
        assert!(check(&ctx, "if 1 < 2 do { 1 }").is_ok());
        assert!(matches!(check(&ctx, "while 1 do { 1 }"), Err(ParseError::TypeMismatch { .. })));
    }

    #[test]
    fn blocks_scope_variables() {
        let ctx = Context::new();
        assert!(check(&ctx, "for i in 0..3 do { let k = i * 2 }").is_ok());
        assert!(matches!(check(&ctx, "for i in 0..3 do { let k = i }\nk"),
                         Err(ParseError::UnknownVariable { .. })));
        assert!(matches!(check(&ctx, "for c in 5 do { c }"), Err(ParseError::TypeMismatch { .. })));
        assert!(check(&ctx, "try do { raise oops } catch others do { print(error) }").is_ok());
    }

    #[test]
    fn imports_and_earlier_runs_are_visible() {
        let mut ctx = Context::new();
        assert!(matches!(check(&ctx, "import nope"), Err(ParseError::UnknownType { .. })));
        run("import csv\nlet total = 0", &mut ctx).unwrap();
        assert!(check(&ctx, "total += 1\ncsv(\";\").separator()").is_ok());
    }
}
