use crate::{
    ast::{Expr, LiteralValue, Member},
    error::ParseError,
    interpreter::{
        checker::core::Checker,
        evaluator::{
            function::core::{Class, find_builtin},
            member::SEQUENCE_METHODS,
        },
        parser::core::ParseResult,
        plugin::core::{Direction, Param},
        value::{
            promotion::{binary_result, unary_result, unify},
            types::{Major, Type},
        },
    },
};

/// The static type of a literal constant.
fn literal_type(value: &LiteralValue) -> Type {
    match value {
        LiteralValue::Null => Type::opaque(),
        LiteralValue::Boolean(_) => Type::boolean(),
        LiteralValue::Integer(_) => Type::integer(),
        LiteralValue::Numeric(_) => Type::numeric(),
        LiteralValue::Imaginary(_) => Type::imaginary(),
        LiteralValue::Literal(_) => Type::literal(),
    }
}

fn argument_type(name: &str,
                 position: usize,
                 expected: impl Into<String>,
                 found: &Type,
                 line: usize)
                 -> ParseError {
    ParseError::ArgumentType { name: name.to_string(),
                               position,
                               expected: expected.into(),
                               found: found.to_string(),
                               line }
}

fn argument_count(name: &str, found: usize, line: usize) -> ParseError {
    ParseError::ArgumentCount { name: name.to_string(),
                                found,
                                line }
}

impl Checker<'_> {
    /// Computes the static type of an expression.
    ///
    /// An opaque type means the type is only known at run time; every
    /// operator and call admits it.
    ///
    /// # Errors
    /// `UnknownVariable`, `UnknownFunction` and `UnknownMethod` for unknown
    /// names, `InvalidExpression` for operands outside an operator's domain,
    /// `ArgumentCount`, `ArgumentType` and `NotAssignable` for bad calls and
    /// `TypeMismatch` for bad indexing or mixed collection literals.
    pub fn type_of(&mut self, expr: &Expr) -> ParseResult<Type> {
        match expr {
            Expr::Literal { value, .. } => Ok(literal_type(value)),
            Expr::Variable { name, line } => self.lookup(name, *line).cloned(),
            Expr::UnaryOp { op, expr, line } => {
                let ty = self.type_of(expr)?;
                unary_result(*op, &ty).ok_or_else(|| ParseError::InvalidExpression { details: format!("'{op}' cannot apply to {ty}"),
                                                                                     line:    *line, })
            },
            Expr::BinaryOp { left, op, right, line } => {
                let lhs = self.type_of(left)?;
                let rhs = self.type_of(right)?;
                binary_result(*op, &lhs, &rhs).ok_or_else(|| ParseError::InvalidExpression {
                    details: format!("'{op}' cannot combine {lhs} and {rhs}"),
                    line: *line,
                })
            },
            Expr::FunctionCall { name, arguments, line } => self.call_type(name, arguments, *line),
            Expr::MemberCall { receiver,
                               method,
                               arguments,
                               line, } => self.member_type(receiver, method, arguments, *line),
            Expr::Index { target, index, line } => {
                let target = self.type_of(target)?;
                let index = self.type_of(index)?;
                if !Class::Integer.admits(&index) {
                    return Err(ParseError::TypeMismatch { details: format!("index must be an integer, found {index}"),
                                                          line:    *line, });
                }
                if target.is_opaque() {
                    return Ok(Type::opaque());
                }
                target.element()
                      .ok_or_else(|| ParseError::TypeMismatch { details: format!("{target} cannot be indexed"),
                                                                line:    *line, })
            },
            Expr::Field { target, position, line } => {
                let target = self.type_of(target)?;
                if target.is_opaque() {
                    return Ok(Type::opaque());
                }
                let fields = target.fields()
                                   .ok_or_else(|| ParseError::TypeMismatch { details: format!("{target} has no fields"),
                                                                             line:    *line, })?;
                position.checked_sub(1)
                        .and_then(|at| fields.get(at))
                        .cloned()
                        .ok_or_else(|| ParseError::TypeMismatch { details: format!("{target} has no field {position}"),
                                                                  line:    *line, })
            },
            Expr::CollectionLiteral { elements, line } => {
                let mut element = Type::opaque();
                for e in elements {
                    let ty = self.type_of(e)?;
                    element = unify(&element, &ty).ok_or_else(|| ParseError::TypeMismatch {
                        details: format!("collection of {element} cannot hold {ty}"),
                        line: *line,
                    })?;
                }
                Ok(element.array_of())
            },
        }
    }

    /// Types of the arguments of a call.
    fn argument_types(&mut self, arguments: &[Expr]) -> ParseResult<Vec<Type>> {
        arguments.iter().map(|a| self.type_of(a)).collect()
    }

    /// `name(arguments)`: a native constructor or a builtin.
    fn call_type(&mut self, name: &str, arguments: &[Expr], line: usize) -> ParseResult<Type> {
        let types = self.argument_types(arguments)?;

        if let Some(interface) = self.imported(name) {
            let ctor = interface.find_constructor(types.len())
                                .ok_or_else(|| argument_count(name, types.len(), line))?;
            check_params(name, &interface.ctors[ctor], arguments, &types, line)?;
            return Ok(Type::object(name));
        }

        let builtin = find_builtin(name).ok_or_else(|| ParseError::UnknownFunction { name: name.to_string(),
                                                                                    line })?;
        if !builtin.arity.check(types.len()) {
            return Err(argument_count(name, types.len(), line));
        }
        for (i, (ty, expr)) in types.iter().zip(arguments).enumerate() {
            let class = builtin.class(i);
            if !class.admits(ty) {
                return Err(argument_type(name, i + 1, class.describe(), ty, line));
            }
            if class == Class::Variable && !matches!(expr, Expr::Variable { .. }) {
                return Err(ParseError::NotAssignable { name: name.to_string(),
                                                       position: i + 1,
                                                       line });
            }
        }
        // Arguments that are ordered against each other must all be numbers
        // or all be literals.
        let mut kinds = types.iter()
                             .enumerate()
                             .filter(|(i, ty)| builtin.class(*i) == Class::NumberOrText && !ty.is_opaque())
                             .map(|(_, ty)| ty.is_scalar(Major::Literal));
        if let Some(first) = kinds.next()
           && kinds.any(|kind| kind != first)
        {
            return Err(ParseError::TypeMismatch { details: format!("'{name}' needs all numbers or all literals"),
                                                  line });
        }
        Ok((builtin.ret)(&types))
    }

    /// `receiver.method(arguments)`.
    fn member_type(&mut self,
                   receiver: &Expr,
                   method: &Member,
                   arguments: &[Expr],
                   line: usize)
                   -> ParseResult<Type> {
        let receiver = self.type_of(receiver)?;
        let types = self.argument_types(arguments)?;
        let name = method.to_string();
        let unknown = || ParseError::UnknownMethod { name:     name.clone(),
                                                     receiver: receiver.to_string(),
                                                     line };

        if receiver.is_opaque() {
            return Ok(Type::opaque());
        }

        if let Some(object) = receiver.object_name() {
            let interface = self.interface(object).ok_or_else(unknown)?;
            let Some((_, declared)) = interface.find_method(&name, types.len()) else {
                if interface.has_method(&name) {
                    return Err(argument_count(&name, types.len(), line));
                }
                return Err(unknown());
            };
            check_params(&name, &declared.params, arguments, &types, line)?;
            return Ok(declared.ret.clone());
        }

        if let Member::SetField(position) = method {
            let fields = receiver.fields().ok_or_else(unknown)?;
            let field = position.checked_sub(1)
                                .and_then(|at| fields.get(at))
                                .ok_or_else(|| ParseError::TypeMismatch { details: format!("{receiver} has no field {position}"),
                                                                          line })?;
            expect_count(&name, &types, 1, line)?;
            if !field.accepts(&types[0]) {
                return Err(argument_type(&name, 1, field.to_string(), &types[0], line));
            }
            return Ok(receiver);
        }

        if receiver.fields().is_some() {
            return if name == "count" {
                expect_count(&name, &types, 0, line)?;
                Ok(Type::integer())
            } else {
                Err(unknown())
            };
        }

        let sequence = receiver.is_collection()
                       || receiver.is_scalar(Major::Literal)
                       || receiver.is_scalar(Major::TabChar);
        if !sequence || !SEQUENCE_METHODS.contains(&name.as_str()) {
            return Err(unknown());
        }
        sequence_method(&name, &receiver, &types, line)
    }
}

fn expect_count(name: &str, types: &[Type], count: usize, line: usize) -> ParseResult<()> {
    if types.len() == count {
        Ok(())
    } else {
        Err(argument_count(name, types.len(), line))
    }
}

/// Checks call arguments against declared native parameters.
fn check_params(name: &str, params: &[Param], arguments: &[Expr], types: &[Type], line: usize) -> ParseResult<()> {
    for (i, ((param, ty), expr)) in params.iter().zip(types).zip(arguments).enumerate() {
        if !param.kind.accepts(ty) {
            return Err(argument_type(name, i + 1, param.kind.to_string(), ty, line));
        }
        if param.direction == Direction::InOut && !matches!(expr, Expr::Variable { .. }) {
            return Err(ParseError::NotAssignable { name: name.to_string(),
                                                   position: i + 1,
                                                   line });
        }
    }
    Ok(())
}

/// Signature of a builtin method on a string, byte array or collection.
fn sequence_method(name: &str, receiver: &Type, types: &[Type], line: usize) -> ParseResult<Type> {
    let position = |at: usize| {
        if Class::Integer.admits(&types[at]) {
            Ok(())
        } else {
            Err(argument_type(name, at + 1, Class::Integer.describe(), &types[at], line))
        }
    };
    let item = |at: usize, single: bool| {
        let ty = &types[at];
        let ok = match receiver.element() {
            Some(element) => element.accepts(ty) || (!single && receiver.accepts(ty)),
            None if receiver.is_scalar(Major::Literal) => {
                if single { Class::Integer.admits(ty) } else { Class::TextOrInteger.admits(ty) }
            },
            None if single => Class::Integer.admits(ty),
            None => Class::TextOrBytes.admits(ty) || Class::Integer.admits(ty),
        };
        if ok {
            Ok(())
        } else {
            Err(argument_type(name, at + 1, format!("an item for {receiver}"), ty, line))
        }
    };

    match name {
        "count" => {
            expect_count(name, types, 0, line)?;
            Ok(Type::integer())
        },
        "at" => {
            expect_count(name, types, 1, line)?;
            position(0)?;
            Ok(receiver.element().unwrap_or_else(Type::integer))
        },
        "insert" | "put" => {
            expect_count(name, types, 2, line)?;
            position(0)?;
            item(1, name == "put")?;
            Ok(receiver.clone())
        },
        "append" => {
            expect_count(name, types, 1, line)?;
            item(0, false)?;
            Ok(receiver.clone())
        },
        "delete" => {
            expect_count(name, types, 1, line)?;
            position(0)?;
            Ok(receiver.clone())
        },
        _ => Err(ParseError::UnknownMethod { name:     name.to_string(),
                                             receiver: receiver.to_string(),
                                             line }),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ParseError,
        interpreter::{
            checker::core::Checker,
            evaluator::core::Context,
            value::types::Type,
        },
        parse_source,
    };

    fn check(source: &str) -> Result<(), ParseError> {
        let ctx = Context::new();
        let program = parse_source(source)?;
        Checker::new(&ctx).check_program(&program)
    }

    fn type_of(source: &str) -> Type {
        let ctx = Context::new();
        let program = parse_source(source).unwrap();
        let mut checker = Checker::new(&ctx);
        let (last, rest) = program.split_last().unwrap();
        checker.check_program(rest).unwrap();
        match last {
            crate::ast::Statement::Expression { expr, .. } => checker.type_of(expr).unwrap(),
            other => panic!("not an expression: {other:?}"),
        }
    }

    #[test]
    fn operator_domains() {
        assert_eq!(type_of("1 + 2.5"), Type::numeric());
        assert_eq!(type_of("\"a\" + 1"), Type::literal());
        assert_eq!(type_of("2 ** 3i"), Type::imaginary());
        assert!(matches!(check("\"a\" * 2"), Err(ParseError::InvalidExpression { .. })));
        assert!(matches!(check("3i % 2"), Err(ParseError::InvalidExpression { .. })));
        assert!(matches!(check("not 1"), Err(ParseError::InvalidExpression { .. })));
    }

    #[test]
    fn null_is_admitted_everywhere() {
        assert_eq!(type_of("null + 1"), Type::integer());
        assert_eq!(type_of("let x = null\nx * 2.0"), Type::numeric());
        assert!(check("abs(null)").is_ok());
    }

    #[test]
    fn builtin_signatures() {
        assert_eq!(type_of("hex(255, 4)"), Type::literal());
        assert_eq!(type_of("tup(1, \"a\")"), Type::row(vec![Type::integer(), Type::literal()]));
        assert!(matches!(check("hex(1, 2, 3)"), Err(ParseError::ArgumentCount { found: 3, .. })));
        assert!(matches!(check("sqrt(\"x\")"),
                         Err(ParseError::ArgumentType { position: 1, .. })));
        assert!(matches!(check("input(\"x\")"), Err(ParseError::NotAssignable { .. })));
        assert!(matches!(check("nope(1)"), Err(ParseError::UnknownFunction { .. })));
    }

    #[test]
    fn member_signatures() {
        assert_eq!(type_of("let a = [1, 2]\na.at(0)"), Type::integer());
        assert_eq!(type_of("\"ab\".insert(0, 'x')"), Type::literal());
        assert_eq!(type_of("let t = tup(1, 2.0)\nt.set@2(3)"),
                   Type::row(vec![Type::integer(), Type::numeric()]));
        assert!(matches!(check("let a = [1]\na.put(0, \"x\")"),
                         Err(ParseError::ArgumentType { .. })));
        assert!(matches!(check("let t = tup(1)\nt.at(0)"), Err(ParseError::UnknownMethod { .. })));
        assert!(matches!(check("true.count()"), Err(ParseError::UnknownMethod { .. })));
        assert!(check("let a = [1]\na.insert(0, [2, 3])").is_ok());
    }

    #[test]
    fn native_types_need_import() {
        assert!(matches!(check("csv()"), Err(ParseError::UnknownFunction { .. })));
        assert!(check("import csv\nlet c = csv(\";\")\nc.deserialize(\"a;b\")").is_ok());
        assert!(matches!(check("import csv\ncsv().nope()"), Err(ParseError::UnknownMethod { .. })));
        assert!(matches!(check("import file\nlet f = file(\"x\", \"r\")\nf.readln(\"y\")"),
                         Err(ParseError::NotAssignable { .. })));
    }

    #[test]
    fn indexing_and_fields() {
        assert_eq!(type_of("[[1], [2]][0]"), Type::integer().array_of());
        assert_eq!(type_of("tup(1, \"a\")@2"), Type::literal());
        assert!(matches!(check("[1][\"a\"]"), Err(ParseError::TypeMismatch { .. })));
        assert!(matches!(check("tup(1)@3"), Err(ParseError::TypeMismatch { .. })));
        assert!(matches!(check("[1, \"a\"]"), Err(ParseError::TypeMismatch { .. })));
    }
}
