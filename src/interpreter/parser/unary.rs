use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, LiteralValue, Member, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect, parse_identifier, parse_list, skip_newlines},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `+`  (unary plus)
/// - `~`  (bitwise not)
///
/// Unary operators are right-associative and bind looser than `**`, so
/// `-2 ** 2` is `-(2 ** 2)`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "+" | "~") unary
///            | power
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => UnaryOperator::Negate,
        Some((Token::Plus, _)) => UnaryOperator::Plus,
        Some((Token::Tilde, _)) => UnaryOperator::BitNot,
        _ => return parse_power(tokens),
    };
    let line = tokens.next().map_or(0, |(_, l)| *l);
    let expr = parse_unary(tokens)?;
    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Parses exponentiation.
///
/// `**` is right-associative and its exponent may carry a sign:
/// `2 ** -1` and `2 ** 3 ** 2 == 2 ** 9`.
///
/// Grammar: `power := postfix ("**" unary)?`
fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_primary(tokens)?;
    let base = parse_postfix(tokens, base)?;
    if let Some((Token::StarStar, line)) = tokens.peek() {
        tokens.next();
        skip_newlines(tokens);
        let exponent = parse_unary(tokens)?;
        return Ok(Expr::BinaryOp { left:  Box::new(base),
                                   op:    BinaryOperator::Exp,
                                   right: Box::new(exponent),
                                   line:  *line, });
    }
    Ok(base)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - literals
/// - identifiers
/// - function calls
/// - parenthesized expressions
/// - collection literals (`[ ... ]`)
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | identifier_or_function
///              | "(" expression ")"
///              | "[" elements "]"
/// ```
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = *line;

    let value = match token {
        Token::Null => LiteralValue::Null,
        Token::Bool(b) => LiteralValue::Boolean(*b),
        Token::Integer(n) => LiteralValue::Integer(*n),
        Token::Numeric(x) => LiteralValue::Numeric(*x),
        Token::Imaginary(x) => LiteralValue::Imaginary(*x),
        Token::Str(s) => LiteralValue::Literal(s.clone()),
        Token::LParen => return parse_grouping(tokens, line),
        Token::LBracket => {
            let elements = parse_list(tokens, parse_expression, &Token::RBracket, line)?;
            return Ok(Expr::CollectionLiteral { elements, line });
        },
        Token::Identifier(name) => return parse_identifier_or_function(tokens, name, line),
        tok => {
            return Err(ParseError::UnexpectedToken { token: tok.to_string(),
                                                     line });
        },
    };
    Ok(Expr::Literal { value, line })
}

/// Parses postfix operators applied to an expression.
///
/// Handles:
///
/// 1. **Collection indexing** `expr[index]`
/// 2. **Tuple fields** `expr@N`, with `N` an integer literal counted from 1
/// 3. **Member calls** `expr.method(args)` and `expr.set@N(value)`
///
/// Postfixes chain left to right: `rows[0]@2`, `s.insert(0, 'a').count()`.
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "[" expression "]"
///              | postfix "@" INTEGER
///              | postfix "." IDENT "(" arguments ")"
///              | postfix "." "set" "@" INTEGER "(" arguments ")"
/// ```
///
/// # Errors
/// Returns a `ParseError` if:
/// - an `[` is not properly closed with `]`,
/// - a field position is not a positive integer literal,
/// - a member call has no argument list.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    loop {
        match tokens.peek() {
            Some((Token::LBracket, line)) => {
                let line = *line;
                tokens.next();
                let index = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket, "after index", line)?;
                node = Expr::Index { target: Box::new(node),
                                     index: Box::new(index),
                                     line };
            },
            Some((Token::At, line)) => {
                let line = *line;
                tokens.next();
                let position = parse_field_position(tokens, line)?;
                node = Expr::Field { target: Box::new(node),
                                     position,
                                     line };
            },
            Some((Token::Dot, line)) => {
                let line = *line;
                tokens.next();
                let name = parse_identifier(tokens, line)?;
                let method = if name == "set"
                                && let Some((Token::At, _)) = tokens.peek()
                {
                    tokens.next();
                    Member::SetField(parse_field_position(tokens, line)?)
                } else {
                    Member::Named(name)
                };
                let open = expect(tokens, &Token::LParen, &format!("after '.{method}'"), line)?;
                let arguments = parse_list(tokens, parse_expression, &Token::RParen, open)?;
                node = Expr::MemberCall { receiver: Box::new(node),
                                          method,
                                          arguments,
                                          line };
            },
            _ => break,
        }
    }
    Ok(node)
}

/// Parses the integer literal after `@`.
fn parse_field_position<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Integer(n), l)) => {
            usize::try_from(*n).ok()
                               .filter(|&p| p > 0)
                               .ok_or_else(|| ParseError::InvalidLiteral { details: format!("field position {n}"),
                                                                           line:    *l, })
        },
        Some((tok, l)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected field position after '@', found {tok}"),
                                              line:  *l, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}

/// Parses a parenthesized expression.
///
/// Expected form `( expression )`
///
/// The function parses the enclosed expression, and then requires a closing
/// `)`. Failure to find the closing parenthesis yields
/// `ParseError::ExpectedClosingParen`.
///
/// # Returns
/// The inner expression as-is (no wrapper node).
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    skip_newlines(tokens);
    let expr = parse_expression(tokens)?;
    skip_newlines(tokens);
    match tokens.next() {
        Some((Token::RParen, _)) => Ok(expr),
        _ => Err(ParseError::ExpectedClosingParen { line }),
    }
}

/// Parses a variable reference or a function call.
///
/// Supported forms:
///
/// - identifier
/// - identifier(arg1, arg2, ...)
///
/// A call may name a builtin function or the constructor of an imported
/// native type; which one is decided by the checker.
fn parse_identifier_or_function<'a, I>(tokens: &mut Peekable<I>,
                                       name: &str,
                                       line: usize)
                                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();
        let arguments = parse_list(tokens, parse_expression, &Token::RParen, line)?;
        return Ok(Expr::FunctionCall { name: name.to_string(),
                                       arguments,
                                       line });
    }
    Ok(Expr::Variable { name: name.to_string(),
                        line })
}
