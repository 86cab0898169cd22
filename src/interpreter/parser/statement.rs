use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, ForSource, Handler, Statement},
    error::ParseError,
    interpreter::{
        evaluator::function::core::is_reserved_identifier,
        lexer::Token,
        parser::{
            block::parse_do_block,
            core::{ParseResult, parse_expression},
            utils::{continues_with, expect, parse_identifier},
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a variable declaration (`let`),
/// - an assignment or compound assignment,
/// - a compound statement (`if`, `while`, `for`, `try`),
/// - `raise` or `import`,
/// - an expression used as a statement.
///
/// The statement's source line is taken from its first token.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, line)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = tokens.peek().map_or(0, |(_, l)| *l);

    match tokens.peek() {
        Some((Token::Let, _)) => return parse_variable_declaration(tokens, line),
        Some((Token::If, _)) => return parse_if(tokens, line),
        Some((Token::While, _)) => return parse_while(tokens, line),
        Some((Token::For, _)) => return parse_for(tokens, line),
        Some((Token::Try, _)) => return parse_try(tokens, line),
        Some((Token::Raise, _)) => {
            tokens.next();
            let name = parse_identifier(tokens, line)?;
            return Ok(Statement::Raise { name, line });
        },
        Some((Token::Import, _)) => {
            tokens.next();
            let name = parse_identifier(tokens, line)?;
            return Ok(Statement::Import { name, line });
        },
        _ => {},
    }

    if let Some(statement) = parse_assignment(tokens)? {
        return Ok(statement);
    }

    let expr = parse_expression(tokens)?;
    Ok(Statement::Expression { expr, line })
}

/// Parses a variable declaration statement.
///
/// A declaration has the form `let <identifier> = <expression>`.
///
/// The identifier must not be a reserved name.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the identifier is reserved,
/// - `=` is missing,
/// - the expression is malformed,
/// - input ends unexpectedly.
fn parse_variable_declaration<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();

    let name = parse_identifier(tokens, line)?;
    if is_reserved_identifier(&name) {
        return Err(ParseError::IdentifierReserved { name, line });
    }

    expect(tokens, &Token::Equals, "after variable name", line)?;

    let value = parse_expression(tokens)?;
    Ok(Statement::VariableDeclaration { name, value, line })
}

/// Parses an assignment or compound-assignment statement.
///
/// Supported forms:
///
/// - `<identifier> = <expression>`
/// - `<identifier> += <expression>` (also `-=`, `*=`, `/=`, `%=`)
///
/// The function performs a limited lookahead:
/// if the next token is an identifier and the following token is `=` or one of
/// the compound-assignment operators, an assignment is parsed.
///
/// If no assignment pattern matches, the function returns `Ok(None)` and does
/// not consume tokens.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    let Some((Token::Identifier(name), _)) = lookahead.next() else {
        return Ok(None);
    };
    let Some((operator, line)) = lookahead.next() else {
        return Ok(None);
    };
    let line = *line;

    let op = match operator {
        Token::Equals => None,
        Token::PlusAssign => Some(BinaryOperator::Add),
        Token::MinusAssign => Some(BinaryOperator::Sub),
        Token::MulAssign => Some(BinaryOperator::Mul),
        Token::DivAssign => Some(BinaryOperator::Div),
        Token::ModAssign => Some(BinaryOperator::Mod),
        _ => return Ok(None),
    };

    if is_reserved_identifier(name) {
        return Err(ParseError::IdentifierReserved { name: name.clone(),
                                                    line });
    }
    tokens.next();
    tokens.next();

    let value = parse_expression(tokens)?;
    let name = name.clone();
    Ok(Some(match op {
                None => Statement::Assignment { name, value, line },
                Some(op) => Statement::CompoundAssignment { name,
                                                            op,
                                                            value,
                                                            line },
            }))
}

/// Parses an `if` statement with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if <condition> do { ... }
///     else if <condition> do { ... }
///     else do { ... }
/// ```
/// `else` may start a new line.
///
/// # Errors
/// - `UnexpectedToken` if the expected `do`, `if`, or `else` keywords are
///   missing.
/// - Propagates any errors from sub-expression parsing.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let mut branches = Vec::new();
    let mut otherwise = None;

    let condition = parse_expression(tokens)?;
    branches.push((condition, parse_do_block(tokens, line)?));

    while continues_with(tokens, &Token::Else) {
        tokens.next();
        if let Some((Token::If, _)) = tokens.peek() {
            tokens.next();
            let condition = parse_expression(tokens)?;
            branches.push((condition, parse_do_block(tokens, line)?));
        } else {
            otherwise = Some(parse_do_block(tokens, line)?);
            break;
        }
    }

    Ok(Statement::If { branches,
                       otherwise,
                       line })
}

/// Parses `while <condition> do { ... }`.
fn parse_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let condition = parse_expression(tokens)?;
    let body = parse_do_block(tokens, line)?;
    Ok(Statement::While { condition,
                          body,
                          line })
}

/// Parses a `for` statement.
///
/// Supported forms:
///
/// - for x in start .. end     do { ... }
/// - for x in start ..= end    do { ... }
/// - for x in collection       do { ... }
///
/// The loop variable must not be reserved.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the loop variable is missing or reserved,
/// - `in` is missing,
/// - the `do` keyword is missing,
/// - the body or expressions fail to parse.
fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();

    let var = parse_identifier(tokens, line)?;
    if is_reserved_identifier(&var) {
        return Err(ParseError::IdentifierReserved { name: var, line });
    }

    expect(tokens, &Token::In, "after loop variable", line)?;

    let start = parse_expression(tokens)?;
    let source = match tokens.peek() {
        Some((Token::DotDot, _)) => {
            tokens.next();
            ForSource::Range { start,
                               end: parse_expression(tokens)?,
                               inclusive: false }
        },
        Some((Token::DotDotEq, _)) => {
            tokens.next();
            ForSource::Range { start,
                               end: parse_expression(tokens)?,
                               inclusive: true }
        },
        _ => ForSource::Collection(start),
    };

    let body = parse_do_block(tokens, line)?;

    Ok(Statement::For { var,
                        source,
                        body,
                        line })
}

/// Parses `try do { ... } catch <name> do { ... } ...`.
///
/// At least one `catch` clause is required; `catch others` matches every
/// catchable error.
fn parse_try<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let body = parse_do_block(tokens, line)?;

    let mut handlers = Vec::new();
    while continues_with(tokens, &Token::Catch) {
        let handler_line = tokens.next().map_or(line, |(_, l)| *l);
        let name = parse_identifier(tokens, handler_line)?;
        let body = parse_do_block(tokens, handler_line)?;
        handlers.push(Handler { name,
                                body,
                                line: handler_line });
    }

    if handlers.is_empty() {
        let found = tokens.peek().map_or_else(|| "end of input".to_string(), |(t, _)| t.to_string());
        return Err(ParseError::UnexpectedToken { token: format!("expected 'catch' after try block, found {found}"),
                                                 line });
    }

    Ok(Statement::Try { body,
                        handlers,
                        line })
}
