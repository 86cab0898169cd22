use std::iter::Peekable;

use crate::{
    ast::{Expr, Statement},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{binary::parse_logical_or, statement::parse_statement, utils::skip_newlines},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical OR, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_logical_or(tokens)
}

/// Parses a sequence of statements up to the end of input or, when
/// `closing` is given, up to and including that token.
///
/// Statements are separated by line breaks or `;`. A closing brace may follow
/// the last statement on the same line.
///
/// # Errors
/// `UnexpectedToken` when a statement is followed by anything but a
/// separator, and `UnexpectedEndOfInput` when `closing` never appears.
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>,
                               closing: Option<&Token>,
                               line: usize)
                               -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut statements = Vec::new();

    loop {
        while let Some((Token::NewLine | Token::Semicolon, _)) = tokens.peek() {
            tokens.next();
        }

        match (tokens.peek(), closing) {
            (None, None) => break,
            (None, Some(_)) => {
                let last = statements.last().map_or(line, statement_line);
                return Err(ParseError::UnexpectedEndOfInput { line: last });
            },
            (Some((tok, _)), Some(closing)) if tok == closing => {
                tokens.next();
                break;
            },
            _ => {},
        }

        statements.push(parse_statement(tokens)?);

        match tokens.peek() {
            None | Some((Token::NewLine | Token::Semicolon, _)) => {},
            Some((tok, _)) if Some(tok) == closing => {},
            Some((tok, l)) => {
                return Err(ParseError::UnexpectedToken { token: format!("{tok} after statement"),
                                                         line:  *l, });
            },
        }
    }

    Ok(statements)
}

/// Parses a whole script into its top-level statements.
///
/// # Errors
/// Any `ParseError` produced while parsing a statement.
///
/// # Example
/// ```
/// use bloc::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("let x = 1; x += 2\n\nx").unwrap();
/// let program = parse_program(&tokens).unwrap();
/// assert_eq!(program.len(), 3);
/// ```
pub fn parse_program(tokens: &[(Token, usize)]) -> ParseResult<Vec<Statement>> {
    let mut iter = tokens.iter().peekable();
    skip_newlines(&mut iter);
    parse_statements(&mut iter, None, 1)
}

/// The line a statement starts on.
#[must_use]
pub const fn statement_line(statement: &Statement) -> usize {
    match statement {
        Statement::Expression { line, .. }
        | Statement::VariableDeclaration { line, .. }
        | Statement::Assignment { line, .. }
        | Statement::CompoundAssignment { line, .. }
        | Statement::If { line, .. }
        | Statement::While { line, .. }
        | Statement::For { line, .. }
        | Statement::Raise { line, .. }
        | Statement::Try { line, .. }
        | Statement::Import { line, .. } => *line,
    }
}
