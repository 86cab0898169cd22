use std::iter::Peekable;

use crate::{
    ast::Statement,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_statements},
            utils::expect,
        },
    },
};

/// Parses a block delimited by braces.
///
/// A block consists of zero or more statements separated by newlines or
/// semicolons. Parsing continues until the matching `}` token is consumed.
/// Leading and trailing newlines inside the block are ignored.
///
/// Grammar: `block := "{" statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening brace.
/// - `line`: Line number of the opening brace.
///
/// # Returns
/// The statements of the block.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_statements(tokens, Some(&Token::RBrace), line)
}

/// Parses a `do { ... }` body.
///
/// Every compound statement introduces its body this way:
///
/// ```text
///     while i < 10 do { i += 1 }
/// ```
///
/// # Errors
/// Returns a `ParseError` if:
/// - `do` is missing,
/// - `{` does not follow `do`,
/// - the block is malformed or ends unexpectedly.
pub fn parse_do_block<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let do_line = expect(tokens, &Token::Do, "before block", line)?;
    let brace_line = expect(tokens, &Token::LBrace, "after 'do'", do_line)?;
    parse_block(tokens, brace_line)
}
