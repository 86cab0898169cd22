use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Parses the elements of a bracketed list, up to and including `closing`.
///
/// Used for collection literals and call arguments. `[]` and `()` give an
/// empty list, a trailing comma is rejected and line breaks may appear
/// between elements.
///
/// # Parameters
/// - `tokens`: positioned just after the opening bracket.
/// - `element`: parser for one element.
/// - `closing`: `]` or `)`.
/// - `line`: line reported when the input ends inside the list.
///
/// # Errors
/// The element parser's error, `UnexpectedToken` when an element is not
/// followed by `,` or `closing` and `UnexpectedEndOfInput` for an
/// unterminated list.
pub(in crate::interpreter::parser) fn parse_list<'a, I, T>(tokens: &mut Peekable<I>,
                                                           element: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
                                                           closing: &Token,
                                                           line: usize)
                                                           -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut elements = Vec::new();
    skip_newlines(tokens);
    if tokens.next_if(|(tok, _)| tok == closing).is_some() {
        return Ok(elements);
    }
    loop {
        skip_newlines(tokens);
        elements.push(element(tokens)?);
        skip_newlines(tokens);
        let Some((tok, at)) = tokens.next() else {
            return Err(ParseError::UnexpectedEndOfInput { line });
        };
        if tok == closing {
            return Ok(elements);
        }
        if *tok != Token::Comma {
            return Err(ParseError::UnexpectedToken { token: format!("expected ',' or '{closing}', found {tok}"),
                                                     line:  *at, });
        }
    }
}

/// Takes the next token as a name.
///
/// Reserved names are the caller's concern.
///
/// # Errors
/// `UnexpectedToken` for anything but an identifier and
/// `UnexpectedEndOfInput` at the end of the input.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              line: usize)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) => Ok(name.clone()),
        Some((tok, at)) => Err(ParseError::UnexpectedToken { token: format!("expected a name, found {tok}"),
                                                            line:  *at, }),
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}

/// Consumes `expected` or fails with a message naming `context`.
///
/// # Returns
/// The line of the consumed token.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    context: &str,
                                                    line: usize)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, l)) if tok == expected => Ok(*l),
        Some((tok, l)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected '{expected}' {context}, found {tok}"),
                                              line:  *l, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}

/// Skips any run of line breaks.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, usize)>
{
    while tokens.next_if(|(tok, _)| *tok == Token::NewLine).is_some() {}
}

/// Skips line breaks only when `keyword` follows them, so that `else` and
/// `catch` may start a new line.
///
/// # Returns
/// `true` when `keyword` is next.
pub(in crate::interpreter::parser) fn continues_with<'a, I>(tokens: &mut Peekable<I>,
                                                            keyword: &Token)
                                                            -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    skip_newlines(&mut lookahead);
    if let Some((tok, _)) = lookahead.peek()
       && tok == keyword
    {
        skip_newlines(tokens);
        return true;
    }
    false
}
