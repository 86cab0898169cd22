use logos::Logos;

use crate::{error::ParseError, interpreter::parser::core::ParseResult};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2.0` or `2.1e-10`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_float)]
    Numeric(f64),
    /// Imaginary literal tokens, such as `2i` or `1.5i`, holding the
    /// imaginary component.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?i", parse_imaginary)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?i", parse_imaginary)]
    Imaginary(f64),
    /// Integer literal tokens: decimal `42`, hexadecimal `0xff` or a
    /// character code `'A'`.
    #[regex(r"[0-9]+", parse_integer)]
    #[regex(r"0[xX][0-9a-fA-F]+", parse_hex)]
    #[regex(r"'([^'\\\n]|\\.)'", parse_char)]
    Integer(i64),
    /// String literal tokens with their escapes resolved.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    Str(String),
    /// Boolean literal tokens, such as `true`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// `null`
    #[token("null")]
    Null,
    /// `let`
    #[token("let")]
    Let,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `do`
    #[token("do")]
    Do,
    /// `try`
    #[token("try")]
    Try,
    /// `catch`
    #[token("catch")]
    Catch,
    /// `raise`
    #[token("raise")]
    Raise,
    /// `import`
    #[token("import")]
    Import,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `xor`
    #[token("xor")]
    Xor,
    /// `not`
    #[token("not")]
    Not,
    /// Identifier tokens; variable, function or method names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip)]
    Comment,
    /// ```
    /// // Multi line comments.
    /// ```
    #[regex(r"/\*([^*]|\*[^/])*\*/", |lex| {
        let comment      = lex.slice();
        let newlines     = comment.chars().filter(|&c| c == '\n').count();
        lex.extras.line += newlines;
        logos::Skip
    })]
    MultiLineComment,
    /// `..=`
    #[token("..=")]
    DotDotEq,
    /// `..`
    #[token("..")]
    DotDot,
    /// `.`
    #[token(".")]
    Dot,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `%=`
    #[token("%=")]
    ModAssign,
    /// `@`
    #[token("@")]
    At,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `**`
    #[token("**")]
    StarStar,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `=`
    #[token("=")]
    Equals,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `~=`
    #[token("~=")]
    TildeEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `;`, an explicit statement separator.
    #[token(";")]
    Semicolon,

    /// End of a line.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Token::NewLine
    })]
    NewLine,
    /// Blanks, tabs, feeds and carriage returns.
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Ignored,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Numeric(x) => return write!(f, "{x}"),
            Self::Imaginary(x) => return write!(f, "{x}i"),
            Self::Integer(n) => return write!(f, "{n}"),
            Self::Str(s) => return write!(f, "{s:?}"),
            Self::Bool(b) => return write!(f, "{b}"),
            Self::Identifier(name) => name.as_str(),
            Self::Null => "null",
            Self::Let => "let",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Do => "do",
            Self::Try => "try",
            Self::Catch => "catch",
            Self::Raise => "raise",
            Self::Import => "import",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
            Self::Comment | Self::MultiLineComment => "comment",
            Self::DotDotEq => "..=",
            Self::DotDot => "..",
            Self::Dot => ".",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::At => "@",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::StarStar => "**",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Equals => "=",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::TildeEqual => "~=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Semicolon => ";",
            Self::NewLine => "end of line",
            Self::Ignored => "blank",
        };
        f.write_str(text)
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
/// Automatically resets or increments as newlines are processed.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Splits a whole script into tokens paired with their line numbers.
///
/// # Errors
/// `UnexpectedToken` for text that is not a token, including malformed
/// escapes and integer literals that do not fit in 64 bits.
///
/// # Example
/// ```
/// use bloc::interpreter::lexer::{tokenize, Token};
///
/// let tokens = tokenize("let c = 'A'\nc ** 2i").unwrap();
/// assert_eq!(tokens[3], (Token::Integer(65), 1));
/// assert_eq!(tokens[7], (Token::Imaginary(2.0), 2));
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        if let Ok(tok) = token {
            let line = if tok == Token::NewLine { lexer.extras.line - 1 } else { lexer.extras.line };
            tokens.push((tok, line));
        } else {
            return Err(ParseError::UnexpectedToken { token: lexer.slice().to_string(),
                                                     line:  lexer.extras.line, });
        }
    }
    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses the imaginary component of an imaginary literal such as `2.5i`.
fn parse_imaginary(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().strip_suffix('i')?.parse().ok()
}

/// Parses an integer literal from the current token slice.
///
/// # Returns
/// - `Some(i64)`: The parsed integer value if successful.
/// - `None`: If the literal does not fit in 64 bits.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Parses a hexadecimal literal such as `0xff`.
fn parse_hex(lex: &logos::Lexer<Token>) -> Option<i64> {
    i64::from_str_radix(&lex.slice()[2..], 16).ok()
}

/// Parses a character literal into its code point.
fn parse_char(lex: &logos::Lexer<Token>) -> Option<i64> {
    let slice = lex.slice();
    let inner = unescape(&slice[1..slice.len() - 1])?;
    let mut chars = inner.chars();
    let c = chars.next()?;
    chars.next().is_none().then(|| i64::from(u32::from(c)))
}

/// Parses a string literal, resolving its escapes.
fn parse_string(lex: &logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

/// Parses a boolean literal from the current token slice (`true` or `false`).
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Resolves `\n \t \r \0 \\ \" \'` escapes. Any other escape is rejected.
fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
                     'n' => '\n',
                     't' => '\t',
                     'r' => '\r',
                     '0' => '\0',
                     '\\' => '\\',
                     '"' => '"',
                     '\'' => '\'',
                     _ => return None,
                 });
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_skipped() {
        let tokens = tokenize("x // note ** 2\ny /* one\ntwo */ z").unwrap();
        assert_eq!(tokens,
                   vec![(Token::Identifier("x".to_string()), 1),
                        (Token::NewLine, 1),
                        (Token::Identifier("y".to_string()), 2),
                        (Token::Identifier("z".to_string()), 3),]);
        assert_eq!(tokenize("// only a comment").unwrap(), vec![]);
    }

    #[test]
    fn integer_overflow_is_rejected() {
        assert_eq!(tokenize("9223372036854775807").unwrap(), vec![(Token::Integer(i64::MAX), 1)]);
        assert!(matches!(tokenize("9223372036854775808"), Err(ParseError::UnexpectedToken { .. })));
    }
}
