//! # bloc
//!
//! bloc is a small dynamically-typed scripting language written in Rust.
//! Scripts are lexed, parsed, statically checked and then run by a
//! tree-walking evaluator over strings, byte arrays, numbers, imaginary
//! numbers, tuples, collections and objects provided by native types.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Statement,
    error::{ParseError, ScriptError},
    interpreter::{
        checker::core::Checker,
        evaluator::core::Context,
        lexer::tokenize,
        parser::core::parse_program,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of a script as a tree. The AST is
/// built by the parser, checked by the checker and walked by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
pub mod ast;
/// Settings of an evaluation context.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// checking or evaluating a script, with the source line and, for runtime
/// errors, the numeric code and exception name used by `catch`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, static checking, evaluation,
/// value representations and native types.
///
/// # Responsibilities
/// - Coordinates the lexer, parser, checker and evaluator.
/// - Defines the runtime values and their types.
/// - Hosts the native type protocol and the bundled native types.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// # Responsibilities
/// - Convert between `i64`, `usize` and `f64` without silent data loss.
/// - Turn script integers into positions, counts and bytes.
pub mod util;

/// Lexes and parses a script into its top-level statements.
///
/// # Errors
/// The first lexical or grammatical error.
///
/// # Example
/// ```
/// use bloc::parse_source;
///
/// assert_eq!(parse_source("let x = 1\nx + 1").unwrap().len(), 2);
/// assert!(parse_source("let = 1").is_err());
/// ```
pub fn parse_source(source: &str) -> Result<Vec<Statement>, ParseError> {
    let tokens = tokenize(source)?;
    parse_program(&tokens)
}

/// Parses, checks and runs a script against a context.
///
/// Nothing runs when parsing or checking fails. Variables and imports the
/// script declares at the top level stay in `ctx` for later runs.
///
/// # Returns
/// The value of the last top-level expression statement, if any.
///
/// # Errors
/// `ScriptError::Parse` for lexical, grammatical and static type errors and
/// `ScriptError::Runtime` for errors raised while running.
///
/// # Example
/// ```
/// use bloc::{error::ScriptError, interpreter::{evaluator::core::Context, value::core::Value}, run};
///
/// let mut ctx = Context::new();
/// assert_eq!(run("let s = \"ab\"\ns.insert(1, 'x')\ns", &mut ctx).unwrap(),
///            Some(Value::from("axb")));
///
/// assert!(matches!(run("1 / 0", &mut ctx), Err(ScriptError::Runtime(_))));
/// assert!(matches!(run("s * 2", &mut ctx), Err(ScriptError::Parse(_))));
/// ```
pub fn run(source: &str, ctx: &mut Context) -> Result<Option<Value>, ScriptError> {
    let program = parse_source(source)?;
    Checker::new(ctx).check_program(&program)?;
    Ok(ctx.exec_program(&program)?)
}
