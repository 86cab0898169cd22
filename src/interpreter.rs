/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// corresponding to a literal, identifier, operator, delimiter or keyword.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source lines.
/// - Resolves numeric, imaginary, string and character literals.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// # Responsibilities
/// - Converts tokens into expression and statement nodes.
/// - Validates grammar, reporting errors with line numbers.
/// - Rejects reserved words used as variable names.
pub mod parser;
/// Static checking of a parsed script.
///
/// Walks the statements with a scoped table of static types and rejects
/// ill-typed operators, calls and member calls before anything runs.
pub mod checker;
/// The evaluator module executes AST nodes and computes results.
///
/// # Responsibilities
/// - Evaluates expressions with the operand ownership rules.
/// - Runs builtins, member calls and native object methods.
/// - Executes statements and reports runtime errors.
pub mod evaluator;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum and its types.
/// - Implements conversion between number types and into declared types.
/// - Holds the operator promotion rules.
pub mod value;
/// Native types.
///
/// The protocol foreign types implement to become values, their interface
/// metadata, the registry and the bundled `csv` and `file` types.
pub mod plugin;
