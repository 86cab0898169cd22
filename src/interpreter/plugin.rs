/// The native type protocol.
///
/// Defines `NativeType`, the `Interface` metadata a type declares, call
/// arguments, the registry and the helpers plugins use to report errors.
pub mod core;
/// The bundled `csv` type: splitting and joining CSV lines.
pub mod csv;
/// The bundled `file` type: line reading and buffered writing.
pub mod file;
