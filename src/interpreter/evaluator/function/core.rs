use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{convert, encoding, input, math, print, string},
        },
        plugin::core::Argument,
        value::{
            core::Value,
            object::Complex,
            promotion::promote_numbers,
            types::{Major, Type},
        },
    },
};

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin takes `n` or more arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// Any of these counts.
    OneOf(&'static [usize]),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(counts) => counts.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }
}

/// The set of types an argument position accepts.
///
/// The untyped `null` is admitted everywhere; what a builtin does with a null
/// is decided by its [`Nulls`] policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Any value.
    Any,
    /// `integer` or `numeric`.
    Number,
    /// `integer`, `numeric` or `imaginary`.
    NumberOrImaginary,
    /// A number or a `literal`.
    NumberOrText,
    /// `integer`.
    Integer,
    /// `literal`.
    Text,
    /// `literal` or `tabchar`.
    TextOrBytes,
    /// `literal` or `integer`.
    TextOrInteger,
    /// `boolean`.
    Boolean,
    /// A `literal` variable the builtin stores into.
    Variable,
}

impl Class {
    /// Whether a value of static type `ty` may be passed.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::{evaluator::function::core::Class, value::types::Type};
    ///
    /// assert!(Class::Number.admits(&Type::integer()));
    /// assert!(Class::Number.admits(&Type::opaque()));
    /// assert!(!Class::Number.admits(&Type::imaginary()));
    /// assert!(Class::TextOrBytes.admits(&Type::tabchar()));
    /// ```
    #[must_use]
    pub fn admits(self, ty: &Type) -> bool {
        if ty.is_opaque() {
            return true;
        }
        let scalar = |major| ty.is_scalar(major);
        match self {
            Self::Any => true,
            Self::Number => scalar(Major::Integer) || scalar(Major::Numeric),
            Self::NumberOrImaginary => ty.is_number(),
            Self::NumberOrText => {
                scalar(Major::Integer) || scalar(Major::Numeric) || scalar(Major::Literal)
            },
            Self::Integer => scalar(Major::Integer),
            Self::Text | Self::Variable => scalar(Major::Literal),
            Self::TextOrBytes => scalar(Major::Literal) || scalar(Major::TabChar),
            Self::TextOrInteger => scalar(Major::Literal) || scalar(Major::Integer),
            Self::Boolean => scalar(Major::Boolean),
        }
    }

    /// Human readable description used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Any => "any value",
            Self::Number => "a number",
            Self::NumberOrImaginary => "a number or an imaginary",
            Self::NumberOrText => "a number or a literal",
            Self::Integer => "an integer",
            Self::Text => "a literal",
            Self::TextOrBytes => "a literal or a tabchar",
            Self::TextOrInteger => "a literal or an integer",
            Self::Boolean => "a boolean",
            Self::Variable => "a literal variable",
        }
    }
}

/// What a builtin does when an argument is null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nulls {
    /// The call yields a null of the result type without running.
    Propagate,
    /// The handler receives nulls as they are.
    Accept,
}

/// Type alias for pure builtin handlers.
///
/// A pure builtin receives a slice of evaluated argument values and the line
/// number.
pub type PureFn = fn(&[Value], usize) -> EvalResult<Value>;

/// Type alias for builtins that need the context, such as `random` and
/// `input`.
pub type StatefulFn = fn(&mut Context, &[Argument], usize) -> EvalResult<Value>;

/// How a builtin is run.
#[derive(Clone, Copy)]
pub enum Handler {
    /// Only reads its arguments.
    Pure(PureFn),
    /// Uses the context and sees where its arguments came from.
    Stateful(StatefulFn),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity rule,
/// - the argument classes, the last one repeating for extra arguments,
/// - the result type as a function of the argument types,
/// - a null policy,
/// - the handler implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                args: $args:expr,
                ret: $ret:expr,
                nulls: $nulls:expr,
                handler: $handler:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[Builtin] = &[
            $(
                Builtin { name: $name, arity: $arity, args: $args, ret: $ret, nulls: $nulls, handler: $handler },
            )*
        ];
        /// Names of every builtin function.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

/// Static description of one builtin function.
pub struct Builtin {
    /// Name the function is called by.
    pub name:    &'static str,
    /// Accepted argument counts.
    pub arity:   Arity,
    /// Argument classes; the last one applies to every further argument.
    pub args:    &'static [Class],
    /// Result type computed from the argument types.
    pub ret:     fn(&[Type]) -> Type,
    /// Null policy.
    pub nulls:   Nulls,
    /// Implementation.
    pub handler: Handler,
}

impl Builtin {
    /// Class of argument number `index`, counted from 0.
    #[must_use]
    pub fn class(&self, index: usize) -> Class {
        self.args
            .get(index)
            .or_else(|| self.args.last())
            .copied()
            .unwrap_or(Class::Any)
    }
}

use Class::{
    Any, Boolean, Integer, Number, NumberOrImaginary, NumberOrText, Text, TextOrBytes,
    TextOrInteger, Variable,
};
use Handler::{Pure, Stateful};
use Nulls::{Accept, Propagate};

builtin_functions! {
    "abs"     => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::magnitude, nulls: Propagate, handler: Pure(math::abs) },
    "min"     => { arity: Arity::AtLeast(2), args: &[NumberOrText], ret: ret::extremum, nulls: Propagate, handler: Pure(math::min) },
    "max"     => { arity: Arity::AtLeast(2), args: &[NumberOrText], ret: ret::extremum, nulls: Propagate, handler: Pure(math::max) },
    "clamp"   => { arity: Arity::Exact(3), args: &[Number], ret: ret::promoted, nulls: Propagate, handler: Pure(math::clamp) },
    "round"   => { arity: Arity::OneOf(&[1, 2]), args: &[NumberOrImaginary, Integer], ret: ret::rounded, nulls: Propagate, handler: Pure(math::round) },
    "floor"   => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::floor) },
    "ceil"    => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::ceil) },
    "sqrt"    => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::sqrt) },
    "exp"     => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::exp) },
    "log"     => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::log) },
    "log10"   => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::log10) },
    "sin"     => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::sin) },
    "cos"     => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::cos) },
    "tan"     => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::tan) },
    "sinh"    => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::sinh) },
    "cosh"    => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::cosh) },
    "tanh"    => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::real_or_imaginary, nulls: Propagate, handler: Pure(math::tanh) },
    "asin"    => { arity: Arity::Exact(1), args: &[Number], ret: ret::numeric, nulls: Propagate, handler: Pure(math::asin) },
    "acos"    => { arity: Arity::Exact(1), args: &[Number], ret: ret::numeric, nulls: Propagate, handler: Pure(math::acos) },
    "atan"    => { arity: Arity::Exact(1), args: &[Number], ret: ret::numeric, nulls: Propagate, handler: Pure(math::atan) },
    "pow"     => { arity: Arity::Exact(2), args: &[NumberOrImaginary], ret: ret::promoted, nulls: Propagate, handler: Pure(math::pow) },
    "random"  => { arity: Arity::OneOf(&[0, 1]), args: &[Integer], ret: ret::random, nulls: Propagate, handler: Stateful(math::random) },
    "imag"    => { arity: Arity::Exact(2), args: &[Number], ret: ret::imaginary, nulls: Propagate, handler: Pure(math::imag) },
    "re"      => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::numeric, nulls: Propagate, handler: Pure(math::re) },
    "im"      => { arity: Arity::Exact(1), args: &[NumberOrImaginary], ret: ret::numeric, nulls: Propagate, handler: Pure(math::im) },
    "hex"     => { arity: Arity::OneOf(&[1, 2]), args: &[Integer], ret: ret::literal, nulls: Propagate, handler: Pure(encoding::hex) },
    "hash"    => { arity: Arity::OneOf(&[1, 2]), args: &[TextOrBytes, Integer], ret: ret::integer, nulls: Propagate, handler: Pure(encoding::hash) },
    "b64enc"  => { arity: Arity::Exact(1), args: &[TextOrBytes], ret: ret::literal, nulls: Propagate, handler: Pure(encoding::b64enc) },
    "b64dec"  => { arity: Arity::Exact(1), args: &[Text], ret: ret::tabchar, nulls: Propagate, handler: Pure(encoding::b64dec) },
    "bytes"   => { arity: Arity::Exact(1), args: &[TextOrInteger], ret: ret::tabchar, nulls: Propagate, handler: Pure(encoding::bytes) },
    "trim"    => { arity: Arity::Exact(1), args: &[Text], ret: ret::literal, nulls: Propagate, handler: Pure(string::trim) },
    "ltrim"   => { arity: Arity::Exact(1), args: &[Text], ret: ret::literal, nulls: Propagate, handler: Pure(string::ltrim) },
    "rtrim"   => { arity: Arity::Exact(1), args: &[Text], ret: ret::literal, nulls: Propagate, handler: Pure(string::rtrim) },
    "upper"   => { arity: Arity::Exact(1), args: &[Text], ret: ret::literal, nulls: Propagate, handler: Pure(string::upper) },
    "lower"   => { arity: Arity::Exact(1), args: &[Text], ret: ret::literal, nulls: Propagate, handler: Pure(string::lower) },
    "substr"  => { arity: Arity::OneOf(&[2, 3]), args: &[Text, Integer], ret: ret::literal, nulls: Propagate, handler: Pure(string::substr) },
    "rsubstr" => { arity: Arity::Exact(2), args: &[Text, Integer], ret: ret::literal, nulls: Propagate, handler: Pure(string::rsubstr) },
    "chr"     => { arity: Arity::Exact(1), args: &[Integer], ret: ret::literal, nulls: Propagate, handler: Pure(string::chr) },
    "bool"    => { arity: Arity::Exact(1), args: &[Any], ret: ret::boolean, nulls: Propagate, handler: Pure(convert::to_bool) },
    "num"     => { arity: Arity::Exact(1), args: &[Any], ret: ret::numeric, nulls: Propagate, handler: Pure(convert::to_num) },
    "int"     => { arity: Arity::Exact(1), args: &[Any], ret: ret::integer, nulls: Propagate, handler: Pure(convert::to_int) },
    "str"     => { arity: Arity::Exact(1), args: &[Any], ret: ret::literal, nulls: Propagate, handler: Pure(convert::to_str) },
    "isnull"  => { arity: Arity::Exact(1), args: &[Any], ret: ret::boolean, nulls: Accept, handler: Pure(convert::isnull) },
    "typeof"  => { arity: Arity::Exact(1), args: &[Any], ret: ret::literal, nulls: Accept, handler: Pure(convert::type_name) },
    "tup"     => { arity: Arity::AtLeast(1), args: &[Any], ret: ret::tuple, nulls: Accept, handler: Pure(convert::tup) },
    "tab"     => { arity: Arity::Exact(2), args: &[Integer, Any], ret: ret::table, nulls: Accept, handler: Pure(convert::tab) },
    "input"   => { arity: Arity::Exact(1), args: &[Variable], ret: ret::boolean, nulls: Accept, handler: Stateful(input::input) },
    "print"   => { arity: Arity::Exact(1), args: &[Any], ret: ret::first, nulls: Accept, handler: Pure(print::print) },
    "assert"  => { arity: Arity::Exact(1), args: &[Boolean], ret: ret::boolean, nulls: Accept, handler: Pure(print::assert) },
}

/// Result type rules shared by the table.
pub mod ret {
    use super::{Major, Type, promote_numbers};

    fn first_or_opaque(args: &[Type]) -> Type {
        args.first().cloned().unwrap_or_else(Type::opaque)
    }

    pub fn boolean(_: &[Type]) -> Type {
        Type::boolean()
    }

    pub fn integer(_: &[Type]) -> Type {
        Type::integer()
    }

    pub fn numeric(_: &[Type]) -> Type {
        Type::numeric()
    }

    pub fn imaginary(_: &[Type]) -> Type {
        Type::imaginary()
    }

    pub fn literal(_: &[Type]) -> Type {
        Type::literal()
    }

    pub fn tabchar(_: &[Type]) -> Type {
        Type::tabchar()
    }

    pub fn first(args: &[Type]) -> Type {
        first_or_opaque(args)
    }

    /// Common number type of all arguments.
    pub fn promoted(args: &[Type]) -> Type {
        args.iter()
            .try_fold(Type::opaque(), |acc, ty| promote_numbers(&acc, ty))
            .unwrap_or_else(Type::numeric)
    }

    /// `abs`: numbers keep their type, imaginaries give their magnitude.
    pub fn magnitude(args: &[Type]) -> Type {
        let ty = first_or_opaque(args);
        if ty.is_scalar(Major::Imaginary) { Type::numeric() } else { ty }
    }

    /// `min`/`max`: literal for strings, otherwise the promoted number type.
    pub fn extremum(args: &[Type]) -> Type {
        if args.iter().any(|ty| ty.is_scalar(Major::Literal)) {
            return Type::literal();
        }
        promoted(args)
    }

    /// `round`: integers stay integers, imaginaries stay imaginaries.
    pub fn rounded(args: &[Type]) -> Type {
        let ty = first_or_opaque(args);
        if ty.is_scalar(Major::Integer) || ty.is_scalar(Major::Imaginary) { ty } else { Type::numeric() }
    }

    /// Numeric, or imaginary for an imaginary argument.
    pub fn real_or_imaginary(args: &[Type]) -> Type {
        if first_or_opaque(args).is_scalar(Major::Imaginary) {
            Type::imaginary()
        } else {
            Type::numeric()
        }
    }

    /// `random()` is numeric, `random(max)` is integer.
    pub fn random(args: &[Type]) -> Type {
        if args.is_empty() { Type::numeric() } else { Type::integer() }
    }

    pub fn tuple(args: &[Type]) -> Type {
        Type::row(args.to_vec())
    }

    /// `tab(n, init)` is a collection of `init`'s type.
    pub fn table(args: &[Type]) -> Type {
        args.get(1).cloned().unwrap_or_else(Type::opaque).array_of()
    }
}

/// Looks up a builtin by name.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::function::core::find_builtin;
///
/// let hex = find_builtin("hex").unwrap();
/// assert!(hex.arity.check(2));
/// assert!(!hex.arity.check(3));
/// assert!(find_builtin("nope").is_none());
/// ```
#[must_use]
pub fn find_builtin(name: &str) -> Option<&'static Builtin> {
    BUILTIN_TABLE.iter().find(|b| b.name == name)
}

/// Words that cannot name a variable.
pub const KEYWORDS: &[&str] = &[
    "let", "if", "else", "while", "for", "in", "do", "try", "catch", "raise", "import", "and", "or",
    "xor", "not", "true", "false", "null",
];

/// Whether `name` is a keyword or a builtin function name.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::function::core::is_reserved_identifier;
///
/// assert!(is_reserved_identifier("print"));
/// assert!(is_reserved_identifier("while"));
/// assert!(!is_reserved_identifier("total"));
/// ```
#[must_use]
pub fn is_reserved_identifier(name: &str) -> bool {
    KEYWORDS.contains(&name) || BUILTIN_FUNCTIONS.contains(&name)
}

/// Checks an argument's runtime type against its class.
fn check_class(builtin: &Builtin, index: usize, value: &Value, line: usize) -> EvalResult<()> {
    let class = builtin.class(index);
    let ty = value.value_type();
    if class.admits(&ty) {
        return Ok(());
    }
    Err(RuntimeError::TypeMismatch { details: format!("argument {} of '{}' must be {}, found {ty}",
                                                      index + 1,
                                                      builtin.name,
                                                      class.describe()),
                                     line })
}

impl Context {
    /// Evaluates a function call.
    ///
    /// A name that matches an imported native type builds an object with the
    /// constructor taking that many arguments. Otherwise the name must be a
    /// builtin: arity and argument types are checked, nulls are propagated
    /// according to the builtin's policy and the builtin runs.
    ///
    /// # Parameters
    /// - `name`: Function or native type name.
    /// - `arguments`: Unevaluated argument expressions.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The function result or an error if lookup, arity or types fail.
    pub(crate) fn eval_call(&mut self, name: &str, arguments: &[Expr], line: usize) -> EvalResult<Value> {
        if let Some(native) = self.native(name) {
            let args = arguments.iter()
                                .map(|a| self.eval(a))
                                .collect::<EvalResult<Vec<_>>>()?;
            let ctor = native.interface()
                             .find_constructor(args.len())
                             .ok_or_else(|| RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                                                  line })?;
            let instance = native.construct(ctor, self, &args, line)?;
            return Ok(Value::Complex(Complex::new(native, instance)));
        }

        let builtin = find_builtin(name).ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                                       line })?;
        if !builtin.arity.check(arguments.len()) {
            return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                             line });
        }

        let args = self.arguments(arguments)?;
        for (i, arg) in args.iter().enumerate() {
            check_class(builtin, i, &arg.value, line)?;
        }

        if builtin.nulls == Nulls::Propagate && args.iter().any(|a| a.value.is_null()) {
            let types = args.iter().map(|a| a.value.value_type()).collect::<Vec<_>>();
            return Ok(Value::Null((builtin.ret)(&types)));
        }

        match builtin.handler {
            Handler::Pure(f) => {
                let values = args.into_iter().map(|a| a.value).collect::<Vec<_>>();
                f(&values, line)
            },
            Handler::Stateful(f) => f(self, &args, line),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let unique = BUILTIN_FUNCTIONS.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), BUILTIN_FUNCTIONS.len());
    }

    #[test]
    fn every_builtin_declares_classes() {
        assert!(BUILTIN_TABLE.iter().all(|b| !b.args.is_empty()));
    }

    #[test]
    fn last_class_repeats() {
        let min = find_builtin("min").unwrap();
        assert_eq!(min.class(5), Class::NumberOrText);
        let hash = find_builtin("hash").unwrap();
        assert_eq!(hash.class(1), Class::Integer);
    }

    #[test]
    fn result_types() {
        assert_eq!(ret::extremum(&[Type::integer(), Type::numeric()]), Type::numeric());
        assert_eq!(ret::extremum(&[Type::literal(), Type::literal()]), Type::literal());
        assert_eq!(ret::magnitude(&[Type::imaginary()]), Type::numeric());
        assert_eq!(ret::table(&[Type::integer(), Type::literal()]), Type::literal().array_of());
    }
}
