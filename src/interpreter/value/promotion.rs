//! Operator type rules.
//!
//! These functions decide the result type of every operator from the types of
//! its operands. The static checker uses them to reject ill-typed expressions
//! before a script runs, and the evaluator uses the same rules to pick the
//! type of null results, so both phases always agree.

use crate::{
    ast::{BinaryOperator, UnaryOperator},
    interpreter::value::types::{Major, Type},
};

/// Rank of a numeric major kind in the promotion lattice.
const fn rank(major: Major) -> u8 {
    match major {
        Major::Integer => 1,
        Major::Numeric => 2,
        Major::Imaginary => 3,
        _ => 0,
    }
}

/// Promotes two number types to their common type.
///
/// Integer with integer stays integer, any numeric operand gives numeric and
/// any imaginary operand gives imaginary. The untyped null adopts the other
/// side.
///
/// # Example
/// ```
/// use bloc::interpreter::value::{promotion::promote_numbers, types::Type};
///
/// assert_eq!(promote_numbers(&Type::integer(), &Type::integer()),
///            Some(Type::integer()));
/// assert_eq!(promote_numbers(&Type::integer(), &Type::numeric()),
///            Some(Type::numeric()));
/// assert_eq!(promote_numbers(&Type::opaque(), &Type::imaginary()),
///            Some(Type::imaginary()));
/// assert_eq!(promote_numbers(&Type::literal(), &Type::integer()), None);
/// ```
#[must_use]
pub fn promote_numbers(lhs: &Type, rhs: &Type) -> Option<Type> {
    match (lhs.is_opaque(), rhs.is_opaque()) {
        (true, true) => Some(Type::opaque()),
        (true, false) => rhs.is_number().then(|| rhs.clone()),
        (false, true) => lhs.is_number().then(|| lhs.clone()),
        (false, false) if lhs.is_number() && rhs.is_number() => {
            let major = if rank(lhs.major) >= rank(rhs.major) { lhs.major } else { rhs.major };
            Some(Type::scalar(major))
        },
        _ => None,
    }
}

fn is_or_opaque(ty: &Type, major: Major) -> bool {
    ty.is_opaque() || ty.is_scalar(major)
}

/// Whether two types may be compared with `==` and `!=`.
#[must_use]
pub fn equatable(lhs: &Type, rhs: &Type) -> bool {
    if lhs.is_opaque() || rhs.is_opaque() || (lhs.is_number() && rhs.is_number()) {
        return true;
    }
    lhs.accepts(rhs) && rhs.accepts(lhs)
}

/// Whether two types may be compared with `<`, `<=`, `>` and `>=`.
#[must_use]
pub fn orderable(lhs: &Type, rhs: &Type) -> bool {
    let ordered_kind = |ty: &Type| {
        ty.is_opaque()
        || ty.is_scalar(Major::Integer)
        || ty.is_scalar(Major::Numeric)
        || ty.is_scalar(Major::Literal)
        || ty.is_scalar(Major::TabChar)
        || ty.is_scalar(Major::Boolean)
    };
    if !ordered_kind(lhs) || !ordered_kind(rhs) {
        return false;
    }
    lhs.is_opaque()
    || rhs.is_opaque()
    || lhs.major == rhs.major
    || (rank(lhs.major) > 0 && rank(rhs.major) > 0)
}

/// Result type of a binary operator, or `None` when the operands are outside
/// its domain.
///
/// # Example
/// ```
/// use bloc::{
///     ast::BinaryOperator,
///     interpreter::value::{promotion::binary_result, types::Type},
/// };
///
/// assert_eq!(binary_result(BinaryOperator::Add, &Type::literal(), &Type::integer()),
///            Some(Type::literal()));
/// assert_eq!(binary_result(BinaryOperator::Mod, &Type::imaginary(), &Type::integer()),
///            None);
/// assert_eq!(binary_result(BinaryOperator::Less, &Type::integer(), &Type::numeric()),
///            Some(Type::boolean()));
/// assert_eq!(binary_result(BinaryOperator::Sub, &Type::boolean(), &Type::boolean()),
///            None);
/// ```
#[must_use]
pub fn binary_result(op: BinaryOperator, lhs: &Type, rhs: &Type) -> Option<Type> {
    use BinaryOperator::{
        Add, And, BitAnd, BitOr, BitXor, Div, Equal, Exp, Greater, GreaterEqual, Less, LessEqual,
        Match, Mod, Mul, NotEqual, Or, ShiftLeft, ShiftRight, Sub, Xor,
    };

    match op {
        Add => {
            if lhs.is_scalar(Major::TabChar)
               && (is_or_opaque(rhs, Major::TabChar) || rhs.is_scalar(Major::Literal))
            {
                Some(Type::tabchar())
            } else if lhs.is_scalar(Major::Literal) || rhs.is_scalar(Major::Literal) {
                Some(Type::literal())
            } else {
                promote_numbers(lhs, rhs)
            }
        },
        Sub | Mul | Div | Exp => promote_numbers(lhs, rhs),
        Mod => promote_numbers(lhs, rhs).filter(|ty| ty.major != Major::Imaginary),
        Equal | NotEqual => equatable(lhs, rhs).then(Type::boolean),
        Less | LessEqual | Greater | GreaterEqual => orderable(lhs, rhs).then(Type::boolean),
        And | Or | Xor => (is_or_opaque(lhs, Major::Boolean) && is_or_opaque(rhs, Major::Boolean))
                              .then(Type::boolean),
        BitAnd | BitOr | BitXor => {
            if lhs.is_opaque() && rhs.is_opaque() {
                Some(Type::opaque())
            } else if is_or_opaque(lhs, Major::Integer) && is_or_opaque(rhs, Major::Integer) {
                Some(Type::integer())
            } else if is_or_opaque(lhs, Major::Boolean) && is_or_opaque(rhs, Major::Boolean) {
                Some(Type::boolean())
            } else {
                None
            }
        },
        ShiftLeft | ShiftRight => (is_or_opaque(lhs, Major::Integer)
                                   && is_or_opaque(rhs, Major::Integer))
                                      .then(Type::integer),
        Match => (is_or_opaque(lhs, Major::Literal) && is_or_opaque(rhs, Major::Literal))
                     .then(Type::boolean),
    }
}

/// Result type of a unary operator, or `None` when the operand is outside its
/// domain.
#[must_use]
pub fn unary_result(op: UnaryOperator, operand: &Type) -> Option<Type> {
    match op {
        UnaryOperator::Negate | UnaryOperator::Plus => {
            (operand.is_opaque() || operand.is_number()).then(|| operand.clone())
        },
        UnaryOperator::Not => is_or_opaque(operand, Major::Boolean).then(Type::boolean),
        UnaryOperator::BitNot => (operand.is_opaque()
                                  || operand.is_scalar(Major::Integer)
                                  || operand.is_scalar(Major::Boolean))
                                     .then(|| operand.clone()),
    }
}

/// Common element type of two values placed in the same collection.
///
/// Integers and numerics widen to numeric; the untyped null adopts the other
/// side.
///
/// # Example
/// ```
/// use bloc::interpreter::value::{promotion::unify, types::Type};
///
/// assert_eq!(unify(&Type::integer(), &Type::numeric()), Some(Type::numeric()));
/// assert_eq!(unify(&Type::opaque(), &Type::literal()), Some(Type::literal()));
/// assert_eq!(unify(&Type::literal(), &Type::integer()), None);
/// ```
#[must_use]
pub fn unify(lhs: &Type, rhs: &Type) -> Option<Type> {
    if lhs.is_opaque() {
        return Some(rhs.clone());
    }
    if rhs.is_opaque() || lhs == rhs {
        return Some(lhs.clone());
    }
    if lhs.is_number() && rhs.is_number() {
        return promote_numbers(lhs, rhs);
    }
    if lhs.level == rhs.level && (lhs.major == Major::NoType || rhs.major == Major::NoType) {
        let typed = if lhs.major == Major::NoType { rhs } else { lhs };
        return Some(typed.clone());
    }
    None
}
