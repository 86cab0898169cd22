use std::cmp::Ordering;

use rand::Rng;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{comparison::order, power::eval_power},
            core::{Context, EvalResult},
            function::core::ret,
        },
        plugin::core::Argument,
        value::{core::Value, imaginary::Imaginary},
    },
};

/// Applies a unary builtin to a number.
///
/// The generated functions take exactly one argument, already checked by the
/// call dispatch:
/// - integers and numerics use the real function,
/// - imaginaries use the complex variant.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::math::sin, value::core::Value};
///
/// let x = Value::Numeric(std::f64::consts::PI / 2.0);
/// assert_eq!(sin(&[x], 1).unwrap(), Value::Numeric(1.0));
/// ```
macro_rules! real_imaginary_builtin {
    ($fname:ident, $real_fn:ident, $imaginary_fn:ident) => {
        #[doc = concat!("`", stringify!($fname), "(x)` on numbers and imaginaries.")]
        pub fn $fname(args: &[Value], line: usize) -> EvalResult<Value> {
            match &args[0] {
                Value::Imaginary(z) => Ok(Value::Imaginary(z.$imaginary_fn())),
                other => Ok(Value::Numeric(other.numeric(line)?.$real_fn())),
            }
        }
    };
}

real_imaginary_builtin!(exp, exp, exp);
real_imaginary_builtin!(sin, sin, sin);
real_imaginary_builtin!(cos, cos, cos);
real_imaginary_builtin!(tan, tan, tan);
real_imaginary_builtin!(sinh, sinh, sinh);
real_imaginary_builtin!(cosh, cosh, cosh);
real_imaginary_builtin!(tanh, tanh, tanh);

fn out_of_range(details: String, line: usize) -> RuntimeError {
    RuntimeError::OutOfRange { details, line }
}

/// Absolute value; the magnitude for imaginaries.
///
/// Integers wrap, so `abs` of the smallest integer is itself.
pub fn abs(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.wrapping_abs())),
        Value::Imaginary(z) => Ok(Value::Numeric(z.norm())),
        other => Ok(Value::Numeric(other.numeric(line)?.abs())),
    }
}

fn extremum(args: &[Value], pick: Ordering, line: usize) -> EvalResult<Value> {
    let types = args.iter().map(Value::value_type).collect::<Vec<_>>();
    let ty = ret::extremum(&types);
    let mut best = &args[0];
    for arg in &args[1..] {
        if order(arg, best, line)? == pick {
            best = arg;
        }
    }
    best.clone().coerce_into(&ty, line)
}

/// Smallest of two or more numbers or literals.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::math::min, value::core::Value};
///
/// let args = [Value::Integer(3), Value::Numeric(2.5), Value::Integer(7)];
/// assert_eq!(min(&args, 1).unwrap(), Value::Numeric(2.5));
///
/// let args = [Value::from("pear"), Value::from("apple")];
/// assert_eq!(min(&args, 1).unwrap(), Value::from("apple"));
/// ```
pub fn min(args: &[Value], line: usize) -> EvalResult<Value> {
    extremum(args, Ordering::Less, line)
}

/// Largest of two or more numbers or literals.
///
/// The result is numeric as soon as one argument is numeric.
pub fn max(args: &[Value], line: usize) -> EvalResult<Value> {
    extremum(args, Ordering::Greater, line)
}

/// Restricts `x` to `[lo, hi]`.
///
/// # Errors
/// `OutOfRange` when `lo > hi`.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::math::clamp, value::core::Value};
///
/// let r = clamp(&[Value::Integer(15), Value::Integer(0), Value::Integer(10)], 1);
/// assert_eq!(r.unwrap(), Value::Integer(10));
///
/// let r = clamp(&[Value::Integer(5), Value::Numeric(0.5), Value::Integer(10)], 1);
/// assert_eq!(r.unwrap(), Value::Numeric(5.0));
/// ```
pub fn clamp(args: &[Value], line: usize) -> EvalResult<Value> {
    let types = args.iter().map(Value::value_type).collect::<Vec<_>>();
    let ty = ret::promoted(&types);
    let (x, lo, hi) = (&args[0], &args[1], &args[2]);
    if order(lo, hi, line)? == Ordering::Greater {
        return Err(out_of_range(format!("clamp bounds {lo} > {hi}"), line));
    }
    let picked = if order(x, lo, line)? == Ordering::Less {
        lo
    } else if order(x, hi, line)? == Ordering::Greater {
        hi
    } else {
        x
    };
    picked.clone().coerce_into(&ty, line)
}

/// Rounds half up to `n` decimals: `floor(x * 10^n + 0.5) / 10^n`.
fn round_to(x: f64, scale: f64) -> f64 {
    x.mul_add(scale, 0.5).floor() / scale
}

/// `round(x [, n])`; integers are returned unchanged and imaginaries are
/// rounded per component.
///
/// # Errors
/// `OutOfRange` when `n` does not fit an exponent.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::math::round, value::core::Value};
///
/// assert_eq!(round(&[Value::Numeric(2.5)], 1).unwrap(), Value::Numeric(3.0));
/// assert_eq!(round(&[Value::Numeric(-2.5)], 1).unwrap(), Value::Numeric(-2.0));
/// assert_eq!(round(&[Value::Numeric(3.14159), Value::Integer(2)], 1).unwrap(),
///            Value::Numeric(3.14));
/// assert_eq!(round(&[Value::Integer(7), Value::Integer(2)], 1).unwrap(), Value::Integer(7));
/// ```
pub fn round(args: &[Value], line: usize) -> EvalResult<Value> {
    let digits = match args.get(1) {
        Some(n) => {
            let n = n.integer(line)?;
            i32::try_from(n).map_err(|_| out_of_range(format!("{n} decimals"), line))?
        },
        None => 0,
    };
    let scale = 10f64.powi(digits);
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Imaginary(z) => Ok(Value::Imaginary(z.map(|c| round_to(c, scale)))),
        other => Ok(Value::Numeric(round_to(other.numeric(line)?, scale))),
    }
}

/// Largest integral value not above `x`, per component for imaginaries.
pub fn floor(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Imaginary(z) => Ok(Value::Imaginary(z.map(f64::floor))),
        other => Ok(Value::Numeric(other.numeric(line)?.floor())),
    }
}

/// Smallest integral value not below `x`, per component for imaginaries.
pub fn ceil(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Imaginary(z) => Ok(Value::Imaginary(z.map(f64::ceil))),
        other => Ok(Value::Numeric(other.numeric(line)?.ceil())),
    }
}

/// Square root. A negative number has an imaginary root.
///
/// # Example
/// ```
/// use bloc::interpreter::{
///     evaluator::function::math::sqrt,
///     value::{core::Value, imaginary::Imaginary},
/// };
///
/// assert_eq!(sqrt(&[Value::Integer(9)], 1).unwrap(), Value::Numeric(3.0));
/// assert_eq!(sqrt(&[Value::Integer(-4)], 1).unwrap(),
///            Value::Imaginary(Imaginary::new(0.0, 2.0)));
/// ```
pub fn sqrt(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Imaginary(z) => Ok(Value::Imaginary(z.sqrt())),
        other => {
            let x = other.numeric(line)?;
            if x < 0.0 {
                return Ok(Value::Imaginary(Imaginary::new(0.0, (-x).sqrt())));
            }
            Ok(Value::Numeric(x.sqrt()))
        },
    }
}

fn logarithm(value: &Value,
             real: fn(f64) -> f64,
             complex: fn(Imaginary) -> Imaginary,
             line: usize)
             -> EvalResult<Value> {
    let z = match value {
        Value::Imaginary(z) => *z,
        other => {
            let x = other.numeric(line)?;
            if x > 0.0 {
                return Ok(Value::Numeric(real(x)));
            }
            Imaginary::from(x)
        },
    };
    if z.is_zero() {
        return Err(out_of_range("logarithm of zero".to_string(), line));
    }
    Ok(Value::Imaginary(complex(z)))
}

/// Natural logarithm. Negative numbers have an imaginary logarithm.
///
/// # Errors
/// `OutOfRange` for zero.
pub fn log(args: &[Value], line: usize) -> EvalResult<Value> {
    logarithm(&args[0], f64::ln, Imaginary::ln, line)
}

/// Base-10 logarithm.
///
/// # Errors
/// `OutOfRange` for zero.
pub fn log10(args: &[Value], line: usize) -> EvalResult<Value> {
    logarithm(&args[0], f64::log10, Imaginary::log10, line)
}

fn inverse_trig(value: &Value, f: fn(f64) -> f64, name: &str, line: usize) -> EvalResult<Value> {
    let x = value.numeric(line)?;
    if !(-1.0..=1.0).contains(&x) {
        return Err(out_of_range(format!("{name}({x})"), line));
    }
    Ok(Value::Numeric(f(x)))
}

/// Arc sine.
///
/// # Errors
/// `OutOfRange` outside `[-1, 1]`.
pub fn asin(args: &[Value], line: usize) -> EvalResult<Value> {
    inverse_trig(&args[0], f64::asin, "asin", line)
}

/// Arc cosine.
///
/// # Errors
/// `OutOfRange` outside `[-1, 1]`.
pub fn acos(args: &[Value], line: usize) -> EvalResult<Value> {
    inverse_trig(&args[0], f64::acos, "acos", line)
}

/// Arc tangent.
pub fn atan(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Numeric(args[0].numeric(line)?.atan()))
}

/// `pow(x, y)`, the same as `x ** y`.
pub fn pow(args: &[Value], line: usize) -> EvalResult<Value> {
    eval_power(&args[0], &args[1], line)
}

/// Builds `a + bi`.
pub fn imag(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Imaginary(Imaginary::new(args[0].numeric(line)?, args[1].numeric(line)?)))
}

/// Real component.
pub fn re(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Numeric(args[0].imaginary(line)?.re))
}

/// Imaginary component.
pub fn im(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Numeric(args[0].imaginary(line)?.im))
}

/// `random()` is a numeric in `[0, 1)`, `random(max)` an integer in
/// `[0, max)`, both drawn from the context generator.
///
/// # Errors
/// `OutOfRange` when `max` is not positive.
pub fn random(ctx: &mut Context, args: &[Argument], line: usize) -> EvalResult<Value> {
    let Some(max) = args.first() else {
        return Ok(Value::Numeric(ctx.rng_mut().r#gen::<f64>()));
    };
    let max = max.value.integer(line)?;
    if max <= 0 {
        return Err(out_of_range(format!("random({max})"), line));
    }
    Ok(Value::Integer(ctx.rng_mut().gen_range(0..max)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_is_idempotent() {
        for x in [0.0, 1.005, 2.675, -3.14159, 1234.5678, 1e-5] {
            for n in 0..4 {
                let once = round(&[Value::Numeric(x), Value::Integer(n)], 1).unwrap();
                let twice = round(&[once.clone(), Value::Integer(n)], 1).unwrap();
                assert_eq!(once, twice, "x={x} n={n}");
            }
        }
    }

    #[test]
    fn round_imaginary_per_component() {
        let z = Value::Imaginary(Imaginary::new(1.26, -2.74));
        let r = round(&[z, Value::Integer(1)], 1).unwrap();
        assert_eq!(r, Value::Imaginary(Imaginary::new(1.3, -2.7)));
    }

    #[test]
    fn logarithm_domain() {
        assert!(matches!(log(&[Value::Integer(0)], 1), Err(RuntimeError::OutOfRange { .. })));
        assert!(matches!(log(&[Value::Integer(-1)], 1), Ok(Value::Imaginary(_))));
        assert_eq!(log10(&[Value::Integer(1000)], 1).unwrap(), Value::Numeric(3.0));
    }

    #[test]
    fn inverse_trig_domain() {
        assert!(asin(&[Value::Numeric(1.5)], 1).is_err());
        assert_eq!(acos(&[Value::Integer(1)], 1).unwrap(), Value::Numeric(0.0));
    }

    #[test]
    fn clamp_rejects_inverted_bounds() {
        let args = [Value::Integer(1), Value::Integer(5), Value::Integer(0)];
        assert!(matches!(clamp(&args, 1), Err(RuntimeError::OutOfRange { .. })));
    }

    #[test]
    fn random_is_seeded() {
        let config = crate::config::Config::default().with_seed(7);
        let mut a = Context::with_config(&config);
        let mut b = Context::with_config(&config);
        let arg = [Argument { value:    Value::Integer(100),
                              variable: None, }];
        for _ in 0..10 {
            let x = random(&mut a, &arg, 1).unwrap();
            assert_eq!(x, random(&mut b, &arg, 1).unwrap());
            assert!((0..100).contains(&x.integer(1).unwrap()));
        }
        assert!(random(&mut a, &[Argument { value:    Value::Integer(0),
                                            variable: None, }],
                       1).is_err());
    }
}
