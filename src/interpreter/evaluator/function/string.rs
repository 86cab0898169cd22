use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::{count, position},
};

/// Applies a `&str -> String` transform to a literal argument.
macro_rules! literal_builtin {
    ($fname:ident, $doc:literal, |$s:ident| $body:expr) => {
        #[doc = $doc]
        pub fn $fname(args: &[Value], line: usize) -> EvalResult<Value> {
            let $s = args[0].literal(line)?;
            Ok(Value::Literal($body))
        }
    };
}

literal_builtin!(trim, "Removes leading and trailing whitespace.", |s| s.trim().to_string());
literal_builtin!(ltrim, "Removes leading whitespace.", |s| s.trim_start().to_string());
literal_builtin!(rtrim, "Removes trailing whitespace.", |s| s.trim_end().to_string());
literal_builtin!(upper, "Upper-cases every character.", |s| s.to_uppercase());
literal_builtin!(lower, "Lower-cases every character.", |s| s.to_lowercase());

/// `substr(s, pos [, len])`: up to `len` characters starting at `pos`,
/// or everything from `pos` on.
///
/// # Errors
/// `IndexRange` when `pos` is negative or past the end, `OutOfRange` for a
/// negative length.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::string::substr, value::core::Value};
///
/// let s = Value::from("abcdef");
/// assert_eq!(substr(&[s.clone(), Value::Integer(2), Value::Integer(3)], 1).unwrap(),
///            Value::from("cde"));
/// assert_eq!(substr(&[s.clone(), Value::Integer(4), Value::Integer(10)], 1).unwrap(),
///            Value::from("ef"));
/// assert_eq!(substr(&[s.clone(), Value::Integer(6)], 1).unwrap(), Value::from(""));
/// assert!(substr(&[s, Value::Integer(7)], 1).is_err());
/// ```
pub fn substr(args: &[Value], line: usize) -> EvalResult<Value> {
    let s = args[0].literal(line)?;
    let size = s.chars().count();
    let index = args[1].integer(line)?;
    let start = position(index, size, line)?;
    if start > size {
        return Err(RuntimeError::IndexRange { index, size, line });
    }
    let len = match args.get(2) {
        Some(len) => count(len.integer(line)?, "substring length", line)?,
        None => size - start,
    };
    Ok(Value::Literal(s.chars().skip(start).take(len).collect()))
}

/// `rsubstr(s, n)`: the last `n` characters.
///
/// # Errors
/// `OutOfRange` for a negative count.
///
/// # Example
/// ```
/// use bloc::interpreter::{evaluator::function::string::rsubstr, value::core::Value};
///
/// assert_eq!(rsubstr(&[Value::from("abcdef"), Value::Integer(2)], 1).unwrap(),
///            Value::from("ef"));
/// assert_eq!(rsubstr(&[Value::from("ab"), Value::Integer(5)], 1).unwrap(), Value::from("ab"));
/// ```
pub fn rsubstr(args: &[Value], line: usize) -> EvalResult<Value> {
    let s = args[0].literal(line)?;
    let n = count(args[1].integer(line)?, "substring length", line)?;
    let skip = s.chars().count().saturating_sub(n);
    Ok(Value::Literal(s.chars().skip(skip).collect()))
}

/// `chr(code)`: the one-character literal for a Unicode scalar value.
///
/// # Errors
/// `OutOfRange` for zero, surrogates and values past `0x10FFFF`.
pub fn chr(args: &[Value], line: usize) -> EvalResult<Value> {
    let code = args[0].integer(line)?;
    u32::try_from(code).ok()
                       .filter(|c| *c > 0)
                       .and_then(char::from_u32)
                       .map(|c| Value::Literal(c.to_string()))
                       .ok_or_else(|| RuntimeError::OutOfRange { details: format!("character code {code}"),
                                                                 line })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substr_counts_characters() {
        let s = Value::from("héllo");
        assert_eq!(substr(&[s, Value::Integer(1), Value::Integer(2)], 1).unwrap(),
                   Value::from("él"));
    }

    #[test]
    fn chr_range() {
        assert_eq!(chr(&[Value::Integer(65)], 1).unwrap(), Value::from("A"));
        assert!(chr(&[Value::Integer(0)], 1).is_err());
        assert!(chr(&[Value::Integer(0xD800)], 1).is_err());
        assert!(chr(&[Value::Integer(0x11_0000)], 1).is_err());
    }

    #[test]
    fn trims() {
        let s = Value::from("  x y  ");
        assert_eq!(trim(&[s.clone()], 1).unwrap(), Value::from("x y"));
        assert_eq!(ltrim(&[s.clone()], 1).unwrap(), Value::from("x y  "));
        assert_eq!(rtrim(&[s], 1).unwrap(), Value::from("  x y"));
    }
}
