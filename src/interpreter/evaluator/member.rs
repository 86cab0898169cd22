use crate::{
    ast::{Expr, Member},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            operand::Operand,
        },
        plugin::core::Argument,
        value::{collection::Collection, core::Value},
    },
    util::num::{byte, length, position},
};

/// Builtin methods every string, byte array and collection understands.
pub const SEQUENCE_METHODS: &[&str] = &["count", "at", "insert", "put", "delete", "append"];

/// Whether `method` changes its receiver.
#[must_use]
pub fn is_mutator(method: &Member) -> bool {
    match method {
        Member::SetField(_) => true,
        Member::Named(name) => matches!(name.as_str(), "insert" | "put" | "delete" | "append"),
    }
}

impl Context {
    /// Evaluates `receiver.method(arguments)`.
    ///
    /// Objects dispatch to their native type. For the builtin receivers the
    /// arguments are evaluated into owned values first, so a receiver passed
    /// as its own argument is read before it changes. A mutator called on a
    /// variable changes the variable and yields it; called on a temporary it
    /// changes and yields the temporary.
    pub(crate) fn eval_member_call<'e>(&mut self,
                                       receiver: &'e Expr,
                                       method: &Member,
                                       arguments: &[Expr],
                                       line: usize)
                                       -> EvalResult<Operand<'e>> {
        let receiver = self.operand(receiver)?;

        if let Value::Complex(object) = receiver.get(self, line)? {
            let object = object.clone();
            let args = self.arguments(arguments)?;
            let name = method.to_string();
            let native = object.native();
            let (id, _) = native.interface()
                                .find_method(&name, args.len())
                                .ok_or_else(|| RuntimeError::NotImplemented { details: format!("{} has no method '{name}' taking {} argument(s)",
                                                                                               object.type_name(),
                                                                                               args.len()),
                                                                              line })?;
            return object.invoke(id, self, &args, line).map(Operand::Temp);
        }

        let args = arguments.iter()
                            .map(|a| self.eval(a))
                            .collect::<EvalResult<Vec<_>>>()?;

        if !is_mutator(method) {
            let value = match receiver {
                Operand::Named(name) => access(self.lookup(name, line)?, method, &args, line)?,
                Operand::Temp(value) => take_access(value, method, &args, line)?,
            };
            return Ok(Operand::Temp(value));
        }

        match receiver {
            Operand::Named(name) => {
                self.with_variable(name, line, |value| mutate(value, method, args, line))?;
                Ok(Operand::Named(name))
            },
            Operand::Temp(mut value) => {
                mutate(&mut value, method, args, line)?;
                Ok(Operand::Temp(value))
            },
        }
    }

    /// Evaluates call arguments, remembering which ones are plain variables.
    pub(crate) fn arguments(&mut self, arguments: &[Expr]) -> EvalResult<Vec<Argument>> {
        arguments.iter()
                 .map(|expr| {
                     let variable = match expr {
                         Expr::Variable { name, .. } => Some(name.clone()),
                         _ => None,
                     };
                     Ok(Argument { value: self.eval(expr)?,
                                   variable })
                 })
                 .collect()
    }
}

fn expect_args(method: &Member, args: &[Value], count: usize, line: usize) -> EvalResult<()> {
    if args.len() != count {
        return Err(RuntimeError::ArgumentCountMismatch { name: method.to_string(),
                                                         line });
    }
    Ok(())
}

fn no_method(receiver: &Value, method: &Member, line: usize) -> RuntimeError {
    if receiver.is_null() {
        return RuntimeError::NullPointer { line };
    }
    RuntimeError::NotImplemented { details: format!("{} has no method '{method}'", receiver.value_type()),
                                   line }
}

/// Runs a non-mutating method on a borrowed receiver.
fn access(receiver: &Value, method: &Member, args: &[Value], line: usize) -> EvalResult<Value> {
    let Member::Named(name) = method else {
        return Err(no_method(receiver, method, line));
    };
    match (name.as_str(), receiver) {
        ("count", _) => {
            expect_args(method, args, 0, line)?;
            count(receiver, method, line)
        },
        ("at", Value::Literal(s)) => {
            expect_args(method, args, 1, line)?;
            let at = char_position(s, args[0].integer(line)?, false, line)?;
            let c = s[at..].chars().next().unwrap_or_default();
            Ok(Value::Integer(i64::from(u32::from(c))))
        },
        ("at", Value::TabChar(bytes)) => {
            expect_args(method, args, 1, line)?;
            let at = byte_position(bytes, args[0].integer(line)?, false, line)?;
            Ok(Value::Integer(i64::from(bytes[at])))
        },
        ("at", Value::Collection(c)) => {
            expect_args(method, args, 1, line)?;
            Ok(c.get(args[0].integer(line)?, line)?.clone())
        },
        _ => Err(no_method(receiver, method, line)),
    }
}

/// Runs a non-mutating method on a temporary receiver, moving the result
/// out of it where possible.
fn take_access(receiver: Value, method: &Member, args: &[Value], line: usize) -> EvalResult<Value> {
    match (method, receiver) {
        (Member::Named(name), Value::Collection(c)) if name == "at" => {
            expect_args(method, args, 1, line)?;
            let index = args[0].integer(line)?;
            c.get(index, line)?;
            let at = position(index, c.len(), line)?;
            Ok(c.into_items().swap_remove(at))
        },
        (_, receiver) => access(&receiver, method, args, line),
    }
}

fn count(receiver: &Value, method: &Member, line: usize) -> EvalResult<Value> {
    let n = match receiver {
        Value::Literal(s) => s.chars().count(),
        Value::TabChar(bytes) => bytes.len(),
        Value::Collection(c) => c.len(),
        Value::Tuple(t) => t.arity(),
        other => return Err(no_method(other, method, line)),
    };
    Ok(Value::Integer(length(n)))
}

/// Runs a mutating method on a receiver in place.
///
/// # Errors
/// `NullPointer` for a null receiver, `IndexRange` for a bad position and
/// `TypeMismatch` or `OutOfRange` for an unsuitable item.
pub(crate) fn mutate(receiver: &mut Value,
                     method: &Member,
                     mut args: Vec<Value>,
                     line: usize)
                     -> EvalResult<()> {
    if let Member::SetField(field) = method {
        expect_args(method, &args, 1, line)?;
        let value = args.remove(0);
        return receiver.tuple_mut(line)?.set(*field, value, line);
    }
    let Member::Named(name) = method else {
        return Err(no_method(receiver, method, line));
    };

    match name.as_str() {
        "insert" | "put" => {
            expect_args(method, &args, 2, line)?;
            let item = args.swap_remove(1);
            let index = args[0].integer(line)?;
            if name == "insert" {
                insert(receiver, index, item, method, line)
            } else {
                put(receiver, index, item, method, line)
            }
        },
        "append" => {
            expect_args(method, &args, 1, line)?;
            let item = args.remove(0);
            let end = match &*receiver {
                Value::Collection(c) => c.count(),
                other => count(other, method, line)?.integer(line)?,
            };
            insert(receiver, end, item, method, line)
        },
        "delete" => {
            expect_args(method, &args, 1, line)?;
            delete(receiver, args[0].integer(line)?, method, line)
        },
        _ => Err(no_method(receiver, method, line)),
    }
}

fn insert(receiver: &mut Value, index: i64, item: Value, method: &Member, line: usize) -> EvalResult<()> {
    match receiver {
        Value::Literal(s) => {
            let at = char_position(s, index, true, line)?;
            s.insert_str(at, &literal_item(&item, line)?);
            Ok(())
        },
        Value::TabChar(bytes) => {
            let at = byte_position(bytes, index, true, line)?;
            let more = bytes_item(&item, line)?;
            bytes.splice(at..at, more);
            Ok(())
        },
        Value::Collection(c) => insert_element(c, index, item, line),
        other => Err(no_method(other, method, line)),
    }
}

/// Inserts a single element, or splices a whole collection of the same type.
fn insert_element(c: &mut Collection, index: i64, item: Value, line: usize) -> EvalResult<()> {
    let ty = item.value_type();
    match item {
        Value::Collection(source) if c.is_spliceable(&ty) => c.splice(index, source, line),
        item => c.insert(index, item, line),
    }
}

fn put(receiver: &mut Value, index: i64, item: Value, method: &Member, line: usize) -> EvalResult<()> {
    match receiver {
        Value::Literal(s) => {
            let at = char_position(s, index, false, line)?;
            let c = char_code(item.integer(line)?, line)?;
            let old = s[at..].chars().next().map_or(0, char::len_utf8);
            s.replace_range(at..at + old, c.encode_utf8(&mut [0; 4]));
            Ok(())
        },
        Value::TabChar(bytes) => {
            let at = byte_position(bytes, index, false, line)?;
            bytes[at] = byte(item.integer(line)?, line)?;
            Ok(())
        },
        Value::Collection(c) => c.put(index, item, line).map(drop),
        other => Err(no_method(other, method, line)),
    }
}

fn delete(receiver: &mut Value, index: i64, method: &Member, line: usize) -> EvalResult<()> {
    match receiver {
        Value::Literal(s) => {
            let at = char_position(s, index, false, line)?;
            s.remove(at);
            Ok(())
        },
        Value::TabChar(bytes) => {
            let at = byte_position(bytes, index, false, line)?;
            bytes.remove(at);
            Ok(())
        },
        Value::Collection(c) => c.remove(index, line).map(drop),
        other => Err(no_method(other, method, line)),
    }
}

/// Byte offset of character `index`; `index` may equal the character count
/// when `end_allowed`.
fn char_position(s: &str, index: i64, end_allowed: bool, line: usize) -> EvalResult<usize> {
    let size = s.chars().count();
    let at = position(index, size, line)?;
    if at > size || (at == size && !end_allowed) {
        return Err(RuntimeError::IndexRange { index, size, line });
    }
    Ok(s.char_indices().nth(at).map_or(s.len(), |(offset, _)| offset))
}

fn byte_position(bytes: &[u8], index: i64, end_allowed: bool, line: usize) -> EvalResult<usize> {
    let size = bytes.len();
    let at = position(index, size, line)?;
    if at > size || (at == size && !end_allowed) {
        return Err(RuntimeError::IndexRange { index, size, line });
    }
    Ok(at)
}

/// A character code accepted in strings: `1..=255`.
fn char_code(code: i64, line: usize) -> EvalResult<char> {
    match u8::try_from(code) {
        Ok(b) if b > 0 => Ok(char::from(b)),
        _ => Err(RuntimeError::OutOfRange { details: format!("character code {code}"),
                                            line }),
    }
}

fn literal_item(item: &Value, line: usize) -> EvalResult<String> {
    match item {
        Value::Integer(code) => Ok(char_code(*code, line)?.to_string()),
        Value::Literal(s) => Ok(s.clone()),
        other => Err(RuntimeError::TypeMismatch { details: format!("expected a character code or a literal, found {}",
                                                                   other.value_type()),
                                                  line }),
    }
}

fn bytes_item(item: &Value, line: usize) -> EvalResult<Vec<u8>> {
    match item {
        Value::Integer(n) => Ok(vec![byte(*n, line)?]),
        Value::Literal(s) => Ok(s.as_bytes().to_vec()),
        Value::TabChar(bytes) => Ok(bytes.clone()),
        other => Err(RuntimeError::TypeMismatch { details: format!("expected a byte, a literal or a tabchar, found {}",
                                                                   other.value_type()),
                                                  line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Member {
        Member::Named(name.to_string())
    }

    #[test]
    fn literal_insert_is_before_position() {
        let mut s = Value::from("abcdef");
        mutate(&mut s, &named("insert"), vec![Value::Integer(3), Value::Integer(65)], 1).unwrap();
        assert_eq!(s, Value::from("abcAdef"));
    }

    #[test]
    fn literal_put_replaces() {
        let mut s = Value::from("abcdef");
        mutate(&mut s, &named("put"), vec![Value::Integer(3), Value::Integer(65)], 1).unwrap();
        assert_eq!(s, Value::from("abcAef"));
    }

    #[test]
    fn positions_are_checked() {
        let mut s = Value::from("abc");
        let err = mutate(&mut s, &named("put"), vec![Value::Integer(3), Value::Integer(65)], 1);
        assert!(matches!(err, Err(RuntimeError::IndexRange { index: 3, size: 3, .. })));
        mutate(&mut s, &named("insert"), vec![Value::Integer(3), Value::from("de")], 1).unwrap();
        assert_eq!(s, Value::from("abcde"));
    }

    #[test]
    fn null_receiver_is_an_error() {
        let mut s = Value::Null(crate::interpreter::value::types::Type::literal());
        let err = mutate(&mut s, &named("append"), vec![Value::Integer(65)], 1);
        assert!(matches!(err, Err(RuntimeError::NullPointer { .. })));
    }
}
