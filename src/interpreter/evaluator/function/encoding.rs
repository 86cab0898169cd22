use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::{count, filled},
};

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const DJB2_SEED: u64 = 5381;

/// Widest `hex` output: the 16 nibbles of a 64-bit integer.
const MAX_HEX_DIGITS: usize = 16;

/// Bytes of a literal or tabchar argument.
fn bytes_of<'a>(value: &'a Value, line: usize) -> EvalResult<&'a [u8]> {
    match value {
        Value::Literal(s) => Ok(s.as_bytes()),
        other => other.tabchar(line),
    }
}

/// Lowercase hex digits of `n`'s two's complement bits, at least `width`
/// digits and at least one.
///
/// Nibbles are visited from the highest down and leading zeros are dropped
/// until a non-zero nibble shows up or the remaining nibbles are needed to
/// reach `width`.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::function::encoding::hex_digits;
///
/// assert_eq!(hex_digits(255, 0), "ff");
/// assert_eq!(hex_digits(255, 4), "00ff");
/// assert_eq!(hex_digits(0, 0), "0");
/// assert_eq!(hex_digits(-1, 0), "ffffffffffffffff");
/// ```
#[must_use]
pub fn hex_digits(n: i64, width: usize) -> String {
    let bits = u64::from_ne_bytes(n.to_ne_bytes());
    let width = width.clamp(1, MAX_HEX_DIGITS);
    let mut out = String::with_capacity(MAX_HEX_DIGITS);
    let mut seen = false;
    for remaining in (1..=MAX_HEX_DIGITS).rev() {
        let nibble = (bits >> ((remaining - 1) * 4)) & 0xf;
        if nibble != 0 || remaining <= width {
            seen = true;
        }
        if seen {
            out.push(char::from(b"0123456789abcdef"[usize::try_from(nibble).unwrap_or(0)]));
        }
    }
    out
}

/// `hex(n [, width])`
///
/// # Errors
/// `OutOfRange` for a negative width.
pub fn hex(args: &[Value], line: usize) -> EvalResult<Value> {
    let n = args[0].integer(line)?;
    let width = match args.get(1) {
        Some(w) => count(w.integer(line)?, "hex width", line)?,
        None => 0,
    };
    Ok(Value::Literal(hex_digits(n, width)))
}

/// DJB2 over `bytes`: `h = h * 33 + byte` starting from 5381, wrapping.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::function::encoding::djb2;
///
/// assert_eq!(djb2(b""), 5381);
/// assert_eq!(djb2(b"a"), 5381 * 33 + 97);
/// ```
#[must_use]
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter()
         .fold(DJB2_SEED, |h, &b| h.wrapping_mul(33).wrapping_add(u64::from(b)))
}

/// `hash(s [, max])`: the DJB2 hash of a literal or tabchar reduced into
/// `[0, max)`; `max` defaults to `u32::MAX`.
///
/// # Errors
/// `OutOfRange` when `max` is not positive.
pub fn hash(args: &[Value], line: usize) -> EvalResult<Value> {
    let bytes = bytes_of(&args[0], line)?;
    let max = match args.get(1) {
        Some(m) => m.integer(line)?,
        None => i64::from(u32::MAX),
    };
    let modulus = u64::try_from(max).ok()
                                    .filter(|m| *m > 0)
                                    .ok_or_else(|| RuntimeError::OutOfRange { details: format!("hash size {max}"),
                                                                              line })?;
    let h = djb2(bytes) % modulus;
    Ok(Value::Integer(i64::try_from(h).unwrap_or(i64::MAX)))
}

/// Standard padded base64 of `input`.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::function::encoding::base64_encode;
///
/// assert_eq!(base64_encode(b"Man"), "TWFu");
/// assert_eq!(base64_encode(b"Ma"), "TWE=");
/// assert_eq!(base64_encode(b"M"), "TQ==");
/// assert_eq!(base64_encode(b""), "");
/// ```
#[must_use]
pub fn base64_encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = chunk.get(1).copied().map_or(0, u32::from);
        let b2 = chunk.get(2).copied().map_or(0, u32::from);
        let group = (b0 << 16) | (b1 << 8) | b2;
        let symbol = |shift: u32| char::from(ALPHABET[((group >> shift) & 0x3f) as usize]);

        out.push(symbol(18));
        out.push(symbol(12));
        out.push(if chunk.len() > 1 { symbol(6) } else { '=' });
        out.push(if chunk.len() > 2 { symbol(0) } else { '=' });
    }
    out
}

fn sextet(c: u8) -> Option<u32> {
    ALPHABET.iter().position(|&a| a == c).and_then(|p| u32::try_from(p).ok())
}

/// Decodes standard base64, with or without trailing padding.
///
/// Returns `None` for characters outside the alphabet, misplaced padding
/// or a length that cannot come from an encoder.
///
/// # Example
/// ```
/// use bloc::interpreter::evaluator::function::encoding::base64_decode;
///
/// assert_eq!(base64_decode("TWE=").unwrap(), b"Ma");
/// assert_eq!(base64_decode("TWE").unwrap(), b"Ma");
/// assert!(base64_decode("T").is_none());
/// assert!(base64_decode("T*E=").is_none());
/// ```
#[must_use]
pub fn base64_decode(input: &str) -> Option<Vec<u8>> {
    let trimmed = input.trim_end_matches('=');
    let padding = input.len() - trimmed.len();
    if padding > 2 || (padding > 0 && input.len() % 4 != 0) || trimmed.len() % 4 == 1 {
        return None;
    }

    let mut out = Vec::with_capacity(trimmed.len() / 4 * 3 + 2);
    for chunk in trimmed.as_bytes().chunks(4) {
        let mut group = 0u32;
        for (i, &c) in chunk.iter().enumerate() {
            group |= sextet(c)? << (18 - 6 * i);
        }
        let [_, b0, b1, b2] = group.to_be_bytes();
        out.push(b0);
        if chunk.len() > 2 {
            out.push(b1);
        }
        if chunk.len() > 3 {
            out.push(b2);
        }
    }
    Some(out)
}

/// `b64enc(x)` of a literal or tabchar.
pub fn b64enc(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Literal(base64_encode(bytes_of(&args[0], line)?)))
}

/// `b64dec(s)`
///
/// # Errors
/// `OutOfRange` for malformed input.
pub fn b64dec(args: &[Value], line: usize) -> EvalResult<Value> {
    let text = args[0].literal(line)?;
    base64_decode(text).map(Value::TabChar)
                       .ok_or_else(|| RuntimeError::OutOfRange { details: "malformed base64".to_string(),
                                                                 line })
}

/// `bytes(x)`: the UTF-8 bytes of a literal, or `x` zero bytes.
///
/// # Errors
/// `OutOfRange` for a negative count or one too large to allocate.
pub fn bytes(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Literal(s) => Ok(Value::TabChar(s.as_bytes().to_vec())),
        other => {
            let n = count(other.integer(line)?, "byte count", line)?;
            Ok(Value::TabChar(filled(n, 0, "byte count", line)?))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trips_every_tail_length() {
        let data = (0..=255u8).collect::<Vec<_>>();
        for len in [0, 1, 2, 3, 4, 5, 254, 255, 256] {
            let encoded = base64_encode(&data[..len]);
            assert_eq!(encoded.len() % 4, 0);
            assert_eq!(base64_decode(&encoded).unwrap(), &data[..len]);
        }
    }

    #[test]
    fn base64_rejects_bad_padding() {
        assert!(base64_decode("TQ===").is_none());
        assert!(base64_decode("TQ=").is_none());
        assert!(base64_decode("=").is_none());
    }

    #[test]
    fn hash_stays_in_range() {
        for max in [1, 2, 7, 1000, i64::MAX] {
            let h = hash(&[Value::from("some text"), Value::Integer(max)], 1).unwrap()
                                                                            .integer(1)
                                                                            .unwrap();
            assert!((0..max).contains(&h));
        }
        let empty = hash(&[Value::from(""), Value::Integer(100)], 1).unwrap();
        assert_eq!(empty, Value::Integer(5381 % 100));
        assert!(hash(&[Value::from(""), Value::Integer(0)], 1).is_err());
    }

    #[test]
    fn hash_agrees_on_text_and_bytes() {
        let text = hash(&[Value::from("abc")], 1).unwrap();
        let bytes = hash(&[Value::TabChar(b"abc".to_vec())], 1).unwrap();
        assert_eq!(text, bytes);
    }

    #[test]
    fn hex_width_is_capped() {
        assert_eq!(hex_digits(1, 40), "0000000000000001");
        assert_eq!(hex_digits(0x1234, 2), "1234");
    }
}
