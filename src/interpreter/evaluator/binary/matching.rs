use std::collections::hash_map::Entry;

use regex::Regex;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

/// Distinct patterns kept compiled before the cache starts over.
pub(crate) const REGEX_CACHE_LIMIT: usize = 256;

impl Context {
    /// Evaluates `subject ~= pattern`.
    ///
    /// The pattern must match the whole subject. Compiled patterns are
    /// cached on the context, up to `REGEX_CACHE_LIMIT` of them.
    ///
    /// # Errors
    /// `Regex` with the engine's message when the pattern does not compile.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let ctx = Context::new();
    /// let ok = ctx.eval_match(&Value::from("abc123"), &Value::from("[a-z]+[0-9]+"), 1);
    /// assert_eq!(ok.unwrap(), Value::Boolean(true));
    ///
    /// let partial = ctx.eval_match(&Value::from("abc123"), &Value::from("[a-z]+"), 1);
    /// assert_eq!(partial.unwrap(), Value::Boolean(false));
    ///
    /// assert!(ctx.eval_match(&Value::from("x"), &Value::from("("), 1).is_err());
    /// ```
    pub fn eval_match(&self, subject: &Value, pattern: &Value, line: usize) -> EvalResult<Value> {
        let subject = subject.literal(line)?;
        let pattern = pattern.literal(line)?;

        let mut cache = self.regex_cache().borrow_mut();
        if cache.len() >= REGEX_CACHE_LIMIT && !cache.contains_key(pattern) {
            cache.clear();
        }
        let regex = match cache.entry(pattern.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let anchored = format!("^(?:{pattern})$");
                let compiled = Regex::new(&anchored).map_err(|e| RuntimeError::Regex { message: e.to_string(),
                                                                                     line })?;
                entry.insert(compiled)
            },
        };
        Ok(Value::Boolean(regex.is_match(subject)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_stays_bounded() {
        let ctx = Context::new();
        let subject = Value::from("k7");
        for i in 0..REGEX_CACHE_LIMIT * 3 {
            let pattern = Value::from(format!("k{}|x{i}", i % 10));
            let matched = ctx.eval_match(&subject, &pattern, 1).unwrap();
            assert_eq!(matched, Value::Boolean(i % 10 == 7));
            assert!(ctx.regex_cache().borrow().len() <= REGEX_CACHE_LIMIT);
        }
    }

    #[test]
    fn cached_pattern_survives_a_full_cache() {
        let ctx = Context::new();
        for i in 0..REGEX_CACHE_LIMIT {
            ctx.eval_match(&Value::from("a"), &Value::from(format!("a{{0,{i}}}")), 1).unwrap();
        }
        assert_eq!(ctx.regex_cache().borrow().len(), REGEX_CACHE_LIMIT);
        ctx.eval_match(&Value::from("a"), &Value::from("a{0,0}"), 1).unwrap();
        assert_eq!(ctx.regex_cache().borrow().len(), REGEX_CACHE_LIMIT);
        ctx.eval_match(&Value::from("a"), &Value::from("b"), 1).unwrap();
        assert_eq!(ctx.regex_cache().borrow().len(), 1);
    }
}
