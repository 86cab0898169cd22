use std::any::Any;

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    plugin::core::{Argument, Interface, NativeType, Param, downcast, plugin_error},
    value::{collection::Collection, core::Value, types::Type},
};

const DESERIALIZE: usize = 0;
const SERIALIZE: usize = 1;
const SEPARATOR: usize = 2;

/// One CSV dialect: a field separator and a quote character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Field separator.
    pub separator: char,
    /// Quote character; doubled inside a quoted field.
    pub quote:     char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self { separator: ',',
               quote:     '"', }
    }
}

impl Dialect {
    /// Splits one line into fields.
    ///
    /// A field starting with the quote character runs to the matching quote
    /// and may hold separators; a doubled quote inside it stands for one
    /// quote.
    ///
    /// # Returns
    /// `None` when a quoted field is not terminated.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::plugin::csv::Dialect;
    ///
    /// let csv = Dialect::default();
    /// assert_eq!(csv.split(r#"a,"b,c",,"say ""hi""""#).unwrap(),
    ///            vec!["a", "b,c", "", r#"say "hi""#]);
    /// assert!(csv.split(r#"a,"open"#).is_none());
    /// ```
    #[must_use]
    pub fn split(&self, line: &str) -> Option<Vec<String>> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if quoted {
                if c != self.quote {
                    field.push(c);
                } else if chars.peek() == Some(&self.quote) {
                    field.push(c);
                    chars.next();
                } else {
                    quoted = false;
                }
            } else if c == self.quote && field.is_empty() {
                quoted = true;
            } else if c == self.separator {
                fields.push(std::mem::take(&mut field));
            } else {
                field.push(c);
            }
        }
        if quoted {
            return None;
        }
        fields.push(field);
        Some(fields)
    }

    /// Joins fields into one line, quoting those that need it.
    ///
    /// # Example
    /// ```
    /// use bloc::interpreter::plugin::csv::Dialect;
    ///
    /// let csv = Dialect::default();
    /// assert_eq!(csv.join(&["a", "b,c", r#"q"q"#]), r#"a,"b,c","q""q""#);
    /// ```
    #[must_use]
    pub fn join<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push(self.separator);
            }
            let field = field.as_ref();
            let needs_quotes = field.chars()
                                    .any(|c| c == self.separator || c == self.quote || c == '\n' || c == '\r');
            if needs_quotes {
                let doubled = format!("{0}{0}", self.quote);
                line.push(self.quote);
                line.push_str(&field.replace(self.quote, &doubled));
                line.push(self.quote);
            } else {
                line.push_str(field);
            }
        }
        line
    }
}

/// The `csv` native type.
pub struct CsvType {
    interface: Interface,
}

impl Default for CsvType {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvType {
    /// Declares the constructors `csv()`, `csv(separator)` and
    /// `csv(separator, quote)` and the methods `deserialize`, `serialize` and
    /// `separator`.
    #[must_use]
    pub fn new() -> Self {
        let fields = Type::literal().array_of();
        let interface =
            Interface::new("csv").constructor(vec![])
                                 .constructor(vec![Param::input("separator", Type::literal())])
                                 .constructor(vec![Param::input("separator", Type::literal()),
                                                   Param::input("quote", Type::literal())])
                                 .method("deserialize",
                                         fields.clone(),
                                         vec![Param::input("line", Type::literal())])
                                 .method("serialize", Type::literal(), vec![Param::input("fields", fields)])
                                 .method("separator", Type::literal(), vec![]);
        Self { interface }
    }

    fn single_char(&self, value: &Value, what: &str, line: usize) -> EvalResult<char> {
        let text = value.literal(line)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(plugin_error(self, format!("{what} must be one character, found {text:?}"), line)),
        }
    }
}

impl NativeType for CsvType {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn construct(&self,
                 _ctor: usize,
                 _ctx: &mut Context,
                 args: &[Value],
                 line: usize)
                 -> EvalResult<Box<dyn Any>> {
        let mut dialect = Dialect::default();
        if let Some(separator) = args.first() {
            dialect.separator = self.single_char(separator, "separator", line)?;
        }
        if let Some(quote) = args.get(1) {
            dialect.quote = self.single_char(quote, "quote", line)?;
        }
        if dialect.separator == dialect.quote {
            return Err(plugin_error(self, "separator and quote must differ", line));
        }
        Ok(Box::new(dialect))
    }

    fn invoke(&self,
              object: &mut dyn Any,
              method: usize,
              _ctx: &mut Context,
              args: &[Argument],
              line: usize)
              -> EvalResult<Value> {
        let dialect = *downcast::<Dialect>(self, object, line)?;
        match method {
            DESERIALIZE => {
                let text = &args[0].value;
                if text.is_null() {
                    return Ok(Value::Null(Type::literal().array_of()));
                }
                let fields = dialect.split(text.literal(line)?)
                                    .ok_or_else(|| plugin_error(self, "unterminated quoted field", line))?;
                let mut out = Collection::new(Type::literal());
                for field in fields {
                    out.insert(out.count(), Value::Literal(field), line)?;
                }
                Ok(Value::Collection(out))
            },
            SERIALIZE => {
                let fields = args[0].value.collection(line)?;
                let texts = fields.items()
                                  .iter()
                                  .map(|v| if v.is_null() { String::new() } else { v.to_string() })
                                  .collect::<Vec<_>>();
                Ok(Value::Literal(dialect.join(&texts)))
            },
            SEPARATOR => Ok(Value::Literal(dialect.separator.to_string())),
            _ => Err(plugin_error(self, format!("no method #{method}"), line)),
        }
    }
}
