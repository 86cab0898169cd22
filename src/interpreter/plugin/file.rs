use std::{
    any::Any,
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
};

use tracing::debug;

use crate::{
    interpreter::{
        evaluator::core::{Context, EvalResult},
        plugin::core::{Argument, Interface, NativeType, Param, downcast, plugin_error},
        value::{core::Value, types::Type},
    },
    util::num::length,
};

const READLN: usize = 0;
const WRITE: usize = 1;
const FLUSH: usize = 2;
const CLOSE: usize = 3;
const ISOPEN: usize = 4;

enum Handle {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
}

/// An open, or closed, file object.
struct OpenFile {
    path:   String,
    handle: Option<Handle>,
}

/// The `file` native type.
///
/// `file(path, mode)` opens `path` for reading (`"r"`), writing (`"w"`,
/// truncating) or appending (`"a"`). Written data is buffered until `flush`,
/// `close` or the release of the last alias.
pub struct FileType {
    interface: Interface,
}

impl Default for FileType {
    fn default() -> Self {
        Self::new()
    }
}

impl FileType {
    /// Declares `file(path, mode)` and the methods `readln`, `write`,
    /// `flush`, `close` and `isopen`.
    #[must_use]
    pub fn new() -> Self {
        let interface =
            Interface::new("file").constructor(vec![Param::input("path", Type::literal()),
                                                    Param::input("mode", Type::literal())])
                                  .method("readln", Type::boolean(), vec![Param::inout("line", Type::literal())])
                                  .method("write", Type::integer(), vec![Param::input("text", Type::literal())])
                                  .method("flush", Type::boolean(), vec![])
                                  .method("close", Type::boolean(), vec![])
                                  .method("isopen", Type::boolean(), vec![]);
        Self { interface }
    }

    fn readln(&self, file: &mut OpenFile, ctx: &mut Context, target: &Argument, line: usize) -> EvalResult<Value> {
        let Some(Handle::Reader(reader)) = &mut file.handle else {
            return Err(plugin_error(self, format!("{} is not open for reading", file.path), line));
        };
        let mut text = String::new();
        let read = reader.read_line(&mut text)
                         .map_err(|e| plugin_error(self, format!("{}: {e}", file.path), line))?;
        if read == 0 {
            return Ok(Value::Boolean(false));
        }
        let trimmed = text.strip_suffix('\n')
                          .map_or(text.as_str(), |t| t.strip_suffix('\r').unwrap_or(t));
        target.store(ctx, Value::from(trimmed), line)?;
        Ok(Value::Boolean(true))
    }

    fn write(&self, file: &mut OpenFile, text: &str, line: usize) -> EvalResult<Value> {
        let Some(Handle::Writer(writer)) = &mut file.handle else {
            return Err(plugin_error(self, format!("{} is not open for writing", file.path), line));
        };
        writer.write_all(text.as_bytes())
              .map_err(|e| plugin_error(self, format!("{}: {e}", file.path), line))?;
        Ok(Value::Integer(length(text.len())))
    }

    fn flush(&self, file: &mut OpenFile, line: usize) -> EvalResult<Value> {
        match &mut file.handle {
            Some(Handle::Writer(writer)) => {
                writer.flush()
                      .map_err(|e| plugin_error(self, format!("{}: {e}", file.path), line))?;
                Ok(Value::Boolean(true))
            },
            Some(Handle::Reader(_)) => Ok(Value::Boolean(true)),
            None => Ok(Value::Boolean(false)),
        }
    }

    fn close(&self, file: &mut OpenFile, line: usize) -> EvalResult<Value> {
        let flushed = self.flush(file, line)?;
        file.handle = None;
        debug!(path = %file.path, "closed file");
        Ok(flushed)
    }
}

impl NativeType for FileType {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn construct(&self,
                 _ctor: usize,
                 _ctx: &mut Context,
                 args: &[Value],
                 line: usize)
                 -> EvalResult<Box<dyn Any>> {
        let path = args[0].literal(line)?;
        let mode = args[1].literal(line)?;
        let fail = |e: std::io::Error| plugin_error(self, format!("{path}: {e}"), line);

        let handle = match mode {
            "r" => Handle::Reader(BufReader::new(File::open(path).map_err(fail)?)),
            "w" => Handle::Writer(BufWriter::new(File::create(path).map_err(fail)?)),
            "a" => {
                let file = OpenOptions::new().create(true)
                                             .append(true)
                                             .open(path)
                                             .map_err(fail)?;
                Handle::Writer(BufWriter::new(file))
            },
            other => return Err(plugin_error(self, format!("unknown mode {other:?}"), line)),
        };
        debug!(%path, %mode, "opened file");
        Ok(Box::new(OpenFile { path:   path.to_string(),
                               handle: Some(handle), }))
    }

    fn invoke(&self,
              object: &mut dyn Any,
              method: usize,
              ctx: &mut Context,
              args: &[Argument],
              line: usize)
              -> EvalResult<Value> {
        let file = downcast::<OpenFile>(self, object, line)?;
        match method {
            READLN => self.readln(file, ctx, &args[0], line),
            WRITE => self.write(file, args[0].value.literal(line)?, line),
            FLUSH => self.flush(file, line),
            CLOSE => self.close(file, line),
            ISOPEN => Ok(Value::Boolean(file.handle.is_some())),
            _ => Err(plugin_error(self, format!("no method #{method}"), line)),
        }
    }

    fn destroy(&self, object: Box<dyn Any>) {
        if let Ok(mut file) = object.downcast::<OpenFile>()
           && let Some(Handle::Writer(mut writer)) = file.handle.take()
           && let Err(e) = writer.flush()
        {
            debug!(path = %file.path, error = %e, "flush on release failed");
        }
    }
}
