use std::{
    io::{self, BufRead, BufReader},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError},
    },
    thread,
    time::Duration,
};

use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        plugin::core::Argument,
        value::core::Value,
    },
};

/// Lines read from an input source on a background thread.
///
/// The reader thread blocks on the source; the evaluator waits for a line
/// in slices of the configured timeout so that the stop flag is seen while
/// nothing arrives.
pub struct LineReader {
    lines: Receiver<io::Result<String>>,
}

impl LineReader {
    /// Starts reading `reader` line by line.
    #[must_use]
    pub fn spawn(reader: impl BufRead + Send + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in reader.lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { lines: rx }
    }

    /// Reads standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(io::stdin()))
    }

    /// Waits for the next line, without its line terminator.
    ///
    /// # Errors
    /// `Interrupted` once `stop` is set and `Io` when reading failed.
    ///
    /// # Returns
    /// `None` at end of input.
    pub fn next_line(&self, stop: &AtomicBool, timeout: Duration, line: usize) -> EvalResult<Option<String>> {
        loop {
            if stop.load(Ordering::Relaxed) {
                return Err(RuntimeError::Interrupted { line });
            }
            match self.lines.recv_timeout(timeout) {
                Ok(Ok(text)) => return Ok(Some(text)),
                Ok(Err(e)) => return Err(RuntimeError::Io { message: e.to_string(),
                                                            line }),
                Err(RecvTimeoutError::Timeout) => trace!(line, "still waiting for input"),
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }
}

/// `input(var)`: reads one line into `var`.
///
/// Returns `true` when a line was stored and `false` at end of input, where
/// the variable is left as it was.
///
/// # Errors
/// `TypeMismatch` when the argument is not a variable, plus the errors of
/// [`LineReader::next_line`].
pub fn input(ctx: &mut Context, args: &[Argument], line: usize) -> EvalResult<Value> {
    let Some(text) = ctx.read_line(line)? else {
        return Ok(Value::Boolean(false));
    };
    args[0].store(ctx, Value::Literal(text), line)?;
    Ok(Value::Boolean(true))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn lines_then_end() {
        let reader = LineReader::spawn(Cursor::new("one\r\ntwo\n"));
        let stop = AtomicBool::new(false);
        let timeout = Duration::from_millis(50);
        assert_eq!(reader.next_line(&stop, timeout, 1).unwrap(), Some("one".to_string()));
        assert_eq!(reader.next_line(&stop, timeout, 1).unwrap(), Some("two".to_string()));
        assert_eq!(reader.next_line(&stop, timeout, 1).unwrap(), None);
    }

    #[test]
    fn stop_flag_interrupts() {
        let reader = LineReader::spawn(Cursor::new(""));
        let stop = AtomicBool::new(true);
        assert!(matches!(reader.next_line(&stop, Duration::from_millis(10), 4),
                         Err(RuntimeError::Interrupted { line: 4 })));
    }
}
