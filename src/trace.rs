//! Diagnostic tracing of a parse
//!
//! A [`Tracer`] is handed to the [`Parser`](crate::parser::Parser) when it is built and
//! receives one [`TraceEvent`] per interesting step: tokens produced, nodes entered,
//! values yielded, results accepted or discarded. Tracing never influences results.
//!
//! - [`NoopTracer`] drops everything (the default).
//! - [`LogTracer`] forwards each event as a line to the `log` facade.
//! - [`TraceLog`] keeps the lines in memory.

use std::fmt;
use std::sync::Mutex;

use crate::lexing::Token;

/// Log target used by [`LogTracer`]
pub const LOG_TARGET: &str = "grammar_parser";

/// One step of a parse
#[derive(Clone, Copy)]
pub enum TraceEvent<'e> {
    /// The tokenizer produced a token
    Token(&'e Token),
    /// Input remained that no token type matches
    TokenizeFailed { offset: usize, remaining: &'e str },
    /// A node started producing results; `at` is the last consumed token
    Enter { node: &'e str, at: Option<&'e Token> },
    /// A node produced a value
    Yield {
        node: &'e str,
        at: Option<&'e Token>,
        value: &'e dyn fmt::Debug,
    },
    /// A node has no further results
    Reject { node: &'e str, at: Option<&'e Token> },
    /// A root result consumed every token
    Accept { value: &'e dyn fmt::Debug },
    /// A root result left tokens unconsumed
    Discard {
        value: &'e dyn fmt::Debug,
        unparsed: &'e [Token],
    },
}

struct At<'e>(Option<&'e Token>);

impl fmt::Display for At<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(token) => write!(f, "@{:?}", token.text()),
            None => write!(f, "@^"),
        }
    }
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TraceEvent::Token(token) => write!(f, "token {}", token),
            TraceEvent::TokenizeFailed { offset, remaining } => {
                write!(f, "tokenize failed at byte {}: {:?}", offset, remaining)
            }
            TraceEvent::Enter { node, at } => write!(f, "{}\t{} enter", At(at), node),
            TraceEvent::Yield { node, at, value } => {
                write!(f, "{}\t{} yields {:?}", At(at), node, value)
            }
            TraceEvent::Reject { node, at } => write!(f, "{}\t{} yields nothing more", At(at), node),
            TraceEvent::Accept { value } => write!(f, "accept {:?}", value),
            TraceEvent::Discard { value, unparsed } => {
                write!(f, "discard {:?}, unparsed:", value)?;
                for token in unparsed {
                    write!(f, " {}", token)?;
                }
                Ok(())
            }
        }
    }
}

/// Receiver of parse diagnostics
pub trait Tracer: Send + Sync {
    /// Whether events should be built at all; lets the engine skip formatting work
    fn enabled(&self) -> bool {
        true
    }

    fn trace(&self, event: TraceEvent<'_>);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn enabled(&self) -> bool {
        false
    }

    fn trace(&self, _event: TraceEvent<'_>) {}
}

/// Forwards events to `log::debug!` under [`LOG_TARGET`]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn enabled(&self) -> bool {
        log::log_enabled!(target: LOG_TARGET, log::Level::Debug)
    }

    fn trace(&self, event: TraceEvent<'_>) {
        log::debug!(target: LOG_TARGET, "{}", event);
    }
}

/// Records every event as a line of text
#[derive(Debug, Default)]
pub struct TraceLog {
    lines: Mutex<Vec<String>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl Tracer for TraceLog {
    fn trace(&self, event: TraceEvent<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(event.to_string());
        }
    }
}

impl<T: Tracer + ?Sized> Tracer for std::sync::Arc<T> {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn trace(&self, event: TraceEvent<'_>) {
        (**self).trace(event)
    }
}
