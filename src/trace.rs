//! Diagnostic trace sink
//!
//! The parser reports block bookkeeping (indent pushes, pops and dedent
//! resolution) to a `TraceSink` handed to it by the caller. Nothing is
//! global: the default sink drops every event, and the CLI opts into
//! colored stderr output with `--trace`.

use colored::Colorize;

/// Receiver for pipeline trace events
pub trait TraceSink {
    /// Record one event emitted by `stage`
    fn event(&mut self, stage: &str, message: &str);
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn event(&mut self, _stage: &str, _message: &str) {}
}

/// Writes events to stderr, stage tag highlighted
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrTrace;

impl TraceSink for StderrTrace {
    fn event(&mut self, stage: &str, message: &str) {
        eprintln!("{} {}", format!("[{}]", stage).cyan().bold(), message);
    }
}

/// Keeps events in memory as `stage: message` lines
#[derive(Debug, Default, Clone)]
pub struct MemoryTrace {
    pub events: Vec<String>,
}

impl TraceSink for MemoryTrace {
    fn event(&mut self, stage: &str, message: &str) {
        self.events.push(format!("{}: {}", stage, message));
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn event(&mut self, stage: &str, message: &str) {
        (**self).event(stage, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_trace_records_in_order() {
        let mut trace = MemoryTrace::default();
        trace.event("indent", "push 2");
        trace.event("indent", "pop 2");
        assert_eq!(trace.events, vec!["indent: push 2", "indent: pop 2"]);
    }

    #[test]
    fn test_borrowed_sink_forwards() {
        fn forward(mut sink: impl TraceSink) {
            sink.event("parse", "start");
        }

        let mut trace = MemoryTrace::default();
        forward(&mut trace);
        assert_eq!(trace.events, vec!["parse: start"]);
    }
}
