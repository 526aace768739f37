//! Structured diagnostic events.
//!
//! The readers report recoverable problems (skipped thermo data, ignored
//! lines, duplicate marking) as events. Every event is forwarded to the `log`
//! facade as well, so a binary with a logger installed sees them as usual,
//! while library callers and tests can inspect the exact messages.
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

/// collector of diagnostic events emitted during one read or write
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Debug => debug!("{}", message),
            Level::Info => info!("{}", message),
            Level::Warning => warn!("{}", message),
        }
        self.events.push(Diagnostic { level, message });
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.emit(Level::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.emit(Level::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.emit(Level::Warning, message);
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// messages of the given level in emission order
    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn last(&self, level: Level) -> Option<&str> {
        self.events
            .iter()
            .rev()
            .find(|e| e.level == level)
            .map(|e| e.message.as_str())
    }

    pub fn last_warning(&self) -> Option<&str> {
        self.last(Level::Warning)
    }

    pub fn last_info(&self) -> Option<&str> {
        self.last(Level::Info)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());
        diag.info("first");
        diag.warning("second");
        diag.warning("third");
        diag.debug("fourth");
        assert_eq!(diag.events().len(), 4);
        assert_eq!(diag.messages(Level::Warning), vec!["second", "third"]);
        assert_eq!(diag.last_warning(), Some("third"));
        assert_eq!(diag.last_info(), Some("first"));
        diag.clear();
        assert_eq!(diag.last_warning(), None);
    }
}
