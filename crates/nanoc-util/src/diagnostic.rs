//! Diagnostic collection.
//!
//! Every stage of the pipeline fails fast (see `CompileError` in `nanoc-drv`),
//! but while a stage is still searching for the first error it reports
//! through a [`Handler`] so the final message carries a span and a
//! stage-appropriate message, not just a bare enum variant.

use crate::Span;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic message tied to a source location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            span,
        }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (line {})",
            self.level, self.message, self.span.line
        )
    }
}

/// Collects diagnostics emitted while a stage runs.
///
/// # Examples
///
/// ```
/// use nanoc_util::{Handler, Span};
///
/// let handler = Handler::new();
/// handler.error("unexpected character '@'", Span::DUMMY);
/// assert!(handler.has_errors());
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.diagnostics
            .borrow_mut()
            .push(Diagnostic::error(message, span));
    }

    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.diagnostics
            .borrow_mut()
            .push(Diagnostic::warning(message, span));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Returns the first error diagnostic, if any — the one a fail-fast
    /// pipeline should surface to the caller.
    pub fn first_error(&self) -> Option<Diagnostic> {
        self.diagnostics
            .borrow()
            .iter()
            .find(|d| d.level == Level::Error)
            .cloned()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_no_errors() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
    }

    #[test]
    fn counts_only_errors_not_warnings() {
        let handler = Handler::new();
        handler.warning("unused", Span::DUMMY);
        assert!(!handler.has_errors());
        handler.error("bad", Span::DUMMY);
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn first_error_is_earliest_reported() {
        let handler = Handler::new();
        handler.error("first", Span::DUMMY);
        handler.error("second", Span::DUMMY);
        assert_eq!(handler.first_error().unwrap().message, "first");
    }
}
