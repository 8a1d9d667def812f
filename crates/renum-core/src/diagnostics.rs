use std::sync::{Mutex, PoisonError};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// A diagnostic about a declaration, attached to the type or value it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn info(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Trait for handling diagnostics
/// This allows for dependency injection and testing with collecting handlers
pub trait DiagnosticHandler: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);

    fn error(&self, subject: &str, message: &str) {
        self.report(Diagnostic::error(subject, message));
    }

    fn warning(&self, subject: &str, message: &str) {
        self.report(Diagnostic::warning(subject, message));
    }

    fn info(&self, subject: &str, message: &str) {
        self.report(Diagnostic::info(subject, message));
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    fn warning_count(&self) -> usize {
        self.count(DiagnosticLevel::Warning)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.get_diagnostics()
            .iter()
            .filter(|d| d.level == level)
            .count()
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic>;
}

/// Console-based diagnostic handler that prints to stderr
pub struct ConsoleDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
    pretty: bool,
}

impl ConsoleDiagnosticHandler {
    pub fn new(pretty: bool) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            pretty,
        }
    }
}

impl DiagnosticHandler for ConsoleDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
        };

        if self.pretty {
            eprintln!(
                "\x1b[1m{}\x1b[0m in {}: {}",
                level_str, diagnostic.subject, diagnostic.message
            );
        } else {
            eprintln!(
                "{} in {}: {}",
                level_str, diagnostic.subject, diagnostic.message
            );
        }

        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Collecting diagnostic handler for testing
/// Collects all diagnostics without printing
#[derive(Default)]
pub struct CollectingDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnosticHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticHandler for CollectingDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::error("Size", "Test error");

        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.subject, "Size");
        assert_eq!(diag.message, "Test error");
    }

    #[test]
    fn test_collecting_handler() {
        let handler = CollectingDiagnosticHandler::new();

        handler.error("Size", "Error 1");
        handler.warning("Size::Small", "Warning 1");
        handler.error("Rating", "Error 2");

        assert_eq!(handler.error_count(), 2);
        assert_eq!(handler.warning_count(), 1);
        assert!(handler.has_errors());
        assert_eq!(handler.get_diagnostics().len(), 3);
    }

    #[test]
    fn test_no_errors() {
        let handler = CollectingDiagnosticHandler::new();

        handler.warning("Size", "Warning 1");
        handler.info("Size", "Info 1");

        assert!(!handler.has_errors());
        assert_eq!(handler.error_count(), 0);
    }
}
