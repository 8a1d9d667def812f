//! Mock implementations for testing

use renum_core::diagnostics::{Diagnostic, DiagnosticHandler, DiagnosticLevel};
use renum_core::{EnumFactory, FactoryConfig};
use std::sync::{Arc, Mutex, PoisonError};

/// A diagnostic handler that records everything it is given
#[derive(Debug, Default)]
pub struct MockDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MockDiagnosticHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Messages reported at `level`, in report order
    pub fn messages(&self, level: DiagnosticLevel) -> Vec<String> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.level == level)
            .map(|d| d.message.clone())
            .collect()
    }
}

impl DiagnosticHandler for MockDiagnosticHandler {
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

/// A factory with the default config that reports into a mock handler
pub fn mock_factory() -> (EnumFactory, Arc<MockDiagnosticHandler>) {
    mock_factory_with(FactoryConfig::default())
}

pub fn mock_factory_with(config: FactoryConfig) -> (EnumFactory, Arc<MockDiagnosticHandler>) {
    let handler = MockDiagnosticHandler::new();
    let factory = EnumFactory::with_dependencies(config, handler.clone());
    (factory, handler)
}
