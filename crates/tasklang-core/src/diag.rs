//! Compile-time diagnostics.
//!
//! The semantic analyzer aggregates diagnostics so a user sees every operand
//! problem in one pass; the lexer and parser fail fast but their errors render
//! through the same `Diagnostic` surface in the front end.

use serde::Serialize;

use crate::error::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A structured compile-time message with source line and severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub file: String,
    pub line: usize,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        };
        write!(f, "{prefix}: {} at {}:{}", self.message, self.file, self.line)
    }
}

impl Diagnostic {
    /// Render a fail-fast pipeline error as a diagnostic. Only errors that
    /// carry a source location (lex and syntax errors) convert.
    pub fn from_error(err: &TaskError) -> Option<Self> {
        match err {
            TaskError::Lex {
                message,
                file,
                line,
                ..
            }
            | TaskError::Syntax {
                message,
                file,
                line,
                ..
            } => Some(Diagnostic {
                severity: DiagnosticSeverity::Error,
                message: message.clone(),
                file: file.clone(),
                line: *line,
            }),
            _ => None,
        }
    }
}

/// Ordered accumulator for diagnostics. Insertion order is preserved, so
/// diagnostics come out in source order when statements are checked in source
/// order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: DiagnosticSeverity, message: impl Into<String>, file: impl Into<String>, line: usize) {
        self.entries.push(Diagnostic {
            severity,
            message: message.into(),
            file: file.into(),
            line,
        });
    }

    pub fn error(&mut self, message: impl Into<String>, file: impl Into<String>, line: usize) {
        self.push(DiagnosticSeverity::Error, message, file, line);
    }

    pub fn warning(&mut self, message: impl Into<String>, file: impl Into<String>, line: usize) {
        self.push(DiagnosticSeverity::Warning, message, file, line);
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// `Ok` when no error-severity entry was recorded (warnings and info are
    /// carried along either way).
    pub fn into_result(self) -> Result<Vec<Diagnostic>, Vec<Diagnostic>> {
        if self.has_errors() {
            Err(self.entries)
        } else {
            Ok(self.entries)
        }
    }
}
