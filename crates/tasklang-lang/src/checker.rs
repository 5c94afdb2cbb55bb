//! Semantic validation of parsed TaskLang programs.
//!
//! Each statement is checked independently against its command's operand
//! rules; there are no cross-statement checks (a script without `close` is
//! valid; session teardown belongs to the script's runtime). Diagnostics are
//! aggregated so the user sees every operand problem in one pass.

use tasklang_core::{Diagnostic, Diagnostics};

use crate::ast::{Program, Selector, Statement};
use crate::lexer::Span;

/// Browsers the generated script knows how to open.
const KNOWN_BROWSERS: [&str; 4] = ["chrome", "firefox", "edge", "safari"];

/// Extensions a screenshot filename is expected to end with.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// The TaskLang semantic analyzer.
pub struct Checker {
    diagnostics: Diagnostics,
    file: String,
}

impl Checker {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            diagnostics: Diagnostics::new(),
            file: file.into(),
        }
    }

    /// Run the checker on a parsed program. `Ok` carries warnings and info
    /// (generation may proceed); `Err` contains at least one error and the
    /// caller must not emit an artifact. Statements are visited in source
    /// order and diagnostics preserve that order.
    pub fn check(mut self, program: &Program) -> Result<Vec<Diagnostic>, Vec<Diagnostic>> {
        for statement in &program.statements {
            self.check_statement(statement);
        }
        self.diagnostics.into_result()
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.error(message, self.file.as_str(), span.line);
    }

    fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.warning(message, self.file.as_str(), span.line);
    }

    fn check_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Open { browser, span } => {
                if !KNOWN_BROWSERS.contains(&browser.to_ascii_lowercase().as_str()) {
                    self.error(
                        format!(
                            "unknown browser '{}' (expected one of: chrome, firefox, edge, safari)",
                            browser
                        ),
                        *span,
                    );
                }
            }
            Statement::Go { url, span } => {
                // Malformed URLs are a runtime concern; only emptiness is
                // checked here.
                if url.is_empty() {
                    self.error("navigation target is empty", *span);
                }
            }
            Statement::Type { target, span, .. } => self.check_target(target, *span),
            Statement::Click { target, span } => self.check_target(target, *span),
            Statement::Enter { target, span } => self.check_target(target, *span),
            Statement::Wait { seconds, span } => {
                if *seconds < 0.0 {
                    self.error(
                        format!("wait duration must be non-negative, got {}", seconds),
                        *span,
                    );
                }
            }
            Statement::Screenshot { filename, span } => {
                if filename.is_empty() {
                    self.error("screenshot filename is empty", *span);
                } else if !has_image_extension(filename) {
                    self.warning(
                        format!(
                            "screenshot filename '{}' does not end in a recognized image extension",
                            filename
                        ),
                        *span,
                    );
                }
            }
            Statement::Close { .. } => {}
        }
    }

    /// The selector kind is a closed enum after parsing, so only the value
    /// needs validating.
    fn check_target(&mut self, target: &Option<Selector>, span: Span) {
        if let Some(selector) = target {
            if selector.value.is_empty() {
                self.error(
                    format!("{} selector has an empty value", selector.kind),
                    span,
                );
            }
        }
    }
}

fn has_image_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
