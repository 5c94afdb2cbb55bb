//! TaskLang Abstract Syntax Tree (AST).
//!
//! A program is an ordered sequence of statements, one per source line. The
//! parser builds it once; the checker and the code generator only read it.

use std::fmt;

use crate::lexer::Span;

/// How a target element is located by the automation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Id,
    Name,
    Css,
    Xpath,
    Tag,
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorKind::Id => write!(f, "id"),
            SelectorKind::Name => write!(f, "name"),
            SelectorKind::Css => write!(f, "css"),
            SelectorKind::Xpath => write!(f, "xpath"),
            SelectorKind::Tag => write!(f, "tag"),
        }
    }
}

/// A (kind, value) pair identifying a page element.
///
/// A `Css` value may hold several comma-separated alternatives; that
/// convention is interpreted by the code generator, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub kind: SelectorKind,
    pub value: String,
}

/// A single automation statement.
///
/// Where the target selector is optional, its absence means "act on whatever
/// element currently has focus", which the code generator resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `open BROWSER`
    Open { browser: String, span: Span },
    /// `go URL`
    Go { url: String, span: Span },
    /// `type "text" [in selector]`
    Type {
        text: String,
        target: Option<Selector>,
        span: Span,
    },
    /// `click [selector]`
    Click {
        target: Option<Selector>,
        span: Span,
    },
    /// `enter [in selector]`
    Enter {
        target: Option<Selector>,
        span: Span,
    },
    /// `wait SECONDS`
    Wait { seconds: f64, span: Span },
    /// `screenshot FILENAME`
    Screenshot { filename: String, span: Span },
    /// `close`
    Close { span: Span },
}

impl Statement {
    /// Source location of the statement's leading keyword.
    pub fn span(&self) -> Span {
        match self {
            Statement::Open { span, .. }
            | Statement::Go { span, .. }
            | Statement::Type { span, .. }
            | Statement::Click { span, .. }
            | Statement::Enter { span, .. }
            | Statement::Wait { span, .. }
            | Statement::Screenshot { span, .. }
            | Statement::Close { span } => *span,
        }
    }
}

/// A parsed TaskLang program. Statement order equals source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}
