//! TaskLang parser — tokens → AST.
//!
//! Recursive descent over a line-oriented grammar: every statement starts
//! with a keyword and runs to the end of its line. The parser stops at the
//! first grammar violation; statements are independent, so a partial AST has
//! no downstream use.

use tasklang_core::TaskError;

use crate::ast::{Program, Selector, Statement};
use crate::lexer::{Span, Token, TokenKind};

/// The TaskLang parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: String,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: impl Into<String>) -> Self {
        Self {
            tokens,
            pos: 0,
            file: file.into(),
        }
    }

    /// Parse the token stream into a Program.
    pub fn parse(&mut self) -> Result<Program, TaskError> {
        let mut statements = Vec::new();
        while self.peek() != &TokenKind::Eof {
            let statement = self.parse_statement()?;
            self.expect_end_of_line()?;
            statements.push(statement);
        }
        Ok(Program { statements })
    }

    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span)
            .unwrap_or(Span::new(1, 1))
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, expected: &str) -> TaskError {
        let span = self.current_span();
        TaskError::syntax(
            format!("expected {}, got {}", expected, self.peek()),
            &self.file,
            span.line,
            span.column,
        )
    }

    /// Each statement occupies exactly one logical line; trailing tokens on
    /// the same line are a syntax error.
    fn expect_end_of_line(&mut self) -> Result<(), TaskError> {
        match self.peek() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.error("end of line")),
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, TaskError> {
        let span = self.current_span();
        match self.peek() {
            TokenKind::Open => self.parse_open(span),
            TokenKind::Go => self.parse_go(span),
            TokenKind::Type => self.parse_type(span),
            TokenKind::Click => self.parse_click(span),
            TokenKind::Enter => self.parse_enter(span),
            TokenKind::Wait => self.parse_wait(span),
            TokenKind::Screenshot => self.parse_screenshot(span),
            TokenKind::Close => {
                self.advance();
                Ok(Statement::Close { span })
            }
            _ => Err(self.error("a statement keyword")),
        }
    }

    /// `open BROWSER`
    fn parse_open(&mut self, span: Span) -> Result<Statement, TaskError> {
        self.advance();
        let browser = self.expect_word("a browser name after 'open'")?;
        Ok(Statement::Open { browser, span })
    }

    /// `go URL`
    fn parse_go(&mut self, span: Span) -> Result<Statement, TaskError> {
        self.advance();
        let url = self.expect_text("a URL after 'go'")?;
        Ok(Statement::Go { url, span })
    }

    /// `type STRING ["in" selector]`
    fn parse_type(&mut self, span: Span) -> Result<Statement, TaskError> {
        self.advance();
        let text = self.expect_string("a string literal after 'type'")?;
        let target = if self.peek() == &TokenKind::In {
            self.advance();
            Some(self.parse_selector()?)
        } else {
            None
        };
        Ok(Statement::Type { text, target, span })
    }

    /// `click [selector]`
    fn parse_click(&mut self, span: Span) -> Result<Statement, TaskError> {
        self.advance();
        let target = if matches!(self.peek(), TokenKind::Selector(_)) {
            Some(self.parse_selector()?)
        } else {
            None
        };
        Ok(Statement::Click { target, span })
    }

    /// `enter ["in" selector]`
    fn parse_enter(&mut self, span: Span) -> Result<Statement, TaskError> {
        self.advance();
        let target = if self.peek() == &TokenKind::In {
            self.advance();
            Some(self.parse_selector()?)
        } else {
            None
        };
        Ok(Statement::Enter { target, span })
    }

    /// `wait NUMBER`
    fn parse_wait(&mut self, span: Span) -> Result<Statement, TaskError> {
        self.advance();
        let seconds = match self.peek() {
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                n
            }
            _ => return Err(self.error("a number after 'wait'")),
        };
        Ok(Statement::Wait { seconds, span })
    }

    /// `screenshot FILENAME`
    fn parse_screenshot(&mut self, span: Span) -> Result<Statement, TaskError> {
        self.advance();
        let filename = self.expect_text("a filename after 'screenshot'")?;
        Ok(Statement::Screenshot { filename, span })
    }

    /// `selector := SELECTOR_KIND STRING`
    fn parse_selector(&mut self) -> Result<Selector, TaskError> {
        let kind = match self.peek() {
            TokenKind::Selector(kind) => {
                let kind = *kind;
                self.advance();
                kind
            }
            _ => return Err(self.error("a selector kind (id, name, css, xpath, or tag)")),
        };
        let value = self.expect_string(&format!("a string value after '{}'", kind))?;
        Ok(Selector { kind, value })
    }

    fn expect_word(&mut self, expected: &str) -> Result<String, TaskError> {
        match self.peek() {
            TokenKind::Word(w) => {
                let w = w.clone();
                self.advance();
                Ok(w)
            }
            _ => Err(self.error(expected)),
        }
    }

    /// A bare word or a quoted string; URLs and filenames may be either.
    fn expect_text(&mut self, expected: &str) -> Result<String, TaskError> {
        match self.peek() {
            TokenKind::Word(w) => {
                let w = w.clone();
                self.advance();
                Ok(w)
            }
            TokenKind::Str(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.error(expected)),
        }
    }

    fn expect_string(&mut self, expected: &str) -> Result<String, TaskError> {
        match self.peek() {
            TokenKind::Str(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.error(expected)),
        }
    }
}
