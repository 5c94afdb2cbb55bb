//! TaskLang lexer — source text → tokens.
//!
//! TaskLang is line-oriented: a newline terminates the current statement, and
//! a line that produced at least one token is closed with a `Newline` marker
//! (blank and comment-only lines produce nothing, so the parser never sees an
//! empty statement). Outside of string literals, tokens are whitespace
//! delimited words classified as keywords, selector kinds, numbers, or bare
//! words, so URLs, browser names, and filenames need no quoting.

use std::fmt;

use tasklang_core::TaskError;

use crate::ast::SelectorKind;

/// Source location for error reporting. Line and column are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Token kinds in TaskLang.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Open,
    Go,
    Type,
    Click,
    Enter,
    Wait,
    Screenshot,
    Close,
    In,

    // Selector kinds (`id`, `name`, `css`, `xpath`, `tag`)
    Selector(SelectorKind),

    // Literals
    Str(String),
    Number(f64),
    /// Unquoted word: a URL, browser name, or filename.
    Word(String),

    // Special
    Newline,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Open => write!(f, "open"),
            TokenKind::Go => write!(f, "go"),
            TokenKind::Type => write!(f, "type"),
            TokenKind::Click => write!(f, "click"),
            TokenKind::Enter => write!(f, "enter"),
            TokenKind::Wait => write!(f, "wait"),
            TokenKind::Screenshot => write!(f, "screenshot"),
            TokenKind::Close => write!(f, "close"),
            TokenKind::In => write!(f, "in"),
            TokenKind::Selector(kind) => write!(f, "{}", kind),
            TokenKind::Str(s) => write!(f, "\"{}\"", s),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Word(w) => write!(f, "{}", w),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its kind, literal source text, and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// The TaskLang lexer (tokenizer).
pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    file: String,
}

impl Lexer {
    pub fn new(source: &str, file: impl Into<String>) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            file: file.into(),
        }
    }

    /// Tokenize the entire source into a Vec of tokens.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, TaskError> {
        let mut tokens: Vec<Token> = Vec::new();
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Newline => {
                    // Only a line that produced tokens gets an end-of-line
                    // marker; consecutive newlines collapse.
                    let line_has_tokens =
                        matches!(tokens.last(), Some(t) if t.kind != TokenKind::Newline);
                    if line_has_tokens {
                        tokens.push(token);
                    }
                }
                TokenKind::Eof => {
                    tokens.push(token);
                    break;
                }
                _ => tokens.push(token),
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn next_token(&mut self) -> Result<Token, TaskError> {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::Eof, "", Span::new(line, column))),
        };

        match ch {
            '\n' => {
                self.advance();
                Ok(Token::new(TokenKind::Newline, "\n", Span::new(line, column)))
            }
            '#' => {
                self.skip_line_comment();
                self.next_token()
            }
            '"' => self.read_string(line, column),
            _ => self.read_word(line, column),
        }
    }

    /// Read a double-quoted string literal. No escape sequences: the literal
    /// runs to the next quote and must close before the end of the line.
    fn read_string(&mut self, line: usize, column: usize) -> Result<Token, TaskError> {
        self.advance(); // consume opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\n') | None => {
                    return Err(TaskError::lex(
                        "unterminated string literal",
                        &self.file,
                        line,
                        column,
                    ));
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
        let text = format!("\"{}\"", value);
        Ok(Token::new(TokenKind::Str(value), text, Span::new(line, column)))
    }

    /// Read a whitespace-delimited word and classify it. Keywords and selector
    /// kinds match case-insensitively; everything else becomes a number or a
    /// bare word. A quote inside a word is where a string starts, so it ends
    /// the word.
    fn read_word(&mut self, line: usize, column: usize) -> Result<Token, TaskError> {
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == '"' {
                break;
            }
            if ch.is_control() {
                return Err(TaskError::lex(
                    format!("unrecognized character {:?}", ch),
                    &self.file,
                    self.line,
                    self.column,
                ));
            }
            word.push(ch);
            self.advance();
        }

        let kind = match word.to_ascii_lowercase().as_str() {
            "open" => TokenKind::Open,
            "go" => TokenKind::Go,
            "type" => TokenKind::Type,
            "click" => TokenKind::Click,
            "enter" => TokenKind::Enter,
            "wait" => TokenKind::Wait,
            "screenshot" => TokenKind::Screenshot,
            "close" => TokenKind::Close,
            "in" => TokenKind::In,
            "id" => TokenKind::Selector(SelectorKind::Id),
            "name" => TokenKind::Selector(SelectorKind::Name),
            "css" => TokenKind::Selector(SelectorKind::Css),
            "xpath" => TokenKind::Selector(SelectorKind::Xpath),
            "tag" => TokenKind::Selector(SelectorKind::Tag),
            _ => match parse_number(&word) {
                Some(n) => TokenKind::Number(n),
                None => TokenKind::Word(word.clone()),
            },
        };

        Ok(Token::new(kind, word, Span::new(line, column)))
    }
}

/// A number is an optional sign, digits, and at most one decimal point.
/// Anything looser (URLs, version strings, IPs) stays a bare word.
fn parse_number(word: &str) -> Option<f64> {
    let digits = word.strip_prefix(['-', '+']).unwrap_or(word);
    let mut chars = digits.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut seen_dot = false;
    for c in chars {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    word.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src, "test.task");
        let tokens = lexer.tokenize().unwrap();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords() {
        let tokens = tokenize("open go type click enter wait screenshot close in");
        assert_eq!(tokens[0], TokenKind::Open);
        assert_eq!(tokens[1], TokenKind::Go);
        assert_eq!(tokens[2], TokenKind::Type);
        assert_eq!(tokens[3], TokenKind::Click);
        assert_eq!(tokens[4], TokenKind::Enter);
        assert_eq!(tokens[5], TokenKind::Wait);
        assert_eq!(tokens[6], TokenKind::Screenshot);
        assert_eq!(tokens[7], TokenKind::Close);
        assert_eq!(tokens[8], TokenKind::In);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let tokens = tokenize("OPEN Chrome\nClick CSS \".btn\"");
        assert_eq!(tokens[0], TokenKind::Open);
        assert_eq!(tokens[1], TokenKind::Word("Chrome".into()));
        assert_eq!(tokens[3], TokenKind::Click);
        assert_eq!(tokens[4], TokenKind::Selector(SelectorKind::Css));
    }

    #[test]
    fn test_selector_kinds() {
        let tokens = tokenize("id name css xpath tag");
        assert_eq!(tokens[0], TokenKind::Selector(SelectorKind::Id));
        assert_eq!(tokens[1], TokenKind::Selector(SelectorKind::Name));
        assert_eq!(tokens[2], TokenKind::Selector(SelectorKind::Css));
        assert_eq!(tokens[3], TokenKind::Selector(SelectorKind::Xpath));
        assert_eq!(tokens[4], TokenKind::Selector(SelectorKind::Tag));
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize("\"hello world\"");
        assert_eq!(tokens[0], TokenKind::Str("hello world".into()));
    }

    #[test]
    fn test_number_literals() {
        let tokens = tokenize("42 3.14 -1 +7");
        assert_eq!(tokens[0], TokenKind::Number(42.0));
        assert_eq!(tokens[1], TokenKind::Number(3.14));
        assert_eq!(tokens[2], TokenKind::Number(-1.0));
        assert_eq!(tokens[3], TokenKind::Number(7.0));
    }

    #[test]
    fn test_number_like_words_stay_words() {
        let tokens = tokenize("127.0.0.1 2fast v1.2 .5");
        assert_eq!(tokens[0], TokenKind::Word("127.0.0.1".into()));
        assert_eq!(tokens[1], TokenKind::Word("2fast".into()));
        assert_eq!(tokens[2], TokenKind::Word("v1.2".into()));
        assert_eq!(tokens[3], TokenKind::Word(".5".into()));
    }

    #[test]
    fn test_url_is_one_word() {
        let tokens = tokenize("go https://example.com/search?q=rust&page=2#results");
        assert_eq!(tokens[0], TokenKind::Go);
        assert_eq!(
            tokens[1],
            TokenKind::Word("https://example.com/search?q=rust&page=2#results".into())
        );
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = tokenize("open chrome # fire it up\nclose");
        assert_eq!(tokens[0], TokenKind::Open);
        assert_eq!(tokens[1], TokenKind::Word("chrome".into()));
        assert_eq!(tokens[2], TokenKind::Newline);
        assert_eq!(tokens[3], TokenKind::Close);
        assert_eq!(tokens[4], TokenKind::Eof);
    }

    #[test]
    fn test_blank_lines_produce_no_markers() {
        let tokens = tokenize("open chrome\n\n\n# just a comment\n\nclose\n");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Open,
                TokenKind::Word("chrome".into()),
                TokenKind::Newline,
                TokenKind::Close,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_source() {
        let tokens = tokenize("");
        assert_eq!(tokens, vec![TokenKind::Eof]);
    }

    #[test]
    fn test_whitespace_only_source() {
        let tokens = tokenize("  \t\n   \n");
        assert_eq!(tokens, vec![TokenKind::Eof]);
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("open chrome\ntype \"never closed", "test.task");
        let err = lexer.tokenize().unwrap_err();
        match err {
            tasklang_core::TaskError::Lex { line, .. } => assert_eq!(line, 2),
            other => panic!("expected lex error, got {:?}", other),
        }
    }

    #[test]
    fn test_string_may_not_span_lines() {
        let mut lexer = Lexer::new("type \"first\nsecond\"", "test.task");
        assert!(lexer.tokenize().is_err());
    }

    #[test]
    fn test_control_character_rejected() {
        let mut lexer = Lexer::new("open chr\u{7}ome", "test.task");
        assert!(lexer.tokenize().is_err());
    }

    #[test]
    fn test_tokens_carry_line_numbers() {
        let mut lexer = Lexer::new("open chrome\nwait 2\nclose", "test.task");
        let tokens = lexer.tokenize().unwrap();
        let wait = tokens.iter().find(|t| t.kind == TokenKind::Wait).unwrap();
        assert_eq!(wait.span.line, 2);
        let close = tokens.iter().find(|t| t.kind == TokenKind::Close).unwrap();
        assert_eq!(close.span.line, 3);
    }

    #[test]
    fn test_relexing_literals_is_stable() {
        let src = "open chrome\ngo https://example.com/\ntype \"hi there\" in name \"q\"\nwait 1.5\nclose\n";
        let mut lexer = Lexer::new(src, "test.task");
        let first = lexer.tokenize().unwrap();

        let rebuilt: String = first
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let mut lexer = Lexer::new(&rebuilt, "test.task");
        let second = lexer.tokenize().unwrap();

        let kinds = |tokens: &[Token]| tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>();
        assert_eq!(kinds(&first), kinds(&second));
    }
}
