//! Core error types for the TaskLang compiler.

/// A specialized Result type for TaskLang operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// Top-level error type encompassing all compiler stages.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("lex error: {message} at {file}:{line}:{column}")]
    Lex {
        message: String,
        file: String,
        line: usize,
        column: usize,
    },

    #[error("syntax error: {message} at {file}:{line}:{column}")]
    Syntax {
        message: String,
        file: String,
        line: usize,
        column: usize,
    },

    #[error("semantic error: {0}")]
    Semantic(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl TaskError {
    /// Create a lex error with source location.
    pub fn lex(
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        TaskError::Lex {
            message: message.into(),
            file: file.into(),
            line,
            column,
        }
    }

    /// Create a syntax error with source location.
    pub fn syntax(
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        TaskError::Syntax {
            message: message.into(),
            file: file.into(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let err = TaskError::lex("unterminated string literal", "demo.task", 3, 14);
        assert_eq!(
            err.to_string(),
            "lex error: unterminated string literal at demo.task:3:14"
        );
    }

    #[test]
    fn test_syntax_error_display() {
        let err = TaskError::syntax("expected end of line, got close", "demo.task", 1, 12);
        assert_eq!(
            err.to_string(),
            "syntax error: expected end of line, got close at demo.task:1:12"
        );
    }
}
