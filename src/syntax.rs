//! Syntax validation capability over script source text.
//!
//! Validate-only front-end: the source is parsed, never executed. A failure
//! comes back as a structured [`ParseFailure`] with the parser's message, a
//! 1-based line/column when the diagnostic carries a span, and the
//! diagnostic's debug rendering as a best-effort trace.

use std::fmt;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
    /// 1-based, 0 when the diagnostic carries no location.
    pub line: u32,
    pub column: u32,
    pub stack: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{} ({}:{})", self.message, self.line, self.column)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Parse `source` as a standalone executable unit. Returns the first
/// diagnostic as a failure; recoverable later errors are not enumerated.
pub fn validate_script(source: &str) -> Result<(), ParseFailure> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true);
    let ret = Parser::new(&allocator, source, source_type).parse();

    if let Some(error) = ret.errors.first() {
        let offset = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset());
        let (line, column) = match offset {
            Some(o) => line_col_at(source, o),
            None => (0, 0),
        };
        return Err(ParseFailure {
            message: error.message.to_string(),
            line,
            column,
            stack: format!("{:?}", error),
        });
    }

    if ret.panicked {
        return Err(ParseFailure {
            message: "Parser could not recover from the input".to_string(),
            line: 0,
            column: 0,
            stack: String::new(),
        });
    }

    Ok(())
}

/// 1-based line/column for a byte offset. Column counts bytes since the last
/// newline, which matches the parser's ASCII-heavy diagnostics closely enough
/// for a preflight hint.
fn line_col_at(source: &str, offset: usize) -> (u32, u32) {
    let bytes = &source.as_bytes()[..offset.min(source.len())];
    let line = bytes.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let column = bytes.iter().rev().take_while(|&&b| b != b'\n').count() as u32 + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_script_passes() {
        assert!(validate_script("let x = 1;\nconsole.log(x);").is_ok());
        assert!(validate_script("").is_ok());
        assert!(validate_script("function f(a, b) { return a + b; }").is_ok());
    }

    #[test]
    fn test_unterminated_declaration_fails() {
        let failure = validate_script("let x = ").unwrap_err();
        assert!(!failure.message.is_empty());
    }

    #[test]
    fn test_unmatched_paren_fails_with_location() {
        let failure = validate_script("console.log(1;\n").unwrap_err();
        assert!(failure.line >= 1);
    }

    #[test]
    fn test_line_col_at() {
        assert_eq!(line_col_at("abc", 0), (1, 1));
        assert_eq!(line_col_at("abc", 2), (1, 3));
        assert_eq!(line_col_at("a\nbc", 2), (2, 1));
        assert_eq!(line_col_at("a\nbc", 3), (2, 2));
    }
}
