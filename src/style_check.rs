//! Static checks over stylesheet files.
//!
//! Two independent passes, both always run:
//!   - a structural scan (comment- and string-aware) that walks the rule
//!     nesting and flags declarations without a `:` separator, an unexpected
//!     closing brace, or a block left open at end of input;
//!   - a line-based brace-balance scan that flags stray content between
//!     rules and a nonzero final brace counter.
//!
//! Both are heuristics over the author's text, not a CSS grammar.

use crate::log::{Level, LogEntry};

pub fn check_stylesheet(path: &str, content: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();

    if let Err(failure) = validate_structure(content) {
        entries.push(
            LogEntry::new(Level::Error, "css", failure.message).at(path, failure.line, 1),
        );
    }

    entries.extend(brace_scan(path, content));
    entries
}

struct StructureError {
    message: String,
    line: u32,
}

/// Walk the stylesheet tracking brace nesting, comments, strings and paren
/// groups. Stops at the first structural fault.
fn validate_structure(content: &str) -> Result<(), StructureError> {
    let mut depth: i32 = 0;
    let mut parens: i32 = 0;
    let mut line: u32 = 1;
    let mut in_comment = false;
    let mut in_string: Option<char> = None;
    let mut chunk = String::new();
    let mut chunk_line: u32 = 1;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
            }
            continue;
        }

        if let Some(quote) = in_string {
            chunk.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    chunk.push(escaped);
                    if escaped == '\n' {
                        line += 1;
                    }
                }
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_comment = true;
            }
            '"' | '\'' => {
                in_string = Some(c);
                chunk.push(c);
            }
            '(' => {
                parens += 1;
                chunk.push(c);
            }
            ')' => {
                parens -= 1;
                chunk.push(c);
            }
            '{' => {
                // Everything gathered so far is the rule prelude.
                chunk.clear();
                depth += 1;
            }
            '}' => {
                check_declaration(&chunk, chunk_line, depth)?;
                chunk.clear();
                depth -= 1;
                if depth < 0 {
                    return Err(StructureError {
                        message: "Unexpected '}' with no open rule".to_string(),
                        line,
                    });
                }
            }
            ';' if parens == 0 => {
                check_declaration(&chunk, chunk_line, depth)?;
                chunk.clear();
            }
            _ => {
                if chunk.trim().is_empty() && !c.is_whitespace() {
                    chunk_line = line;
                }
                chunk.push(c);
            }
        }
    }

    if depth > 0 {
        return Err(StructureError {
            message: "Block not closed before end of stylesheet".to_string(),
            line,
        });
    }

    Ok(())
}

fn check_declaration(chunk: &str, line: u32, depth: i32) -> Result<(), StructureError> {
    if depth <= 0 {
        return Ok(());
    }
    let trimmed = chunk.trim();
    if trimmed.is_empty() || trimmed.starts_with('@') || trimmed.contains(':') {
        return Ok(());
    }
    Err(StructureError {
        message: format!("Declaration missing ':' separator: \"{}\"", trimmed),
        line,
    })
}

/// Line-based brace counter. A line seen while the counter is zero must look
/// like a prelude, an at-rule or a comment edge; anything else is content
/// outside of a rule. A nonzero final counter means the braces never matched.
fn brace_scan(path: &str, content: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    let mut depth: i32 = 0;

    for (index, raw_line) in content.lines().enumerate() {
        let trimmed = raw_line.trim();
        if depth == 0
            && !trimmed.is_empty()
            && !trimmed.starts_with('@')
            && !trimmed.starts_with("/*")
            && !trimmed.starts_with("*/")
            && !trimmed.contains(':')
            && !trimmed.contains('{')
            && !trimmed.contains('}')
        {
            entries.push(
                LogEntry::new(Level::Error, "css", "Unexpected content outside of a rule")
                    .at(path, (index + 1) as u32, 1),
            );
        }
        for c in raw_line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }
    }

    if depth != 0 {
        entries.push(
            LogEntry::new(Level::Error, "css", "Mismatched braces in stylesheet").at(path, 0, 0),
        );
    }

    entries
}
