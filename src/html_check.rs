//! Static checks over markup files.
//!
//! These are raw-text heuristics on purpose. A conforming HTML parser
//! silently repairs the exact mistakes this pass exists to surface (a stray
//! closing tag, a never-closed `<script>`), so tags are counted in the
//! author's text rather than in a recovered DOM.
//!
//! All checks run independently per file, in this order:
//!   1. misspelled "scirpt" tag (one whole-file error)
//!   2. script-open vs script-close count imbalance
//!   3. non-whitespace content after the final `</html>`
//!   4. each inline script block parsed as a standalone unit
//!   5. `<html` vs `</html` count imbalance

use lazy_static::lazy_static;
use regex::Regex;

use crate::log::{Level, LogEntry};
use crate::syntax;

lazy_static! {
    static ref MISSPELLED_SCRIPT_RE: Regex = Regex::new(r"(?i)</?scirpt\b").unwrap();
    static ref SCRIPT_OPEN_RE: Regex = Regex::new(r"(?i)<script\b").unwrap();
    static ref SCRIPT_CLOSE_RE: Regex = Regex::new(r"(?i)</script\b").unwrap();
    /// Inline block extraction; lazy body match so sibling blocks stay separate.
    static ref INLINE_SCRIPT_RE: Regex =
        Regex::new(r"(?is)<script\b([^>]*)>([\s\S]*?)</script>").unwrap();
    static ref HTML_OPEN_RE: Regex = Regex::new(r"(?i)<html\b").unwrap();
    static ref HTML_CLOSE_RE: Regex = Regex::new(r"(?i)</html\b").unwrap();
    static ref HTML_CLOSE_TAG_RE: Regex = Regex::new(r"(?i)</html\s*>").unwrap();
}

pub fn check_html(path: &str, content: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();

    if MISSPELLED_SCRIPT_RE.is_match(content) {
        entries.push(
            LogEntry::new(
                Level::Error,
                "html",
                "Misspelled tag \"scirpt\" found. Did you mean \"script\"?",
            )
            .at(path, 0, 0),
        );
    }

    let opens = SCRIPT_OPEN_RE.find_iter(content).count();
    let closes = SCRIPT_CLOSE_RE.find_iter(content).count();
    if opens != closes {
        entries.push(
            LogEntry::new(
                Level::Error,
                "html",
                format!(
                    "Unbalanced script tags: {} opening vs {} closing",
                    opens, closes
                ),
            )
            .at(path, 0, 0),
        );
    }

    if let Some(close) = HTML_CLOSE_TAG_RE.find_iter(content).last() {
        if !content[close.end()..].trim().is_empty() {
            entries.push(
                LogEntry::new(
                    Level::Warn,
                    "html",
                    "Content found after closing </html> tag",
                )
                .at(path, 0, 0),
            );
        }
    }

    // TODO: map inline-block line numbers back to the enclosing document once
    // the terminal pane can jump to a position inside an HTML file.
    for (index, caps) in INLINE_SCRIPT_RE.captures_iter(content).enumerate() {
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        if body.trim().is_empty() {
            continue;
        }
        if let Err(failure) = syntax::validate_script(body) {
            entries.push(
                LogEntry::new(
                    Level::Error,
                    "html-inline-js",
                    format!("Inline script #{}: {}", index + 1, failure.message),
                )
                .at(path, failure.line, failure.column)
                .with_stack(failure.stack),
            );
        }
    }

    let html_opens = HTML_OPEN_RE.find_iter(content).count();
    let html_closes = HTML_CLOSE_RE.find_iter(content).count();
    if html_opens != html_closes {
        entries.push(
            LogEntry::new(
                Level::Error,
                "html",
                format!(
                    "Unbalanced html tags: {} opening vs {} closing",
                    html_opens, html_closes
                ),
            )
            .at(path, 0, 0),
        );
    }

    entries
}
