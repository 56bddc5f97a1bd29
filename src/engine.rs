//! Diagnostics engine: scans every file in the project and feeds the sink.
//!
//! Dispatch is by path suffix: `.html` markup checks, `.js` syntax checks,
//! `.css` stylesheet checks. Directories and other extensions are skipped.
//! One file's checker must never block diagnostics for the files after it,
//! so every checker invocation runs behind a panic boundary and a crash is
//! downgraded to a single error entry.

use std::panic::{self, AssertUnwindSafe};

#[cfg(feature = "napi")]
use napi_derive::napi;

use crate::html_check::check_html;
use crate::log::{Level, LogEntry, LogSink};
use crate::project::{Project, ProjectEntry};
use crate::style_check::check_stylesheet;
use crate::syntax;

pub fn run_diagnostics(project: &Project, sink: &mut dyn LogSink) {
    for (path, entry) in project.entries() {
        let ProjectEntry::File(content) = entry else {
            continue;
        };

        if path.ends_with(".html") {
            run_checker(sink, path, "html", || check_html(path, content));
        } else if path.ends_with(".js") {
            run_checker(sink, path, "syntax", || check_script(path, content));
        } else if path.ends_with(".css") {
            run_checker(sink, path, "css", || check_stylesheet(path, content));
        }
    }
}

fn check_script(path: &str, content: &str) -> Vec<LogEntry> {
    match syntax::validate_script(content) {
        Ok(()) => Vec::new(),
        Err(failure) => vec![
            LogEntry::new(Level::Error, "syntax", failure.message)
                .at(path, failure.line, failure.column)
                .with_stack(failure.stack),
        ],
    }
}

fn run_checker(
    sink: &mut dyn LogSink,
    path: &str,
    source: &str,
    checker: impl FnOnce() -> Vec<LogEntry>,
) {
    match panic::catch_unwind(AssertUnwindSafe(checker)) {
        Ok(entries) => {
            for entry in entries {
                sink.append(entry);
            }
        }
        Err(payload) => {
            sink.append(
                LogEntry::new(
                    Level::Error,
                    source,
                    format!("Checker failed on {}: {}", path, panic_message(&payload)),
                )
                .at(path, 0, 0),
            );
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(feature = "napi")]
#[napi]
pub fn run_diagnostics_native(files: serde_json::Value) -> napi::Result<serde_json::Value> {
    let project =
        Project::from_json(&files).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let mut log = crate::log::TerminalLog::new();
    run_diagnostics(&project, &mut log);
    serde_json::to_value(log.entries()).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::TerminalLog;

    #[test]
    fn test_invalid_js_emits_exactly_one_syntax_error() {
        let mut project = Project::new();
        project.insert_file("b.js", "let x = ");

        let mut log = TerminalLog::new();
        run_diagnostics(&project, &mut log);

        assert_eq!(log.len(), 1);
        let entry = &log.entries()[0];
        assert_eq!(entry.level, Level::Error);
        assert_eq!(entry.source, "syntax");
        assert_eq!(entry.filename, "b.js");
    }

    #[test]
    fn test_directories_and_other_extensions_skipped() {
        let mut project = Project::new();
        project.insert_dir("src/");
        project.insert_file("notes.txt", "not code {{{");
        project.insert_file("data.json", "{broken");

        let mut log = TerminalLog::new();
        run_diagnostics(&project, &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn test_one_bad_file_does_not_block_the_next() {
        let mut project = Project::new();
        project.insert_file("a.js", "function (");
        project.insert_file("z.css", "body { color: red; }");
        project.insert_file("m.js", "let ok = 1;");

        let mut log = TerminalLog::new();
        run_diagnostics(&project, &mut log);

        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].filename, "a.js");
    }

    #[test]
    fn test_files_scanned_in_path_order() {
        let mut project = Project::new();
        project.insert_file("b.js", "let x = ");
        project.insert_file("a.js", "let y = ");

        let mut log = TerminalLog::new();
        run_diagnostics(&project, &mut log);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].filename, "a.js");
        assert_eq!(log.entries()[1].filename, "b.js");
    }
}
