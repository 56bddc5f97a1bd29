//! Document assembler: one self-contained HTML string per run.
//!
//! ## Selection policy (aggregate)
//!
//! Markup comes from `index.html`, else the lexicographically first `.html`
//! file, else the empty string. Every non-directory `.css` file contributes
//! to one stylesheet block and every `.js` file to one script block, both
//! concatenated in lexicographic path order. No file is silently ignored.
//!
//! ## Guarantees
//!
//! Total over any project shape (an empty project still yields a document
//! carrying both injected blocks), deterministic and idempotent: the output
//! is a pure function of the project snapshot.

use lazy_static::lazy_static;
#[cfg(feature = "napi")]
use napi_derive::napi;
use regex::Regex;

use crate::bridge::BRIDGE_RUNTIME_JS;
use crate::project::Project;

/// Element id of the injected stylesheet block.
pub const STYLE_BLOCK_ID: &str = "__preview_styles__";

/// Element id of the injected script block (bridge runtime + user code).
pub const SCRIPT_BLOCK_ID: &str = "__preview_runtime__";

lazy_static! {
    static ref HEAD_OPEN_RE: Regex = Regex::new(r"(?i)<head\b").unwrap();
    static ref HEAD_CLOSE_RE: Regex = Regex::new(r"(?i)</head\s*>").unwrap();
    static ref BODY_CLOSE_RE: Regex = Regex::new(r"(?i)</body\s*>").unwrap();
}

pub fn assemble(project: &Project) -> String {
    let markup = project
        .file("index.html")
        .or_else(|| project.files_ending_with(".html").map(|(_, c)| c).next())
        .unwrap_or("");

    let stylesheet = project
        .files_ending_with(".css")
        .map(|(_, content)| content)
        .collect::<Vec<_>>()
        .join("\n\n");

    let script = project
        .files_ending_with(".js")
        .map(|(_, content)| content)
        .collect::<Vec<_>>()
        .join("\n\n");

    let style_block = format!(
        "<style id=\"{}\">\n{}\n</style>\n",
        STYLE_BLOCK_ID, stylesheet
    );

    // A literal "</" inside user code would terminate the generated script
    // element early, so it is escaped before embedding.
    let script_block = format!(
        "<script id=\"{}\">\n{}\n{}\n</script>\n",
        SCRIPT_BLOCK_ID,
        BRIDGE_RUNTIME_JS,
        script.replace("</", "<\\/")
    );

    let mut document = markup.to_string();

    if HEAD_OPEN_RE.is_match(&document) {
        match HEAD_CLOSE_RE.find(&document).map(|m| m.start()) {
            Some(at) => document.insert_str(at, &style_block),
            None => document = format!("{}{}", style_block, document),
        }
    } else {
        document = format!("{}{}", style_block, document);
    }

    match BODY_CLOSE_RE.find(&document).map(|m| m.start()) {
        Some(at) => document.insert_str(at, &script_block),
        None => document.push_str(&script_block),
    }

    document
}

#[cfg(feature = "napi")]
#[napi]
pub fn assemble_preview_native(files: serde_json::Value) -> napi::Result<String> {
    let project =
        Project::from_json(&files).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(assemble(&project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_project_still_yields_both_blocks() {
        let document = assemble(&Project::new());
        assert!(!document.is_empty());
        assert!(document.contains(STYLE_BLOCK_ID));
        assert!(document.contains(SCRIPT_BLOCK_ID));
    }

    #[test]
    fn test_idempotent_for_unchanged_project() {
        let mut project = Project::new();
        project.insert_file("index.html", "<html><head></head><body></body></html>");
        project.insert_file("style.css", "body { color: red; }");
        project.insert_file("app.js", "console.log(1);");

        assert_eq!(assemble(&project), assemble(&project));
    }

    #[test]
    fn test_style_lands_before_head_close() {
        let mut project = Project::new();
        project.insert_file("index.html", "<html><head><title>t</title></head><body></body></html>");
        project.insert_file("a.css", "body{color:red}");

        let document = assemble(&project);
        let style_at = document.find(STYLE_BLOCK_ID).unwrap();
        let head_close_at = document.find("</head>").unwrap();
        assert!(style_at < head_close_at);
        assert!(document.contains("body{color:red}"));
    }

    #[test]
    fn test_script_lands_before_body_close() {
        let mut project = Project::new();
        project.insert_file("index.html", "<html><body><p>hi</p></body></html>");
        project.insert_file("app.js", "console.log(1);");

        let document = assemble(&project);
        let script_at = document.find(SCRIPT_BLOCK_ID).unwrap();
        let body_close_at = document.find("</body>").unwrap();
        assert!(script_at < body_close_at);
    }

    #[test]
    fn test_markup_without_head_or_body_still_assembles() {
        let mut project = Project::new();
        project.insert_file("page.html", "<p>bare fragment</p>");

        let document = assemble(&project);
        assert!(document.starts_with("<style"));
        assert!(document.contains("<p>bare fragment</p>"));
        assert!(document.trim_end().ends_with("</script>"));
    }

    #[test]
    fn test_index_html_preferred_over_earlier_names() {
        let mut project = Project::new();
        project.insert_file("about.html", "<p>about</p>");
        project.insert_file("index.html", "<p>home</p>");

        let document = assemble(&project);
        assert!(document.contains("home"));
        assert!(!document.contains("about"));
    }

    #[test]
    fn test_css_and_js_aggregate_in_path_order() {
        let mut project = Project::new();
        project.insert_file("z.css", ".z{}");
        project.insert_file("a.css", ".a{}");
        project.insert_file("z.js", "let z = 1;");
        project.insert_file("a.js", "let a = 1;");

        let document = assemble(&project);
        assert!(document.find(".a{}").unwrap() < document.find(".z{}").unwrap());
        assert!(document.find("let a").unwrap() < document.find("let z").unwrap());
    }

    #[test]
    fn test_user_script_close_tag_is_escaped() {
        let mut project = Project::new();
        project.insert_file("app.js", "let markup = \"</script>\";");

        let document = assemble(&project);
        assert!(document.contains("<\\/script>"));
        // The generated block must close exactly once.
        assert_eq!(document.matches("</script>").count(), 1);
    }

    #[test]
    fn test_case_insensitive_insert_points() {
        let mut project = Project::new();
        project.insert_file("index.html", "<HTML><HEAD></HEAD><BODY></BODY></HTML>");
        project.insert_file("a.css", ".x{}");
        project.insert_file("a.js", "1;");

        let document = assemble(&project);
        assert!(document.find(STYLE_BLOCK_ID).unwrap() < document.find("</HEAD>").unwrap());
        assert!(document.find(SCRIPT_BLOCK_ID).unwrap() < document.find("</BODY>").unwrap());
    }
}
