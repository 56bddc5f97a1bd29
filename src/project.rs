//! Project store snapshot: the in-memory set of authored files and
//! directories the pipeline reads.
//!
//! Directory markers arrive in two observed encodings: a trailing-slash path
//! key, or a null content value. Both are normalized into [`ProjectEntry::Directory`]
//! at ingestion so downstream code never checks both forms.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEntry {
    File(String),
    Directory,
}

/// Ordered path → entry mapping. BTreeMap keys give every consumer the same
/// lexicographic enumeration, which keeps diagnostics order, aggregate
/// assembly order and archive layout deterministic.
#[derive(Debug, Clone, Default)]
pub struct Project {
    entries: BTreeMap<String, ProjectEntry>,
}

#[derive(Debug, Clone)]
pub enum ProjectShapeError {
    NotAnObject,
    InvalidEntry { path: String },
}

impl fmt::Display for ProjectShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => {
                write!(f, "Project snapshot must be an object mapping path to content")
            }
            Self::InvalidEntry { path } => {
                write!(
                    f,
                    "Entry '{}' must be a content string or null (directory marker)",
                    path
                )
            }
        }
    }
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one raw entry. `None` content marks a directory, as does a
    /// trailing slash on the path; the stored key is always slash-stripped.
    pub fn insert(&mut self, path: &str, content: Option<String>) {
        let is_dir_key = path.ends_with('/');
        let normalized = path.trim_end_matches('/');
        if normalized.is_empty() {
            return;
        }
        let entry = match content {
            Some(text) if !is_dir_key => ProjectEntry::File(text),
            _ => ProjectEntry::Directory,
        };
        self.entries.insert(normalized.to_string(), entry);
    }

    pub fn insert_file(&mut self, path: &str, content: impl Into<String>) {
        self.insert(path, Some(content.into()));
    }

    pub fn insert_dir(&mut self, path: &str) {
        self.insert(path, None);
    }

    pub fn remove(&mut self, path: &str) {
        self.entries.remove(path.trim_end_matches('/'));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in lexicographic path order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ProjectEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_str(), entry))
    }

    /// File entries only, lexicographic path order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(path, entry)| match entry {
            ProjectEntry::File(content) => Some((path.as_str(), content.as_str())),
            ProjectEntry::Directory => None,
        })
    }

    /// Content of the file at `path`, if a file entry exists there.
    pub fn file(&self, path: &str) -> Option<&str> {
        match self.entries.get(path) {
            Some(ProjectEntry::File(content)) => Some(content.as_str()),
            _ => None,
        }
    }

    /// Files whose path ends with `suffix` (e.g. ".css"), lexicographic order.
    pub fn files_ending_with<'a>(
        &'a self,
        suffix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.files().filter(move |(path, _)| path.ends_with(suffix))
    }

    /// Ingest the snapshot shape the host persists: an object mapping path
    /// to a content string or null.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ProjectShapeError> {
        let object = value.as_object().ok_or(ProjectShapeError::NotAnObject)?;
        let mut project = Project::new();
        for (path, content) in object {
            match content {
                serde_json::Value::Null => project.insert(path, None),
                serde_json::Value::String(text) => project.insert(path, Some(text.clone())),
                _ => {
                    return Err(ProjectShapeError::InvalidEntry {
                        path: path.clone(),
                    })
                }
            }
        }
        Ok(project)
    }

    /// Recursively ingest a directory tree from disk. Unreadable files are
    /// skipped with a warning so one bad file cannot block ingestion.
    pub fn from_dir(root: &Path) -> io::Result<Self> {
        let mut project = Project::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.map_err(io::Error::other)?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(io::Error::other)?;
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if path.is_empty() {
                continue;
            }
            if entry.file_type().is_dir() {
                project.insert_dir(&path);
            } else if entry.file_type().is_file() {
                match std::fs::read_to_string(entry.path()) {
                    Ok(content) => project.insert_file(&path, content),
                    Err(e) => {
                        eprintln!(
                            "[PreviewNative] Skipping unreadable file {:?}: {}",
                            entry.path(),
                            e
                        );
                    }
                }
            }
        }
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_and_null_are_equivalent_directories() {
        let mut a = Project::new();
        a.insert("src/", Some("ignored".to_string()));

        let mut b = Project::new();
        b.insert("src", None);

        assert_eq!(a.entries.get("src"), Some(&ProjectEntry::Directory));
        assert_eq!(a.entries.get("src"), b.entries.get("src"));
    }

    #[test]
    fn test_lexicographic_enumeration() {
        let mut project = Project::new();
        project.insert_file("b.js", "2");
        project.insert_file("a.js", "1");
        project.insert_file("c.css", "3");

        let paths: Vec<&str> = project.files().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a.js", "b.js", "c.css"]);
    }

    #[test]
    fn test_suffix_filter() {
        let mut project = Project::new();
        project.insert_file("style.css", "body{}");
        project.insert_file("app.js", "1");
        project.insert_dir("vendor.css/");

        let css: Vec<&str> = project.files_ending_with(".css").map(|(p, _)| p).collect();
        assert_eq!(css, vec!["style.css"]);
    }

    #[test]
    fn test_from_json_host_shape() {
        let snapshot = serde_json::json!({
            "index.html": "<html></html>",
            "assets": null,
            "assets/app.js": "let x = 1;"
        });
        let project = Project::from_json(&snapshot).unwrap();
        assert_eq!(project.file("index.html"), Some("<html></html>"));
        assert_eq!(project.file("assets"), None);
        assert_eq!(project.len(), 3);
    }

    #[test]
    fn test_from_json_rejects_non_string_content() {
        let snapshot = serde_json::json!({ "a.js": 42 });
        assert!(Project::from_json(&snapshot).is_err());
    }
}
