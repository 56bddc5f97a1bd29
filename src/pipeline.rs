//! Run orchestration: debounced triggering, sink reset, scan, assembly.
//!
//! A run is synchronous end to end. The only scheduling policy on top of
//! plain calls is the debouncer: rapid successive triggers collapse into one
//! execution after a quiet period, and a new trigger replaces any pending
//! deadline. Both the debouncer and the assembly cache take explicit inputs
//! (clock instants, project snapshots) so they stay unit-testable.

use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::assemble::assemble;
use crate::engine::run_diagnostics;
use crate::log::LogSink;
use crate::project::{Project, ProjectEntry};

/// Quiet period between the last trigger and the run it schedules.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Collapses bursts of triggers into a single pending deadline.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    /// Schedule a run `delay` after `now`, replacing any pending deadline.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per elapsed deadline; consuming it rearms nothing.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(DEFAULT_DEBOUNCE)
    }
}

/// Serves the previously assembled document while the project content hash
/// is unchanged. In-memory only; the assembled document is ephemeral.
#[derive(Debug, Default)]
pub struct AssemblyCache {
    hash: Option<String>,
    document: String,
}

impl AssemblyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_for(&mut self, project: &Project) -> &str {
        let hash = project_hash(project);
        if self.hash.as_deref() != Some(hash.as_str()) {
            self.document = assemble(project);
            self.hash = Some(hash);
        }
        &self.document
    }
}

fn project_hash(project: &Project) -> String {
    let mut hasher = Sha256::new();
    for (path, entry) in project.entries() {
        hasher.update(path.as_bytes());
        hasher.update([0u8]);
        match entry {
            ProjectEntry::File(content) => {
                hasher.update([b'f']);
                hasher.update(content.as_bytes());
            }
            ProjectEntry::Directory => hasher.update([b'd']),
        }
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// One full run: drop prior entries, scan every file, return the document
/// to display. Diagnostics are advisory and never block assembly.
pub fn run_preview(
    project: &Project,
    sink: &mut dyn LogSink,
    cache: &mut AssemblyCache,
) -> String {
    sink.clear();
    run_diagnostics(project, sink);
    cache.document_for(project).to_string()
}
