//! # Preview Native Core
//!
//! Native pipeline behind the in-browser project editor: preflight
//! diagnostics over the authored files, deterministic assembly of the
//! preview document, and the bridge contract that relays runtime events
//! from the sandboxed frame back to the host terminal.
//!
//! ## Pipeline Invariants
//!
//! 1. **Total assembly**: `assemble` succeeds for every project shape,
//!    including an empty project and a project with no markup file. The
//!    output always carries the injected style and script blocks.
//!
//! 2. **Determinism**: file enumeration is lexicographic by path, so
//!    diagnostics order, aggregate CSS/JS order and archive layout are pure
//!    functions of the project snapshot.
//!
//! 3. **Isolation**: one file's checker can never block diagnostics for the
//!    files after it. A checker defect is downgraded to a single
//!    error-level entry.
//!
//! 4. **Advisory diagnostics**: entries never stop the run; the document is
//!    assembled and returned regardless of what the scan found.
//!
//! 5. **Tagged bridge envelopes**: the host converts only messages carrying
//!    the reserved marker key; every other message on the channel is
//!    ignored silently.
//!
//! The log sink is an explicit handle passed into the engine and the bridge
//! decoder. There is no process-wide log state.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod archive;
mod assemble;
mod bridge;
mod engine;
mod html_check;
mod log;
mod pipeline;
mod project;
mod style_check;
mod syntax;

pub use archive::export_archive;
pub use assemble::{assemble, SCRIPT_BLOCK_ID, STYLE_BLOCK_ID};
pub use bridge::{
    decode_bridge_message, BRIDGE_MARKER_KEY, BRIDGE_RUNTIME_JS, BRIDGE_SOURCE,
};
pub use engine::run_diagnostics;
pub use log::{Level, LogEntry, LogSink, TerminalLog};
pub use pipeline::{run_preview, AssemblyCache, Debouncer, DEFAULT_DEBOUNCE};
pub use project::{Project, ProjectEntry, ProjectShapeError};
pub use syntax::{validate_script, ParseFailure};

#[cfg(feature = "napi")]
pub use archive::export_archive_native;
#[cfg(feature = "napi")]
pub use assemble::assemble_preview_native;
#[cfg(feature = "napi")]
pub use bridge::decode_bridge_message_native;
#[cfg(feature = "napi")]
pub use engine::run_diagnostics_native;

#[cfg(feature = "napi")]
#[napi]
pub fn preview_bridge() -> String {
    "Preview Native Bridge Connected".to_string()
}
