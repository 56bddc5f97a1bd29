//! Runtime bridge between the sandboxed preview frame and the host.
//!
//! ## Wire contract
//!
//! One envelope per runtime event, posted from the frame to its parent:
//!
//! ```json
//! { "__previewBridge": "console.error",
//!   "payload": { "message": "...", "filename": "", "lineno": 0, "colno": 0, "stack": "" } }
//! ```
//!
//! The marker key is fixed and collision-resistant: the host processes only
//! envelopes carrying it and silently ignores every other message arriving
//! on the same channel. Delivery is FIFO per frame instance; there is no
//! ordering guarantee relative to host-side work.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde_json::Value;

use crate::log::{Level, LogEntry};

/// Reserved envelope marker key. Messages without it are not ours.
pub const BRIDGE_MARKER_KEY: &str = "__previewBridge";

/// Source tag for entries relayed from the sandboxed frame.
pub const BRIDGE_SOURCE: &str = "iframe";

/// Sandbox-side implementation, injected into the assembled document ahead
/// of user code. Wrapped console methods still delegate to the originals,
/// and the send path never throws even when the host is cross-origin or
/// missing.
pub const BRIDGE_RUNTIME_JS: &str = r#"(function () {
  function send(tag, payload) {
    try {
      window.parent.postMessage({ "__previewBridge": tag, payload: payload }, "*");
    } catch (e) { /* host unavailable */ }
  }
  function joinArgs(args) {
    var parts = [];
    for (var i = 0; i < args.length; i++) {
      var a = args[i];
      if (typeof a === "object" && a !== null) {
        try { parts.push(JSON.stringify(a)); } catch (e) { parts.push(String(a)); }
      } else {
        parts.push(String(a));
      }
    }
    return parts.join(" ");
  }
  ["error", "warn", "info", "log"].forEach(function (level) {
    var original = console[level];
    console[level] = function () {
      send("console." + level, { message: joinArgs(arguments), filename: "", lineno: 0, colno: 0, stack: "" });
      if (original) { original.apply(console, arguments); }
    };
  });
  window.addEventListener("error", function (event) {
    send("error", {
      message: event.message || "Uncaught error",
      filename: event.filename || "",
      lineno: event.lineno || 0,
      colno: event.colno || 0,
      stack: event.error && event.error.stack ? event.error.stack : ""
    });
  });
  window.addEventListener("unhandledrejection", function (event) {
    var reason = event.reason;
    var message = "";
    var stack = "";
    if (reason && typeof reason === "object") {
      message = reason.message || String(reason);
      stack = reason.stack || "";
    } else {
      message = String(reason);
    }
    send("unhandledrejection", { message: message, filename: "", lineno: 0, colno: 0, stack: stack });
  });
})();"#;

/// Host-side decoder. Returns `None` for any message that is not an
/// envelope from our own bridge; payload fields default to empty/zero.
pub fn decode_bridge_message(raw: &Value) -> Option<LogEntry> {
    let tag = raw.get(BRIDGE_MARKER_KEY)?.as_str()?;

    let level = match tag {
        "error" | "console.error" => Level::Error,
        "console.warn" | "unhandledrejection" => Level::Warn,
        _ => Level::Info,
    };

    let payload = raw.get("payload");
    let text = |field: &str| -> String {
        payload
            .and_then(|p| p.get(field))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };
    let number = |field: &str| -> u32 {
        payload
            .and_then(|p| p.get(field))
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32
    };

    Some(
        LogEntry::new(level, BRIDGE_SOURCE, text("message"))
            .at(&text("filename"), number("lineno"), number("colno"))
            .with_stack(text("stack")),
    )
}

#[cfg(feature = "napi")]
#[napi]
pub fn decode_bridge_message_native(raw: serde_json::Value) -> Option<serde_json::Value> {
    decode_bridge_message(&raw).and_then(|entry| serde_json::to_value(entry).ok())
}
