//! Terminal output for CLI handlers.
//!
//! Human mode prints colored, indented lines. `--json` turns every call into
//! one JSON object per line (`{"type": ..., "payload": ...}`) and `--quiet`
//! keeps only warnings. Logs go to stderr through `tracing`, so stdout stays
//! parseable.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

/// Output mode selected by the global flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static MODE: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn mode() -> OutputConfig {
    *MODE.get_or_init(RwLock::default).read()
}

/// Apply the global `--json` / `--quiet` flags.
pub fn configure(config: OutputConfig) {
    *MODE.get_or_init(RwLock::default).write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    mode().json
}

/// Print `human` unless quiet, or the tagged JSON line in JSON mode.
///
/// `always` lines ignore `--quiet`.
fn emit(kind: &str, payload: Value, always: bool, human: impl FnOnce()) {
    let mode = mode();
    if mode.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if always || !mode.quiet {
        human();
    }
}

pub fn header(version: &str) {
    emit("header", json!({ "app": "edgescout", "version": version }), false, || {
        println!("{} {}", "edgescout".bold(), version.dimmed());
    });
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), false, || {
        println!();
        println!("{}", title.bold());
    });
}

/// A `label  value` line.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit("field", json!({ "label": label, "value": value }), false, || {
        println!("  {:<14} {}", label.dimmed(), value);
    });
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), false, || {
        println!("  {} {}", "✓".green(), message);
    });
}

pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), true, || {
        println!("  {} {}", "⚠".yellow(), message);
    });
}

pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), false, || {
        println!("  {}: {}", "hint".cyan(), message.dimmed());
    });
}

/// One ranked opportunity: `rank. DECISION +edge% title`.
pub fn opportunity(rank: usize, decision: &str, edge: f64, title: &str) {
    let payload = json!({ "rank": rank, "decision": decision, "edge": edge, "title": title });
    emit("opportunity", payload, false, || {
        let edge = format!("{:+.1}%", edge * 100.0);
        println!("  {rank:>2}. {} {} {title}", decision.yellow(), edge.green());
    });
}

/// A multi-line block, each line indented.
pub fn lines(content: &str) {
    emit("lines", json!({ "content": content }), false, || {
        for line in content.lines() {
            println!("  {line}");
        }
    });
}

/// Print a JSON document as-is.
pub fn json_output(value: Value) {
    println!("{value}");
}

/// Dim `value` in human mode.
pub fn muted(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.dimmed().to_string()
    }
}
