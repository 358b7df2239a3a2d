//! Terminal output formatting.
//!
//! Human-readable lines by default, one JSON object per line with `--json`,
//! nothing but essentials with `--quiet`.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

#[must_use]
pub fn verbosity() -> u8 {
    read_config().verbose
}

fn suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

/// Emit one JSON line `{"type": kind, "payload": ...}`.
pub fn emit(kind: &str, payload: &impl Serialize) {
    let payload = serde_json::to_value(payload).unwrap_or_else(|e| json!({ "error": e.to_string() }));
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json || suppressed(config) {
        return;
    }
    println!("{} {}", "cryptogap".bold(), version.dimmed());
    println!();
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    if config.json {
        emit("field", &json!({ "label": label, "value": value.to_string() }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {:<14} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    let config = read_config();
    if config.json {
        emit("success", &json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    if read_config().json {
        emit("warning", &json!({ "message": message }));
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

pub fn error(message: &str) {
    if read_config().json {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

pub fn section(title: &str) {
    let config = read_config();
    if config.json || suppressed(config) {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a pre-rendered block (tables) indented by two spaces.
pub fn lines(block: &str) {
    let config = read_config();
    if config.json || suppressed(config) {
        return;
    }
    for line in block.lines() {
        println!("  {line}");
    }
}

pub fn note(message: &str) {
    let config = read_config();
    if config.json || suppressed(config) {
        return;
    }
    println!("  {}", message.dimmed());
}

pub fn positive(value: impl Display) -> String {
    value.to_string().green().to_string()
}

pub fn negative(value: impl Display) -> String {
    value.to_string().red().to_string()
}
