//! Shared CLI output helpers for Autometa binaries.

use std::time::Instant;

use colored::Colorize;

use crate::error::Error;

pub fn banner(subtitle: &str) {
    eprintln!();
    eprintln!("{} {}", "Autometa".bold().cyan(), subtitle.dimmed());
    eprintln!();
}

pub fn section(title: &str) {
    let bar = "─".repeat(50);
    eprintln!("{} {}", title.bold().blue(), bar.dimmed());
}

pub fn kv(key: &str, value: &str) {
    eprintln!("  {:<20} {}", key.dimmed(), value);
}

pub fn success(msg: &str) {
    eprintln!("  {} {}", "✓".green().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg.yellow());
}

/// Prints the kind of `err` followed by its full, indented message.
pub fn failure(err: &Error) {
    eprintln!("  {} {}", "✗".red().bold(), err.kind().as_str().red().bold());
    for line in err.to_string().lines() {
        eprintln!("    {line}");
    }
}

pub fn print_summary(start: Instant) {
    eprintln!();
    eprintln!(
        "{}  {}",
        "Time".dimmed(),
        format!("{:.1?}", start.elapsed()).bold()
    );
    eprintln!();
}
