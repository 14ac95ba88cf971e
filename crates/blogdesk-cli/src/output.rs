//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a progress note on stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as JSON, compact or pretty-printed.
pub fn json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

/// Print one JSON line per item, then a paging summary on stderr.
pub fn page<T: Serialize>(page: &blogdesk_core::model::Page<T>, pretty: bool) -> Result<()> {
    if page.content.is_empty() {
        note("Nothing found.");
        return Ok(());
    }

    for item in &page.content {
        json(item, pretty)?;
    }

    eprintln!();
    eprintln!(
        "{}: {}/{} ({} total)",
        "Page".dimmed(),
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    );
    Ok(())
}
