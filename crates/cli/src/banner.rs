//! Startup banner

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

const SEPARATOR: &str = "==========================";

/// Render the banner shown once the watch is active
///
/// Keywords are shown as typed; matching folds case separately.
pub fn render(root: &Path, keywords: &[String], color: bool) -> String {
    let keywords = if keywords.is_empty() {
        "none".to_string()
    } else {
        keywords.join(", ")
    };
    let lines = [
        ("", "Watching started".to_string()),
        ("Root", root.display().to_string()),
        ("Keywords", keywords),
        ("", "Press Ctrl+C to stop".to_string()),
    ];

    let mut out = String::new();
    for (label, value) in lines {
        let line = match (label.is_empty(), color) {
            (true, true) => value.bold().to_string(),
            (true, false) => value,
            (false, true) => format!("{}: {}", label.cyan(), value),
            (false, false) => format!("{label}: {value}"),
        };
        out.push_str(&line);
        out.push('\n');
    }

    if color {
        out.push_str(&SEPARATOR.dimmed().to_string());
    } else {
        out.push_str(SEPARATOR);
    }
    out.push('\n');
    out
}

/// Print the banner to stdout, colored only on a terminal
pub fn print(root: &Path, keywords: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    out.write_all(render(root, keywords, color).as_bytes())?;
    out.flush()
}
