//! Clipboard utilities for scrive.
//!
//! Copies displayed text to the system clipboard using pbcopy (macOS),
//! wl-copy (Wayland) or xclip (X11), whichever is available.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// Candidate clipboard tools, tried in order.
#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &["--type", "text/plain", "--trim-newline"]),
    ("xclip", &["-selection", "clipboard", "-in", "-quiet"]),
];

#[cfg(not(target_os = "macos"))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &["--type", "text/plain", "--trim-newline"]),
    ("xclip", &["-selection", "clipboard", "-in", "-quiet"]),
];

/// Copies text to the system clipboard.
///
/// Tries each known clipboard tool in order. A missing tool is not an error;
/// the caller decides whether an unavailable clipboard is worth a warning.
///
/// # Errors
/// - If no clipboard tool could accept the text
pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    for (tool, args) in CLIPBOARD_TOOLS {
        if pipe_to_tool(tool, args, text) {
            tracing::debug!("Text copied to clipboard via {tool}");
            return Ok(());
        }
    }

    Err(anyhow::anyhow!(
        "No clipboard tool available (tried: {})",
        CLIPBOARD_TOOLS
            .iter()
            .map(|(tool, _)| *tool)
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

/// Spawns a clipboard tool and writes the text to its stdin.
fn pipe_to_tool(tool: &str, args: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(tool).args(args).stdin(Stdio::piped()).spawn() else {
        tracing::debug!("{tool} not found or not executable");
        return false;
    };

    let Some(mut stdin) = child.stdin.take() else {
        return false;
    };

    match write!(stdin, "{text}") {
        Ok(_) => {
            drop(stdin);
            // Give the tool a moment to take ownership of the selection
            thread::sleep(Duration::from_millis(100));
            true
        }
        Err(e) => {
            tracing::warn!("Failed to write to {tool} stdin: {e}");
            false
        }
    }
}
