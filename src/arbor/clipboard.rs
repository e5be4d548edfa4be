use crate::error::{ArborError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Clipboard programs to try, in order, with their arguments.
#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "linux")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(target_os = "windows")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[];

/// Copies text to the system clipboard using the first tool that starts.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let tools = CLIPBOARD_TOOLS;
    if tools.is_empty() {
        return Err(ArborError::Api(
            "Clipboard not supported on this platform".to_string(),
        ));
    }

    let mut last_error = None;
    for (program, args) in tools {
        match pipe_to(program, args, text) {
            Ok(()) => {
                tracing::debug!(program, bytes = text.len(), "copied to clipboard");
                return Ok(());
            }
            Err(e) => last_error = Some(e),
        }
    }

    let names: Vec<&str> = tools.iter().map(|(p, _)| *p).collect();
    Err(ArborError::Api(format!(
        "No clipboard tool worked (tried {}): {}",
        names.join(", "),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

/// Spawn `program` and write `text` to its stdin.
fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| ArborError::Api(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
            return Err(ArborError::Api(format!(
                "Failed to write to {}: {}",
                program, e
            )));
        }
    }

    let status = child
        .wait()
        .map_err(|e| ArborError::Api(format!("Failed to wait for {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ArborError::Api(format!("{} exited with error", program)))
    }
}
