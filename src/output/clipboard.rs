// src/output/clipboard.rs
//! System clipboard access: arboard first, then the platform's copy command.

use crate::error::AppError;
use std::io::Write;
use std::process::{Command, Stdio};

/// An external program that reads clipboard content from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CopyCommand {
    program: &'static str,
    args: &'static [&'static str],
}

const WL_COPY: CopyCommand = CopyCommand {
    program: "wl-copy",
    args: &[],
};
const XCLIP: CopyCommand = CopyCommand {
    program: "xclip",
    args: &["-selection", "clipboard"],
};
const PBCOPY: CopyCommand = CopyCommand {
    program: "pbcopy",
    args: &[],
};
const CLIP_EXE: CopyCommand = CopyCommand {
    program: "clip",
    args: &[],
};

/// Copies `content` to the system clipboard.
pub fn copy_to_clipboard(content: &str) -> Result<(), AppError> {
    log::debug!("Copying {} characters to clipboard", content.chars().count());

    match copy_with_arboard(content) {
        Ok(()) => {
            log::info!("Copied to clipboard");
            return Ok(());
        }
        Err(e) => log::debug!("arboard unavailable ({}), trying platform command", e),
    }

    let command = platform_command().ok_or_else(|| {
        AppError::Clipboard("no clipboard command available on this platform".to_string())
    })?;
    let result = pipe_to(command, content);
    match &result {
        Ok(()) => log::info!("Copied to clipboard with {}", command.program),
        Err(e) => log::error!("Failed to copy to clipboard: {}", e),
    }
    result
}

fn copy_with_arboard(content: &str) -> Result<(), AppError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(content)?;
    Ok(())
}

fn platform_command() -> Option<CopyCommand> {
    if cfg!(target_os = "macos") {
        Some(PBCOPY)
    } else if cfg!(target_os = "windows") {
        Some(CLIP_EXE)
    } else if cfg!(target_os = "linux") {
        Some(linux_command(
            std::env::var("WAYLAND_DISPLAY").is_ok(),
            std::env::var("XDG_SESSION_TYPE").ok().as_deref(),
        ))
    } else {
        None
    }
}

fn linux_command(wayland_display: bool, session_type: Option<&str>) -> CopyCommand {
    if wayland_display || session_type == Some("wayland") {
        WL_COPY
    } else {
        XCLIP
    }
}

fn pipe_to(command: CopyCommand, content: &str) -> Result<(), AppError> {
    let program = command.program;
    let mut child = Command::new(program)
        .args(command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AppError::Clipboard(format!("failed to start {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content.as_bytes())
            .map_err(|e| AppError::Clipboard(format!("failed to write to {}: {}", program, e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| AppError::Clipboard(format!("failed to wait for {}: {}", program, e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(AppError::Clipboard(format!(
            "{} failed: {}",
            program,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}
