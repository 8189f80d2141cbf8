//! Copying text to the system clipboard
//!
//! The clipboard is an external sink reached through platform copy
//! commands. Candidates are tried in order and the first that accepts the
//! text wins; clipboard failure is reported but never fails the
//! surrounding operation, since the text was already displayed.

use crate::error::{ErrorCategory, ErrorKind, Result, SealnoteError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Trait for clipboard sinks
pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

/// Copies via platform clipboard commands, trying each in order
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    /// Candidate (command, args) pairs for the current platform, in
    /// preference order.
    fn candidates() -> &'static [(&'static str, &'static [&'static str])] {
        #[cfg(target_os = "macos")]
        {
            &[("pbcopy", &[])]
        }
        #[cfg(target_os = "windows")]
        {
            &[("clip", &[])]
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            &[
                ("wl-copy", &[]),
                ("xclip", &["-selection", "clipboard"]),
                ("xsel", &["--clipboard", "--input"]),
            ]
        }
    }

    fn try_copy(cmd: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        Ok(status.success())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        for (cmd, args) in Self::candidates() {
            match Self::try_copy(cmd, args, text) {
                Ok(true) => return Ok(()),
                // Command missing or rejected the text: fall through to
                // the next candidate.
                Ok(false) | Err(_) => continue,
            }
        }
        Err(SealnoteError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "no clipboard command succeeded; copy the text manually",
        ))
    }
}

/// In-memory clipboard for tests
#[derive(Default)]
pub struct MemoryClipboard {
    pub contents: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.contents.last().map(String::as_str)
    }
}

impl Clipboard for MemoryClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.contents.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_records_copies() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.copy_text("first").unwrap();
        clipboard.copy_text("second").unwrap();
        assert_eq!(clipboard.contents, vec!["first", "second"]);
        assert_eq!(clipboard.last(), Some("second"));
    }

    #[test]
    fn test_memory_clipboard_empty() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.last(), None);
    }
}
