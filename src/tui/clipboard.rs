//! System clipboard access.

use std::fmt;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Destination for copied secrets. Writes are synchronous and best-effort.
pub trait ClipboardSink: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard via `arboard`.
///
/// The handle is opened on first copy and kept for the life of the sink: on
/// X11 and Wayland the copied text is served by the owning handle, so it
/// would vanish as soon as a per-call handle dropped.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a platform handle is currently held.
    pub fn is_open(&self) -> bool {
        self.handle.lock().map(|h| h.is_some()).unwrap_or(false)
    }
}

impl fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.is_open())
            .finish()
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;

        let mut clipboard = match handle.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?,
        };

        // A failed write drops the handle so the next attempt reconnects.
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
        *handle = Some(clipboard);
        Ok(())
    }
}

/// In-memory clipboard used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    fail_with: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes always fail with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(None),
            fail_with: Some(reason.into()),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.fail_with {
            return Err(ClipboardError::Write(reason.clone()));
        }
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
        *contents = Some(text.to_owned());
        Ok(())
    }
}
