use std::fmt;

use arboard::Clipboard;

#[derive(Debug)]
pub enum ClipboardError {
    Init(arboard::Error),
    Write(arboard::Error),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Init(err) => write!(f, "clipboard unavailable: {err}"),
            ClipboardError::Write(err) => write!(f, "clipboard write failed: {err}"),
        }
    }
}

/// Lazily connects to the system clipboard; a failed connection is retried on
/// the next copy.
pub struct ClipboardProvider {
    clipboard: Option<Clipboard>,
}

impl ClipboardProvider {
    pub fn new() -> Self {
        Self { clipboard: None }
    }

    pub fn set_text(&mut self, text: String) -> Result<(), ClipboardError> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(ClipboardError::Init)?,
        };
        self.clipboard
            .insert(clipboard)
            .set_text(text)
            .map_err(ClipboardError::Write)
    }
}
