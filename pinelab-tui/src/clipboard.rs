//! System clipboard access behind a small trait so the copy action is
//! testable without a display server.

/// Puts text on a clipboard.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// The real system clipboard. Initialized lazily on first copy because
/// `arboard` needs a display connection that may not exist yet at startup.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().map_err(|e| e.to_string())?);
        }
        self.inner
            .as_mut()
            .expect("clipboard initialized above")
            .set_text(text)
            .map_err(|e| e.to_string())
    }
}

/// Capturing clipboard for tests.
#[cfg(test)]
pub struct FakeClipboard {
    contents: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

#[cfg(test)]
impl FakeClipboard {
    pub fn new() -> Self {
        Self {
            contents: std::sync::Arc::new(std::sync::Mutex::new(None)),
        }
    }

    pub fn contents(&self) -> std::sync::Arc<std::sync::Mutex<Option<String>>> {
        self.contents.clone()
    }
}

#[cfg(test)]
impl Clipboard for FakeClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}
