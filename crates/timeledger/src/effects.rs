//! Clipboard and open side effects of activating a marker.
//!
//! Failures are logged and reported to the caller but never end the
//! session.

use arboard::Clipboard;
use timeledger_core::ClickAction;
use tracing::{info, warn};

/// Performs click actions, keeping one clipboard handle alive.
///
/// Some platforms drop clipboard contents together with the handle that
/// set them, so the handle lives as long as the shell.
#[derive(Default)]
pub struct Effects {
    clipboard: Option<Clipboard>,
}

impl Effects {
    /// Creates the effect runner; the clipboard is opened on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a click action and describes what happened.
    pub fn activate(&mut self, action: &ClickAction) -> String {
        let result = match action {
            ClickAction::CopyText(text) => self.copy(text).map(|()| format!("Copied {text}")),
            ClickAction::OpenPath(path) => opener::open(path)
                .map(|()| format!("Opened {}", path.display()))
                .map_err(|e| e.to_string()),
            ClickAction::OpenUrl(url) => opener::open_browser(url)
                .map(|()| format!("Opened {url}"))
                .map_err(|e| e.to_string()),
        };

        match result {
            Ok(done) => {
                info!(?action, "Marker activated");
                done
            }
            Err(e) => {
                warn!(?action, error = %e, "Marker action failed");
                format!("Could not complete action: {e}")
            }
        }
    }

    fn copy(&mut self, text: &str) -> Result<(), String> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new().map_err(|e| e.to_string())?);
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return Err("clipboard unavailable".to_string());
        };
        clipboard.set_text(text).map_err(|e| e.to_string())
    }
}
