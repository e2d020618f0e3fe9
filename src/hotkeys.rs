// src/hotkeys.rs
// Global "show overlay" shortcut. The combination comes from the config
// (e.g. "Ctrl+Shift+S") and fires whichever application has focus.

use std::str::FromStr;
use std::thread;

use druid::{ExtEventSink, Target};
use global_hotkey::hotkey::{HotKey, HotKeyParseError};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::app::SHOW_OVERLAY;

#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("invalid shortcut '{text}': {source}")]
    Parse {
        text: String,
        #[source]
        source: HotKeyParseError,
    },
    #[error("could not register shortcut: {0}")]
    Register(#[from] global_hotkey::Error),
}

/// Keeps the shortcut registered. Dropping it unregisters the hotkey.
pub struct ShortcutHandle {
    _manager: GlobalHotKeyManager,
    label: String,
}

impl ShortcutHandle {
    /// The shortcut as written in the config.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Parses "Ctrl+Shift+S", "Alt+PrintScreen", ... Case-insensitive.
pub fn parse(text: &str) -> Result<HotKey, ShortcutError> {
    HotKey::from_str(text.trim()).map_err(|source| ShortcutError::Parse {
        text: text.to_string(),
        source,
    })
}

/// Registers `text` system-wide and forwards presses to the app as
/// `SHOW_OVERLAY`.
pub fn register(text: &str, sink: ExtEventSink) -> Result<ShortcutHandle, ShortcutError> {
    let hotkey = parse(text)?;
    if is_wayland_session() {
        warn!("Wayland session: the global shortcut only fires while an X11 window has focus");
    }

    let manager = GlobalHotKeyManager::new()?;
    manager.register(hotkey)?;
    info!("Global shortcut {} registered", text.trim());

    let id = hotkey.id();
    thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if !is_trigger(&event, id) {
                continue;
            }
            debug!("shortcut pressed");
            if let Err(e) = sink.submit_command(SHOW_OVERLAY, (), Target::Auto) {
                error!("Failed to send show request: {}", e);
                break;
            }
        }
    });

    Ok(ShortcutHandle {
        _manager: manager,
        label: text.trim().to_string(),
    })
}

/// Only the key-down of our own hotkey counts; the release is ignored.
fn is_trigger(event: &GlobalHotKeyEvent, id: u32) -> bool {
    event.id == id && event.state == HotKeyState::Pressed
}

fn is_wayland_session() -> bool {
    cfg!(target_os = "linux")
        && std::env::var("XDG_SESSION_TYPE")
            .map(|s| s.eq_ignore_ascii_case("wayland"))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use global_hotkey::hotkey::{Code, Modifiers};

    #[test]
    fn parses_modifiers_and_key() {
        let expected = HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyS);
        assert_eq!(parse("Ctrl+Shift+S").unwrap(), expected);
        assert_eq!(parse(" ctrl+shift+s ").unwrap(), expected);
    }

    #[test]
    fn bare_named_key() {
        assert_eq!(parse("PrintScreen").unwrap(), HotKey::new(None, Code::PrintScreen));
    }

    #[test]
    fn rejects_bad_input() {
        for text in ["", "Hyper+S", "Ctrl+Shift+Nope"] {
            let err = parse(text).unwrap_err();
            assert!(matches!(err, ShortcutError::Parse { .. }), "{text:?} parsed");
        }
    }

    #[test]
    fn only_our_key_down_triggers() {
        let id = parse("Ctrl+Shift+S").unwrap().id();
        let other = parse("Ctrl+Shift+A").unwrap().id();

        let pressed = GlobalHotKeyEvent { id, state: HotKeyState::Pressed };
        let released = GlobalHotKeyEvent { id, state: HotKeyState::Released };
        let foreign = GlobalHotKeyEvent { id: other, state: HotKeyState::Pressed };

        assert!(is_trigger(&pressed, id));
        assert!(!is_trigger(&released, id));
        assert!(!is_trigger(&foreign, id));
    }
}
