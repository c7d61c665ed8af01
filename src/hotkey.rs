use eframe::egui::{Key, KeyboardShortcut, Modifiers};

/// Keyboard shortcut handled while the tool window has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Shortcut {
    pub fn to_egui(self) -> KeyboardShortcut {
        let mut mods = Modifiers::NONE;
        if self.ctrl {
            mods = mods | Modifiers::COMMAND;
        }
        if self.shift {
            mods = mods | Modifiers::SHIFT;
        }
        if self.alt {
            mods = mods | Modifiers::ALT;
        }
        KeyboardShortcut::new(mods, self.key)
    }
}

/// Parse a shortcut string like "Ctrl+Shift+S" into a [`Shortcut`].
pub fn parse_shortcut(s: &str) -> Option<Shortcut> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<Key> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" | "CMD" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" => alt = true,
            "" => {}
            _ => {
                if key.is_some() {
                    return None;
                }
                key = Some(parse_key(&upper)?);
            }
        }
    }

    key.map(|key| Shortcut {
        key,
        ctrl,
        shift,
        alt,
    })
}

fn parse_key(upper: &str) -> Option<Key> {
    match upper {
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "ENTER" | "RETURN" => Some(Key::Enter),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "DELETE" => Some(Key::Delete),
        "BACKSPACE" => Some(Key::Backspace),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "LEFT" | "LEFTARROW" => Some(Key::ArrowLeft),
        "RIGHT" | "RIGHTARROW" => Some(Key::ArrowRight),
        "UP" | "UPARROW" => Some(Key::ArrowUp),
        "DOWN" | "DOWNARROW" => Some(Key::ArrowDown),
        _ if upper.len() > 1 && upper.starts_with('F') => match upper[1..].parse::<u8>().ok()? {
            1 => Some(Key::F1),
            2 => Some(Key::F2),
            3 => Some(Key::F3),
            4 => Some(Key::F4),
            5 => Some(Key::F5),
            6 => Some(Key::F6),
            7 => Some(Key::F7),
            8 => Some(Key::F8),
            9 => Some(Key::F9),
            10 => Some(Key::F10),
            11 => Some(Key::F11),
            12 => Some(Key::F12),
            _ => None,
        },
        _ if upper.len() == 1 => Key::from_name(upper),
        _ => None,
    }
}
