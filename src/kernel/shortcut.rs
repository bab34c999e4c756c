/// A key press with its modifier state. `key_code` uses DOM key codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInput {
    pub key_code: u32,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyInput {
    /// Key pressed together with Ctrl and nothing else.
    pub fn ctrl(key_code: u32) -> Self {
        Self {
            key_code,
            ctrl: true,
            ..Self::default()
        }
    }

    /// Key pressed together with Cmd and nothing else.
    pub fn meta(key_code: u32) -> Self {
        Self {
            key_code,
            meta: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Find,
    ToggleDetails,
    ToggleNames,
    ModelProperties,
    ResetZoom,
    ZoomIn,
    ZoomOut,
}

impl Shortcut {
    /// Ctrl or Cmd, without Alt or Shift.
    pub fn from_key(key: KeyInput) -> Option<Self> {
        if key.alt || key.shift || !(key.ctrl || key.meta) {
            return None;
        }
        match key.key_code {
            70 => Some(Shortcut::Find),            // F
            68 => Some(Shortcut::ToggleDetails),   // D
            85 => Some(Shortcut::ToggleNames),     // U
            13 => Some(Shortcut::ModelProperties), // Return
            8 => Some(Shortcut::ResetZoom),        // Backspace
            38 => Some(Shortcut::ZoomIn),          // Up
            40 => Some(Shortcut::ZoomOut),         // Down
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_ctrl_and_cmd() {
        assert_eq!(Shortcut::from_key(KeyInput::ctrl(70)), Some(Shortcut::Find));
        assert_eq!(Shortcut::from_key(KeyInput::meta(40)), Some(Shortcut::ZoomOut));
        assert_eq!(Shortcut::from_key(KeyInput::ctrl(8)), Some(Shortcut::ResetZoom));
    }

    #[test]
    fn rejects_other_modifiers_and_keys() {
        let plain = KeyInput { key_code: 70, ..KeyInput::default() };
        assert_eq!(Shortcut::from_key(plain), None);

        let shifted = KeyInput { shift: true, ..KeyInput::ctrl(70) };
        assert_eq!(Shortcut::from_key(shifted), None);

        let alt = KeyInput { alt: true, ..KeyInput::meta(68) };
        assert_eq!(Shortcut::from_key(alt), None);

        assert_eq!(Shortcut::from_key(KeyInput::ctrl(71)), None);
    }
}
