//! Static US-QWERTY layout, next-key hinting, and held-key tracking
//! for the on-screen keyboard. Pure lookups over configuration data;
//! nothing here feeds back into the session.

use std::collections::HashSet;

use crossterm::event::KeyCode;

/// One physical key: its code, the label printed on it, the shifted
/// label where it differs, the characters it produces, and a render
/// width in cells.
#[derive(Debug)]
pub struct KeyDef {
    pub code: &'static str,
    pub label: &'static str,
    pub shift_label: Option<&'static str>,
    pub matches: &'static [char],
    pub width: u16,
}

const fn key(code: &'static str, label: &'static str, matches: &'static [char]) -> KeyDef {
    KeyDef {
        code,
        label,
        shift_label: None,
        matches,
        width: 5,
    }
}

const fn shifted(
    code: &'static str,
    label: &'static str,
    shift_label: &'static str,
    matches: &'static [char],
) -> KeyDef {
    KeyDef {
        code,
        label,
        shift_label: Some(shift_label),
        matches,
        width: 5,
    }
}

const fn wide(code: &'static str, label: &'static str, width: u16) -> KeyDef {
    KeyDef {
        code,
        label,
        shift_label: None,
        matches: &[],
        width,
    }
}

static ROW_DIGITS: [KeyDef; 14] = [
    shifted("Backquote", "`", "~", &['`', '~']),
    shifted("Digit1", "1", "!", &['1', '!']),
    shifted("Digit2", "2", "@", &['2', '@']),
    shifted("Digit3", "3", "#", &['3', '#']),
    shifted("Digit4", "4", "$", &['4', '$']),
    shifted("Digit5", "5", "%", &['5', '%']),
    shifted("Digit6", "6", "^", &['6', '^']),
    shifted("Digit7", "7", "&", &['7', '&']),
    shifted("Digit8", "8", "*", &['8', '*']),
    shifted("Digit9", "9", "(", &['9', '(']),
    shifted("Digit0", "0", ")", &['0', ')']),
    shifted("Minus", "-", "_", &['-', '_']),
    shifted("Equal", "=", "+", &['=', '+']),
    wide("Backspace", "Bksp", 9),
];

static ROW_TOP: [KeyDef; 14] = [
    wide("Tab", "Tab", 7),
    key("KeyQ", "Q", &['q', 'Q']),
    key("KeyW", "W", &['w', 'W']),
    key("KeyE", "E", &['e', 'E']),
    key("KeyR", "R", &['r', 'R']),
    key("KeyT", "T", &['t', 'T']),
    key("KeyY", "Y", &['y', 'Y']),
    key("KeyU", "U", &['u', 'U']),
    key("KeyI", "I", &['i', 'I']),
    key("KeyO", "O", &['o', 'O']),
    key("KeyP", "P", &['p', 'P']),
    shifted("BracketLeft", "[", "{", &['[', '{']),
    shifted("BracketRight", "]", "}", &[']', '}']),
    shifted("Backslash", "\\", "|", &['\\', '|']),
];

static ROW_HOME: [KeyDef; 13] = [
    wide("CapsLock", "Caps", 8),
    key("KeyA", "A", &['a', 'A']),
    key("KeyS", "S", &['s', 'S']),
    key("KeyD", "D", &['d', 'D']),
    key("KeyF", "F", &['f', 'F']),
    key("KeyG", "G", &['g', 'G']),
    key("KeyH", "H", &['h', 'H']),
    key("KeyJ", "J", &['j', 'J']),
    key("KeyK", "K", &['k', 'K']),
    key("KeyL", "L", &['l', 'L']),
    shifted("Semicolon", ";", ":", &[';', ':']),
    shifted("Quote", "'", "\"", &['\'', '"']),
    wide("Enter", "Enter", 9),
];

static ROW_BOTTOM: [KeyDef; 12] = [
    wide("ShiftLeft", "Shift", 11),
    key("KeyZ", "Z", &['z', 'Z']),
    key("KeyX", "X", &['x', 'X']),
    key("KeyC", "C", &['c', 'C']),
    key("KeyV", "V", &['v', 'V']),
    key("KeyB", "B", &['b', 'B']),
    key("KeyN", "N", &['n', 'N']),
    key("KeyM", "M", &['m', 'M']),
    shifted("Comma", ",", "<", &[',', '<']),
    shifted("Period", ".", ">", &['.', '>']),
    shifted("Slash", "/", "?", &['/', '?']),
    wide("ShiftRight", "Shift", 11),
];

static ROW_SPACE: [KeyDef; 1] = [KeyDef {
    code: "Space",
    label: "Space",
    shift_label: None,
    matches: &[' '],
    width: 41,
}];

pub static ROWS: [&[KeyDef]; 5] = [
    &ROW_DIGITS,
    &ROW_TOP,
    &ROW_HOME,
    &ROW_BOTTOM,
    &ROW_SPACE,
];

/// Resolve the physical key that produces `c`, or None when the
/// character is not representable on this layout.
pub fn hint_for(c: char) -> Option<&'static str> {
    ROWS.iter()
        .flat_map(|row| row.iter())
        .find(|key| key.matches.contains(&c))
        .map(|key| key.code)
}

/// Keys whose effect would be a deletion or a cursor move. These are
/// intercepted at the capture boundary and never reach the guard.
pub fn is_blocked(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::PageUp
            | KeyCode::PageDown
    )
}

/// Best-effort mapping from a crossterm key to a physical code for the
/// held-key display. Terminals report produced characters rather than
/// scancodes, so shifted symbols resolve through the layout table.
pub fn physical_code(code: KeyCode) -> Option<&'static str> {
    match code {
        KeyCode::Char(c) => hint_for(c),
        KeyCode::Backspace => Some("Backspace"),
        KeyCode::Enter => Some("Enter"),
        KeyCode::Tab => Some("Tab"),
        _ => None,
    }
}

/// Currently-held physical keys, visual only.
#[derive(Debug, Default)]
pub struct KeyPressSet {
    held: HashSet<&'static str>,
}

impl KeyPressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &'static str) {
        self.held.insert(code);
    }

    pub fn release(&mut self, code: &'static str) {
        self.held.remove(code);
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// For terminals that never deliver key-release events.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}
