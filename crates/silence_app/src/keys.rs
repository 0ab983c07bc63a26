//! Virtual-key codes, modifier sets and human-readable key names.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, Sub};

use serde::{Deserialize, Serialize};

/// Virtual key code (Win32 `VK_*` numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const LBUTTON: KeyCode = KeyCode(0x01);
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const SHIFT: KeyCode = KeyCode(0x10);
    pub const CONTROL: KeyCode = KeyCode(0x11);
    pub const MENU: KeyCode = KeyCode(0x12);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const A: KeyCode = KeyCode(0x41);
    pub const M: KeyCode = KeyCode(0x4D);
    pub const LWIN: KeyCode = KeyCode(0x5B);
    pub const RWIN: KeyCode = KeyCode(0x5C);
    pub const F1: KeyCode = KeyCode(0x70);
    pub const F5: KeyCode = KeyCode(0x74);
    pub const F21: KeyCode = KeyCode(0x84);
    pub const LSHIFT: KeyCode = KeyCode(0xA0);
    pub const RSHIFT: KeyCode = KeyCode(0xA1);
    pub const LCONTROL: KeyCode = KeyCode(0xA2);
    pub const RCONTROL: KeyCode = KeyCode(0xA3);
    pub const LMENU: KeyCode = KeyCode(0xA4);
    pub const RMENU: KeyCode = KeyCode(0xA5);

    /// The modifier this key contributes, if it is a modifier key.
    pub fn modifier(self) -> Option<Modifiers> {
        match self {
            KeyCode::SHIFT | KeyCode::LSHIFT | KeyCode::RSHIFT => Some(Modifiers::SHIFT),
            KeyCode::CONTROL | KeyCode::LCONTROL | KeyCode::RCONTROL => Some(Modifiers::CTRL),
            KeyCode::MENU | KeyCode::LMENU | KeyCode::RMENU => Some(Modifiers::ALT),
            KeyCode::LWIN | KeyCode::RWIN => Some(Modifiers::WIN),
            _ => None,
        }
    }

    #[inline]
    pub fn is_modifier(self) -> bool {
        self.modifier().is_some()
    }

    /// Display name, e.g. `F21`, `NumPad 5` or `Key 0xE8`.
    pub fn name(self) -> String {
        let vk = self.0;
        let named = match vk {
            0x08 => "Backspace",
            0x09 => "Tab",
            0x0C => "Clear",
            0x0D => "Enter",
            0x10 | 0xA0 | 0xA1 => "Shift",
            0x11 | 0xA2 | 0xA3 => "Ctrl",
            0x12 | 0xA4 | 0xA5 => "Alt",
            0x13 => "Pause",
            0x14 => "Caps Lock",
            0x1B => "Esc",
            0x20 => "Space",
            0x21 => "Page Up",
            0x22 => "Page Down",
            0x23 => "End",
            0x24 => "Home",
            0x25 => "Left",
            0x26 => "Up",
            0x27 => "Right",
            0x28 => "Down",
            0x2C => "Print Screen",
            0x2D => "Insert",
            0x2E => "Delete",
            0x5B | 0x5C => "Win",
            0x5D => "Menu",
            0x6A => "NumPad *",
            0x6B => "NumPad +",
            0x6D => "NumPad -",
            0x6E => "NumPad .",
            0x6F => "NumPad /",
            0x90 => "Num Lock",
            0x91 => "Scroll Lock",
            0xAD => "Volume Mute",
            0xAE => "Volume Down",
            0xAF => "Volume Up",
            0xB0 => "Next Track",
            0xB1 => "Previous Track",
            0xB3 => "Play/Pause",
            0xBA => ";",
            0xBB => "=",
            0xBC => ",",
            0xBD => "-",
            0xBE => ".",
            0xBF => "/",
            0xC0 => "`",
            0xDB => "[",
            0xDC => "\\",
            0xDD => "]",
            0xDE => "'",
            _ => "",
        };
        if !named.is_empty() {
            return named.to_string();
        }

        match vk {
            0x30..=0x39 | 0x41..=0x5A => char::from_u32(vk)
                .map(String::from)
                .unwrap_or_else(|| format!("Key 0x{vk:02X}")),
            0x60..=0x69 => format!("NumPad {}", vk - 0x60),
            0x70..=0x87 => format!("F{}", vk - 0x70 + 1),
            _ => format!("Key 0x{vk:02X}"),
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Set of held modifier keys.
///
/// Bits: Shift=1, Ctrl=2, Alt=4, Win=8. Left and right variants collapse into one bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);
    pub const WIN: Modifiers = Modifiers(8);
    pub const ALL: Modifiers = Modifiers(0x0F);

    /// Display order used when rendering a binding.
    const ORDER: [(Modifiers, &'static str); 4] = [
        (Modifiers::CTRL, "Ctrl"),
        (Modifiers::ALT, "Alt"),
        (Modifiers::SHIFT, "Shift"),
        (Modifiers::WIN, "Win"),
    ];

    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Modifiers) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: Modifiers, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Names of the held modifiers in display order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::ORDER
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Sub for Modifiers {
    type Output = Modifiers;

    fn sub(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & !rhs.0)
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Modifiers(NONE)");
        }
        let names: Vec<_> = self.names().collect();
        write!(f, "Modifiers({})", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_and_right_variants_share_a_bit() {
        assert_eq!(KeyCode::LSHIFT.modifier(), Some(Modifiers::SHIFT));
        assert_eq!(KeyCode::RCONTROL.modifier(), Some(Modifiers::CTRL));
        assert_eq!(KeyCode::MENU.modifier(), Some(Modifiers::ALT));
        assert_eq!(KeyCode::RWIN.modifier(), Some(Modifiers::WIN));
        assert_eq!(KeyCode::F5.modifier(), None);
    }

    #[test]
    fn set_operations() {
        let mut m = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(m.contains(Modifiers::CTRL));
        assert!(!m.contains(Modifiers::CTRL | Modifiers::ALT));
        m.remove(Modifiers::CTRL);
        assert_eq!(m, Modifiers::SHIFT);
        m.set(Modifiers::WIN, true);
        assert_eq!(m.bits(), 9);
        assert_eq!((Modifiers::ALL - Modifiers::ALT).bits(), 0x0B);
        assert_eq!(Modifiers::from_bits_truncate(0xFF), Modifiers::ALL);
    }

    #[test]
    fn names_follow_display_order() {
        let all: Vec<_> = Modifiers::ALL.names().collect();
        assert_eq!(all, ["Ctrl", "Alt", "Shift", "Win"]);
        assert_eq!(
            format!("{:?}", Modifiers::SHIFT | Modifiers::CTRL),
            "Modifiers(Ctrl | Shift)"
        );
    }

    #[test]
    fn key_names() {
        assert_eq!(KeyCode::F21.name(), "F21");
        assert_eq!(KeyCode(0x87).name(), "F24");
        assert_eq!(KeyCode::M.name(), "M");
        assert_eq!(KeyCode(0x37).name(), "7");
        assert_eq!(KeyCode(0x65).name(), "NumPad 5");
        assert_eq!(KeyCode::ESCAPE.name(), "Esc");
        assert_eq!(KeyCode(0xDC).name(), "\\");
        assert_eq!(KeyCode(0xE8).name(), "Key 0xE8");
    }

    #[test]
    fn serializes_as_bits() {
        let json = serde_json::to_string(&(Modifiers::CTRL | Modifiers::SHIFT)).expect("json");
        assert_eq!(json, "3");
        let back: Modifiers = serde_json::from_str("10").expect("json");
        assert_eq!(back, Modifiers::CTRL | Modifiers::WIN);
    }
}
