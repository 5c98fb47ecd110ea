//! USB HID keyboard scancodes (usage page 0x07) and modifier bits.

use bitflags::bitflags;

/// Raw keyboard scancode as delivered by the keyboard transport.
///
/// See HID Usage Tables 1.12, Section 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u8);

impl KeyCode {
    /// Reported in every key slot when too many keys are held.
    pub const ERROR_ROLL_OVER: Self = Self(0x01);

    // Letters (0x04-0x1D)
    pub const A: Self = Self(0x04);
    pub const B: Self = Self(0x05);
    pub const C: Self = Self(0x06);
    pub const D: Self = Self(0x07);
    pub const H: Self = Self(0x0B);
    pub const I: Self = Self(0x0C);
    pub const J: Self = Self(0x0D);
    pub const K: Self = Self(0x0E);
    pub const L: Self = Self(0x0F);
    pub const O: Self = Self(0x12);
    pub const Q: Self = Self(0x14);
    pub const S: Self = Self(0x16);
    pub const U: Self = Self(0x18);
    pub const V: Self = Self(0x19);
    pub const W: Self = Self(0x1A);
    pub const X: Self = Self(0x1B);
    pub const Y: Self = Self(0x1C);
    pub const Z: Self = Self(0x1D);

    pub const ENTER: Self = Self(0x28);
    pub const ESCAPE: Self = Self(0x29);
    pub const BACKSPACE: Self = Self(0x2A);
    pub const TAB: Self = Self(0x2B);
    pub const SPACE: Self = Self(0x2C);
    pub const APOSTROPHE: Self = Self(0x34);

    // Arrows
    pub const RIGHT: Self = Self(0x4F);
    pub const LEFT: Self = Self(0x50);
    pub const DOWN: Self = Self(0x51);
    pub const UP: Self = Self(0x52);

    /// First modifier scancode (Left Control); modifier bit `n` maps to `0xE0 + n`.
    pub const LEFT_CTRL: Self = Self(0xE0);
    pub const LEFT_SHIFT: Self = Self(0xE1);

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        self.0 >= 0xE0 && self.0 <= 0xE7
    }

    /// Decode this key to an ASCII byte, honoring Shift.
    ///
    /// Control keys decode to their control codes (Enter is `\n`, Escape
    /// is 27). Returns `None` for keys without a character.
    ///
    /// # Example
    ///
    /// ```
    /// use keyboard_to_gamepad::KeyCode;
    ///
    /// assert_eq!(KeyCode::A.to_ascii(false), Some(b'a'));
    /// assert_eq!(KeyCode::A.to_ascii(true), Some(b'A'));
    /// assert_eq!(KeyCode::UP.to_ascii(false), None);
    /// ```
    #[must_use]
    pub fn to_ascii(self, shift: bool) -> Option<u8> {
        let (plain, shifted) = match self.0 {
            0x04..=0x1D => {
                let c = b'a' + (self.0 - 0x04);
                (c, c.to_ascii_uppercase())
            }
            0x1E..=0x26 => (b'1' + (self.0 - 0x1E), b"!@#$%^&*("[(self.0 - 0x1E) as usize]),
            0x27 => (b'0', b')'),
            0x28 => (b'\n', b'\n'),
            0x29 => (27, 27),
            0x2A => (8, 8),
            0x2B => (b'\t', b'\t'),
            0x2C => (b' ', b' '),
            0x2D => (b'-', b'_'),
            0x2E => (b'=', b'+'),
            0x2F => (b'[', b'{'),
            0x30 => (b']', b'}'),
            0x31 => (b'\\', b'|'),
            0x33 => (b';', b':'),
            0x34 => (b'\'', b'"'),
            0x35 => (b'`', b'~'),
            0x36 => (b',', b'<'),
            0x37 => (b'.', b'>'),
            0x38 => (b'/', b'?'),
            _ => return None,
        };
        Some(if shift { shifted } else { plain })
    }
}

impl From<u8> for KeyCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

/// The bind-phase finish key.
pub const ESCAPE_CODE: u8 = KeyCode::ESCAPE.0;

bitflags! {
    /// Modifier byte of a boot-protocol keyboard report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyModifiers: u8 {
        const LEFT_CTRL   = 0b0000_0001;
        const LEFT_SHIFT  = 0b0000_0010;
        const LEFT_ALT    = 0b0000_0100;
        const LEFT_GUI    = 0b0000_1000;
        const RIGHT_CTRL  = 0b0001_0000;
        const RIGHT_SHIFT = 0b0010_0000;
        const RIGHT_ALT   = 0b0100_0000;
        const RIGHT_GUI   = 0b1000_0000;
    }
}

impl KeyModifiers {
    #[inline]
    #[must_use]
    pub fn shift(&self) -> bool {
        self.intersects(Self::LEFT_SHIFT | Self::RIGHT_SHIFT)
    }

    /// Scancodes of every modifier in `self`, in bit order.
    pub fn scancodes(self) -> impl Iterator<Item = u8> {
        (0..8u8).filter(move |bit| self.bits() & (1 << bit) != 0).map(|bit| 0xE0 + bit)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KeyModifiers {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "KeyModifiers({=u8:#x})", self.bits());
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_ascii_digits_and_symbols() {
        assert_eq!(KeyCode(0x1E).to_ascii(false), Some(b'1'));
        assert_eq!(KeyCode(0x1E).to_ascii(true), Some(b'!'));
        assert_eq!(KeyCode(0x27).to_ascii(true), Some(b')'));
        assert_eq!(KeyCode::APOSTROPHE.to_ascii(false), Some(b'\''));
    }

    #[test]
    fn test_ascii_control_keys() {
        assert_eq!(KeyCode::ENTER.to_ascii(false), Some(b'\n'));
        assert_eq!(KeyCode::ESCAPE.to_ascii(false), Some(27));
        assert_eq!(KeyCode::LEFT_SHIFT.to_ascii(false), None);
    }

    #[test]
    fn test_modifier_scancodes() {
        let mods = KeyModifiers::LEFT_CTRL | KeyModifiers::RIGHT_SHIFT;
        assert_eq!(mods.scancodes().collect::<Vec<_>>(), [0xE0, 0xE5]);
        assert!(mods.shift());
        assert!(KeyCode(0xE5).is_modifier());
        assert!(!KeyCode::SPACE.is_modifier());
    }
}
