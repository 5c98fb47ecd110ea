//! User-visible status messages and the display side channel.

use core::fmt;

use crate::button::VirtualButton;
use crate::view::ControllerView;

/// A status message for the user.
///
/// None of these are errors: every bind-phase condition is reported here
/// and otherwise ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification {
    /// Ask for the key to bind to the next slot. `first` marks the initial
    /// prompt, which also explains the Escape shortcut.
    Prompt { label: &'static str, first: bool },
    /// A scancode has been bound.
    Bound {
        scancode: u8,
        button: VirtualButton,
        label: &'static str,
    },
    /// The scancode already has a binding; nothing changed.
    AlreadyBound { scancode: u8 },
    /// Binding was skipped, the profile defaults are being applied.
    DefaultsApplied,
    /// Escape pressed, the run phase begins.
    Finished,
    /// Every slot is used, the run phase begins.
    OutOfSlots,
    /// Keycode trace of a run-phase press.
    RawPress { scancode: u8 },
    /// Keycode trace of a run-phase release.
    RawRelease { scancode: u8 },
    /// Keycode trace of a decoded key.
    DecodedKey { code: u8 },
}

impl Notification {
    /// Whether the message replaces the screen instead of being appended.
    #[must_use]
    pub const fn clears_screen(&self) -> bool {
        !matches!(
            self,
            Notification::Prompt { first: false, .. } | Notification::OutOfSlots
        )
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Notification::Prompt { label, first: true } => write!(
                f,
                "Select the button to bind to {label}!\nClick ESC for default binds."
            ),
            Notification::Prompt { label, first: false } => {
                writeln!(f, "Select the button to bind to {label}!")
            }
            Notification::Bound {
                scancode,
                button,
                label,
            } => writeln!(f, "Binding {scancode} ({scancode:x}) to {button} = {label}!"),
            Notification::AlreadyBound { scancode } => {
                writeln!(f, "Already have key: {scancode:x}!")
            }
            Notification::DefaultsApplied => writeln!(f, "No bindings set, setting to defaults!"),
            Notification::Finished => writeln!(f, "ESC clicked! Finished binding!"),
            Notification::OutOfSlots => writeln!(f, "Out of keys, finishing binding!"),
            Notification::RawPress { scancode } => writeln!(f, "on_raw_press keycode: {scancode:x}"),
            Notification::RawRelease { scancode } => {
                writeln!(f, "on_raw_release keycode: {scancode:x}")
            }
            Notification::DecodedKey { code } if code == b' ' || code.is_ascii_graphic() => {
                writeln!(f, "key '{}': {code}", char::from(code))
            }
            Notification::DecodedKey { code } => writeln!(f, "key: {code}"),
        }
    }
}

/// Sink for status messages and controller snapshots.
///
/// Implemented by the display backends. Both calls are synchronous and
/// must not block the poll loop for long.
pub trait StatusSink {
    /// Show a status message.
    fn notify(&mut self, note: &Notification);

    /// Redraw the controller snapshot.
    fn render(&mut self, view: &ControllerView);
}

/// Status sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn notify(&mut self, _note: &Notification) {}

    fn render(&mut self, _view: &ControllerView) {}
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn notify(&mut self, note: &Notification) {
        (**self).notify(note);
    }

    fn render(&mut self, view: &ControllerView) {
        (**self).render(view);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::button::DirBit;
    use std::string::ToString;

    #[test]
    fn test_bound_message() {
        let note = Notification::Bound {
            scancode: 0x2C,
            button: VirtualButton::Discrete(10),
            label: "LB",
        };
        assert_eq!(note.to_string(), "Binding 44 (2c) to a = LB!\n");

        let note = Notification::Bound {
            scancode: 0x51,
            button: VirtualButton::Direction(DirBit::Down),
            label: "D-Pad Down",
        };
        assert_eq!(note.to_string(), "Binding 81 (51) to dpad down = D-Pad Down!\n");
    }

    #[test]
    fn test_decoded_key_message() {
        assert_eq!(Notification::DecodedKey { code: b'q' }.to_string(), "key 'q': 113\n");
        assert_eq!(Notification::DecodedKey { code: 27 }.to_string(), "key: 27\n");
    }

    #[test]
    fn test_hold_messages() {
        assert!(Notification::Prompt { label: "A", first: true }.clears_screen());
        assert!(!Notification::Prompt { label: "A", first: false }.clears_screen());
        assert!(!Notification::OutOfSlots.clears_screen());
        assert!(Notification::Finished.clears_screen());
    }
}
