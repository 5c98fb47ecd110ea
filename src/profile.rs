//! Gamepad output profiles: bind-phase slots, default bindings and layout.
//!
//! A profile is selected at build time and never changes while running.
//! It decides which virtual button each newly bound key receives, what the
//! user is prompted for, which bindings apply when binding is skipped, and
//! how the snapshot display arranges the controls.

use crate::button::{DirBit, VirtualButton};
use crate::keycode::KeyCode;

/// Label used when a slot or button has no configured name.
pub const UNKNOWN_LABEL: &str = "unknown";

/// One entry of the bind-phase prompt list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot {
    pub label: &'static str,
    pub button: VirtualButton,
}

/// A built-in scancode binding applied when binding is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DefaultBinding {
    pub scancode: u8,
    pub button: VirtualButton,
}

/// How held direction bits reach the gamepad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DirectionOutput {
    /// Resolved to a single 8-way D-pad / hat value.
    Hat,
    /// Mapped to the left stick X/Y axes.
    LeftStick,
}

/// Which controls the snapshot display shows, and where.
///
/// D-pad squares are ordered Up, Right, Down, Left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    pub dpad: [VirtualButton; 4],
    pub top_row: [VirtualButton; 4],
    pub bottom_row: [VirtualButton; 4],
}

/// A complete gamepad profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    pub name: &'static str,
    /// Initial value of the slot counter, also the first fallback id.
    pub slot_base: u8,
    /// Binding stops once the slot counter reaches this value.
    pub max_slot: u8,
    pub slots: &'static [Slot],
    pub defaults: &'static [DefaultBinding],
    pub direction_output: DirectionOutput,
    pub layout: Layout,
}

impl Profile {
    /// The button and label for the slot counter value `counter`.
    ///
    /// Counters past the configured slot list fall back to
    /// `Discrete(counter)` with the [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn slot(&self, counter: u8) -> Slot {
        let index = usize::from(counter.saturating_sub(self.slot_base));
        self.slots.get(index).copied().unwrap_or(Slot {
            label: UNKNOWN_LABEL,
            button: VirtualButton::Discrete(counter),
        })
    }

    /// Label of the slot the counter value `counter` would prompt for, if any.
    #[must_use]
    pub fn prompt_label(&self, counter: u8) -> Option<&'static str> {
        let index = usize::from(counter.checked_sub(self.slot_base)?);
        self.slots.get(index).map(|s| s.label)
    }

    /// Label of the first slot naming `button`.
    #[must_use]
    pub fn label_for(&self, button: VirtualButton) -> &'static str {
        self.slots
            .iter()
            .find(|s| s.button == button)
            .map_or(UNKNOWN_LABEL, |s| s.label)
    }
}

const fn button(id: u8) -> VirtualButton {
    VirtualButton::Discrete(id)
}

const fn dir(d: DirBit) -> VirtualButton {
    VirtualButton::Direction(d)
}

const fn slot(label: &'static str, button: VirtualButton) -> Slot {
    Slot { label, button }
}

const fn bind(key: KeyCode, button: VirtualButton) -> DefaultBinding {
    DefaultBinding {
        scancode: key.0,
        button,
    }
}

const DPAD_DIRECTIONS: [VirtualButton; 4] = [
    dir(DirBit::Up),
    dir(DirBit::Right),
    dir(DirBit::Down),
    dir(DirBit::Left),
];

/// Generic HID joystick: buttons numbered from 1, D-pad as plain buttons.
///
/// ```text
///   ||   [B ] [Y  ] [A ] [X ]
/// |||||| [LT] [LTB] [RB] [LB]
///   ||
/// ```
pub const JOYSTICK: Profile = Profile {
    name: "joystick",
    slot_base: 1,
    max_slot: 32,
    slots: &[
        slot("D-Pad Up", button(1)),
        slot("D-Pad Right", button(2)),
        slot("D-Pad Down", button(3)),
        slot("D-Pad Left", button(4)),
        slot("Window", button(5)),
        slot("Menu", button(6)),
        slot("LT", button(7)),
        slot("LT + LB", button(8)),
        slot("RB", button(9)),
        slot("LB", button(10)),
        slot("B", button(11)),
        slot("Y", button(12)),
        slot("A", button(13)),
        slot("X", button(14)),
    ],
    defaults: &[
        bind(KeyCode::SPACE, button(1)),
        bind(KeyCode::D, button(2)),
        bind(KeyCode::S, button(3)),
        bind(KeyCode::A, button(4)),
        bind(KeyCode::APOSTROPHE, button(5)),
        bind(KeyCode::ENTER, button(6)),
        bind(KeyCode::H, button(7)),
        bind(KeyCode::J, button(8)),
        bind(KeyCode::K, button(9)),
        bind(KeyCode::Q, button(10)),
        bind(KeyCode::Y, button(11)),
        bind(KeyCode::U, button(12)),
        bind(KeyCode::I, button(13)),
        bind(KeyCode::O, button(14)),
    ],
    direction_output: DirectionOutput::Hat,
    layout: Layout {
        dpad: [button(1), button(2), button(3), button(4)],
        top_row: [button(11), button(12), button(13), button(14)],
        bottom_row: [button(7), button(8), button(9), button(10)],
    },
};

/// XInput control ids.
pub mod xinput {
    pub const LOGO: u8 = 0;
    pub const A: u8 = 1;
    pub const B: u8 = 2;
    pub const X: u8 = 3;
    pub const Y: u8 = 4;
    pub const LB: u8 = 5;
    pub const RB: u8 = 6;
    pub const BACK: u8 = 7;
    pub const START: u8 = 8;
    pub const L3: u8 = 9;
    pub const R3: u8 = 10;
    pub const DPAD_UP: u8 = 11;
    pub const DPAD_DOWN: u8 = 12;
    pub const DPAD_LEFT: u8 = 13;
    pub const DPAD_RIGHT: u8 = 14;
    pub const TRIGGER_LEFT: u8 = 15;
    pub const TRIGGER_RIGHT: u8 = 16;
}

/// XInput-style controller. D-pad slots drive the direction mask.
pub const XINPUT: Profile = Profile {
    name: "xinput",
    slot_base: 0,
    max_slot: 16,
    slots: &[
        slot("LOGO", button(xinput::LOGO)),
        slot("A", button(xinput::A)),
        slot("B", button(xinput::B)),
        slot("X", button(xinput::X)),
        slot("Y", button(xinput::Y)),
        slot("LB", button(xinput::LB)),
        slot("RB", button(xinput::RB)),
        slot("BACK", button(xinput::BACK)),
        slot("START", button(xinput::START)),
        slot("L3", button(xinput::L3)),
        slot("R3", button(xinput::R3)),
        slot("DPAD_UP", dir(DirBit::Up)),
        slot("DPAD_DOWN", dir(DirBit::Down)),
        slot("DPAD_LEFT", dir(DirBit::Left)),
        slot("DPAD_RIGHT", dir(DirBit::Right)),
        slot("TRIGGER_LEFT", button(xinput::TRIGGER_LEFT)),
        slot("TRIGGER_RIGHT", button(xinput::TRIGGER_RIGHT)),
    ],
    defaults: &[
        bind(KeyCode::SPACE, dir(DirBit::Up)),
        bind(KeyCode::D, dir(DirBit::Right)),
        bind(KeyCode::S, dir(DirBit::Down)),
        bind(KeyCode::A, dir(DirBit::Left)),
        bind(KeyCode::APOSTROPHE, button(xinput::BACK)),
        bind(KeyCode::ENTER, button(xinput::START)),
        bind(KeyCode::H, button(xinput::TRIGGER_LEFT)),
        bind(KeyCode::J, button(xinput::L3)),
        bind(KeyCode::K, button(xinput::RB)),
        bind(KeyCode::Q, button(xinput::LB)),
        bind(KeyCode::Y, button(xinput::B)),
        bind(KeyCode::U, button(xinput::Y)),
        bind(KeyCode::I, button(xinput::A)),
        bind(KeyCode::O, button(xinput::X)),
    ],
    direction_output: DirectionOutput::Hat,
    layout: Layout {
        dpad: DPAD_DIRECTIONS,
        top_row: [
            button(xinput::B),
            button(xinput::Y),
            button(xinput::A),
            button(xinput::X),
        ],
        bottom_row: [
            button(xinput::TRIGGER_LEFT),
            button(xinput::L3),
            button(xinput::RB),
            button(xinput::LB),
        ],
    },
};

/// Nintendo Switch button bits.
pub mod switch {
    pub const Y: u8 = 0;
    pub const B: u8 = 1;
    pub const A: u8 = 2;
    pub const X: u8 = 3;
    pub const L: u8 = 4;
    pub const R: u8 = 5;
    pub const ZL: u8 = 6;
    pub const ZR: u8 = 7;
    pub const MINUS: u8 = 8;
    pub const PLUS: u8 = 9;
    pub const LEFT_STICK: u8 = 10;
    pub const RIGHT_STICK: u8 = 11;
    pub const HOME: u8 = 12;
    pub const CAPTURE: u8 = 13;
}

/// Switch-compatible gamepad with a hat D-pad.
///
/// ```text
///   ||   [Y ] [B ] [A ] [X ]
/// |||||| [ZL] [ZR] [L ] [R ]
///   ||
/// ```
pub const SWITCH: Profile = Profile {
    name: "switch",
    slot_base: 0,
    max_slot: 16,
    slots: &[
        slot("D-Pad Up", dir(DirBit::Up)),
        slot("D-Pad Right", dir(DirBit::Right)),
        slot("D-Pad Down", dir(DirBit::Down)),
        slot("D-Pad Left", dir(DirBit::Left)),
        slot("A", button(switch::A)),
        slot("B", button(switch::B)),
        slot("X", button(switch::X)),
        slot("Y", button(switch::Y)),
        slot("L", button(switch::L)),
        slot("R", button(switch::R)),
        slot("ZL", button(switch::ZL)),
        slot("ZR", button(switch::ZR)),
        slot("Minus", button(switch::MINUS)),
        slot("Plus", button(switch::PLUS)),
        slot("L-Stick", button(switch::LEFT_STICK)),
        slot("R-Stick", button(switch::RIGHT_STICK)),
    ],
    defaults: &[
        bind(KeyCode::SPACE, dir(DirBit::Up)),
        bind(KeyCode::DOWN, dir(DirBit::Down)),
        bind(KeyCode::LEFT, dir(DirBit::Left)),
        bind(KeyCode::RIGHT, dir(DirBit::Right)),
        bind(KeyCode::Z, button(switch::Y)),
        bind(KeyCode::X, button(switch::X)),
        bind(KeyCode::C, button(switch::B)),
        bind(KeyCode::V, button(switch::A)),
    ],
    direction_output: DirectionOutput::Hat,
    layout: Layout {
        dpad: DPAD_DIRECTIONS,
        top_row: [
            button(switch::Y),
            button(switch::B),
            button(switch::A),
            button(switch::X),
        ],
        bottom_row: [
            button(switch::ZL),
            button(switch::ZR),
            button(switch::L),
            button(switch::R),
        ],
    },
};

/// Switch profile with direction keys driving the left stick.
pub const SWITCH_LEFT_STICK: Profile = Profile {
    name: "switch-stick",
    direction_output: DirectionOutput::LeftStick,
    ..SWITCH
};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unique_default_scancodes(profile: &Profile) {
        for (i, a) in profile.defaults.iter().enumerate() {
            for b in &profile.defaults[i + 1..] {
                assert_ne!(a.scancode, b.scancode, "{} repeats a default key", profile.name);
            }
        }
    }

    #[test]
    fn test_defaults_never_repeat_a_scancode() {
        for p in [&JOYSTICK, &XINPUT, &SWITCH, &SWITCH_LEFT_STICK] {
            assert_unique_default_scancodes(p);
        }
    }

    #[test]
    fn test_slot_counter_respects_base() {
        assert_eq!(JOYSTICK.slot(1), slot("D-Pad Up", button(1)));
        assert_eq!(JOYSTICK.slot(14), slot("X", button(14)));
        assert_eq!(SWITCH.slot(0), slot("D-Pad Up", dir(DirBit::Up)));
    }

    #[test]
    fn test_slot_past_list_falls_back_to_unknown() {
        let s = JOYSTICK.slot(20);
        assert_eq!(s.label, UNKNOWN_LABEL);
        assert_eq!(s.button, button(20));
        assert_eq!(JOYSTICK.prompt_label(15), None);
        assert_eq!(JOYSTICK.prompt_label(0), None);
    }

    #[test]
    fn test_label_for() {
        assert_eq!(SWITCH.label_for(button(switch::ZR)), "ZR");
        assert_eq!(SWITCH.label_for(button(switch::HOME)), UNKNOWN_LABEL);
        assert_eq!(XINPUT.label_for(dir(DirBit::Left)), "DPAD_LEFT");
    }

    #[test]
    fn test_stick_variant_shares_bindings() {
        assert_eq!(SWITCH_LEFT_STICK.defaults, SWITCH.defaults);
        assert_eq!(SWITCH_LEFT_STICK.direction_output, DirectionOutput::LeftStick);
    }
}
