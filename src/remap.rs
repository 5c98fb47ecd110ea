//! Run-phase remapping of raw key events to gamepad controls.

use crate::button::{ActiveButtons, Directions, VirtualButton};
use crate::config::DirectionRelease;
use crate::dpad;
use crate::output::GamepadOutput;
use crate::profile::DirectionOutput;
use crate::table::BindingTable;

/// Held-control state of the run phase.
///
/// Discrete bindings go straight to the output and are mirrored in
/// [`ActiveButtons`]; direction bindings only update the held
/// [`Directions`], which reach the output through
/// [`apply_directions`](Self::apply_directions).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputRemapper {
    active: ActiveButtons,
    held: Directions,
    release: DirectionRelease,
}

impl InputRemapper {
    #[must_use]
    pub const fn new(release: DirectionRelease) -> Self {
        Self {
            active: ActiveButtons::NONE,
            held: Directions::NONE,
            release,
        }
    }

    #[inline]
    #[must_use]
    pub const fn active(&self) -> ActiveButtons {
        self.active
    }

    #[inline]
    #[must_use]
    pub const fn held(&self) -> Directions {
        self.held
    }

    /// Apply a key press. Unbound scancodes do nothing and return `None`.
    pub fn press<O: GamepadOutput>(
        &mut self,
        table: &BindingTable,
        scancode: u8,
        out: &mut O,
    ) -> Option<VirtualButton> {
        let button = table.get(scancode)?;
        match button {
            VirtualButton::Discrete(id) => {
                out.press(id);
                if !self.active.set(id, true) {
                    trace!("button {} not tracked", id);
                }
            }
            VirtualButton::Direction(dir) => self.held |= dir.mask(),
        }
        Some(button)
    }

    /// Apply a key release. Unbound scancodes do nothing and return `None`.
    pub fn release<O: GamepadOutput>(
        &mut self,
        table: &BindingTable,
        scancode: u8,
        out: &mut O,
    ) -> Option<VirtualButton> {
        let button = table.get(scancode)?;
        match button {
            VirtualButton::Discrete(id) => {
                out.release(id);
                self.active.set(id, false);
            }
            VirtualButton::Direction(dir) => match self.release {
                DirectionRelease::Clear => self.held &= !dir.mask(),
                DirectionRelease::Toggle => self.held ^= dir.mask(),
            },
        }
        Some(button)
    }

    /// Release every tracked button and direction.
    pub fn release_all<O: GamepadOutput>(&mut self, out: &mut O) {
        for id in self.active.iter() {
            out.release(id);
        }
        self.active = ActiveButtons::NONE;
        self.held = Directions::NONE;
    }

    /// Push the held directions to the output.
    pub fn apply_directions<O: GamepadOutput>(&self, mode: DirectionOutput, out: &mut O) {
        match mode {
            DirectionOutput::Hat => out.dpad(dpad::resolve(self.held)),
            DirectionOutput::LeftStick => {
                let (x, y) = dpad::axes(self.held);
                out.axes(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::button::DirBit;
    use crate::dpad::DpadDirection;
    use std::vec;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Press(u8),
        Release(u8),
        Dpad(DpadDirection),
        Axes(i8, i8),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl GamepadOutput for Recorder {
        fn press(&mut self, id: u8) {
            self.calls.push(Call::Press(id));
        }

        fn release(&mut self, id: u8) {
            self.calls.push(Call::Release(id));
        }

        fn dpad(&mut self, direction: DpadDirection) {
            self.calls.push(Call::Dpad(direction));
        }

        fn axes(&mut self, x: i8, y: i8) {
            self.calls.push(Call::Axes(x, y));
        }
    }

    fn table(entries: &[(u8, VirtualButton)]) -> BindingTable {
        let mut table = BindingTable::new();
        for &(sc, b) in entries {
            table.set(sc, b);
        }
        table
    }

    #[test]
    fn test_discrete_round_trip() {
        let table = table(&[(0x10, VirtualButton::Discrete(3))]);
        let mut remap = InputRemapper::default();
        let mut out = Recorder::default();

        remap.press(&table, 0x10, &mut out);
        assert!(remap.active().is_pressed(3));
        assert_eq!(out.calls, [Call::Press(3)]);

        remap.release(&table, 0x10, &mut out);
        assert!(!remap.active().is_pressed(3));
        assert_eq!(out.calls, [Call::Press(3), Call::Release(3)]);
    }

    #[test]
    fn test_unbound_is_noop() {
        let table = BindingTable::new();
        let mut remap = InputRemapper::default();
        let mut out = Recorder::default();

        assert_eq!(remap.press(&table, 0x2C, &mut out), None);
        assert_eq!(remap.release(&table, 0x2C, &mut out), None);
        assert!(out.calls.is_empty());
        assert_eq!(remap, InputRemapper::default());
    }

    #[test]
    fn test_directions_only_touch_held_bits() {
        let table = table(&[(0x52, VirtualButton::Direction(DirBit::Up))]);
        let mut remap = InputRemapper::default();
        let mut out = Recorder::default();

        remap.press(&table, 0x52, &mut out);
        assert_eq!(remap.held(), Directions::UP);
        assert!(out.calls.is_empty());

        remap.apply_directions(DirectionOutput::Hat, &mut out);
        remap.apply_directions(DirectionOutput::LeftStick, &mut out);
        assert_eq!(out.calls, [Call::Dpad(DpadDirection::Up), Call::Axes(0, -127)]);
    }

    fn shared_direction_sequence(release: DirectionRelease) -> Vec<Directions> {
        let table = table(&[
            (0x04, VirtualButton::Direction(DirBit::Left)),
            (0x50, VirtualButton::Direction(DirBit::Left)),
        ]);
        let mut remap = InputRemapper::new(release);
        let mut out = Recorder::default();

        let mut seen = Vec::new();
        remap.press(&table, 0x04, &mut out);
        remap.press(&table, 0x50, &mut out);
        seen.push(remap.held());
        remap.release(&table, 0x04, &mut out);
        seen.push(remap.held());
        remap.release(&table, 0x50, &mut out);
        seen.push(remap.held());
        seen
    }

    #[test]
    fn test_shared_direction_clear_release() {
        assert_eq!(
            shared_direction_sequence(DirectionRelease::Clear),
            vec![Directions::LEFT, Directions::NONE, Directions::NONE]
        );
    }

    #[test]
    fn test_shared_direction_toggle_release() {
        // The second release flips the bit back on.
        assert_eq!(
            shared_direction_sequence(DirectionRelease::Toggle),
            vec![Directions::LEFT, Directions::NONE, Directions::LEFT]
        );
    }

    #[test]
    fn test_release_all() {
        let table = table(&[
            (0x04, VirtualButton::Discrete(1)),
            (0x05, VirtualButton::Discrete(7)),
            (0x06, VirtualButton::Direction(DirBit::Down)),
        ]);
        let mut remap = InputRemapper::default();
        let mut out = Recorder::default();
        for sc in [0x04, 0x05, 0x06] {
            remap.press(&table, sc, &mut out);
        }
        out.calls.clear();

        remap.release_all(&mut out);
        assert_eq!(out.calls, [Call::Release(1), Call::Release(7)]);
        assert!(remap.active().is_empty());
        assert!(remap.held().is_empty());
    }
}
