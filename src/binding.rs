//! Interactive bind phase.
//!
//! While binding, every raw key press is consumed to fill the
//! [`BindingTable`]: each new scancode takes the next slot of the profile,
//! repeats are reported and skipped, and Escape ends the phase. Pressing
//! Escape before binding anything applies the profile defaults instead.
//! Binding also ends once the profile runs out of slots.
//!
//! ```text
//!             new key: assign slot, prompt next
//!             known key: "already bound"
//!               +-----+
//!               v     |
//!  start --> [Binding] ---- Escape --------------> [Bound]
//!                 |      (defaults if no slot used)   ^
//!                 +----- slots exhausted -------------+
//! ```

use crate::button::VirtualButton;
use crate::keycode::ESCAPE_CODE;
use crate::profile::Profile;
use crate::status::{Notification, StatusSink};
use crate::table::BindingTable;

/// Phase of the binding state machine. `Bound` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindPhase {
    Binding,
    Bound,
}

/// What a bind-phase key press did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindOutcome {
    /// The scancode took the next slot.
    Assigned(VirtualButton),
    /// The scancode was already bound; nothing changed.
    AlreadyBound,
    /// Escape ended binding.
    Finished { defaults_applied: bool },
    /// No slot left; binding ended without applying defaults.
    OutOfSlots,
    /// Binding had already ended.
    Ignored,
}

/// Drives the bind phase for one profile.
#[derive(Clone, Copy, Debug)]
pub struct BindingController {
    profile: &'static Profile,
    counter: u8,
    phase: BindPhase,
}

impl BindingController {
    #[must_use]
    pub const fn new(profile: &'static Profile) -> Self {
        Self {
            profile,
            counter: profile.slot_base,
            phase: BindPhase::Binding,
        }
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> BindPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        matches!(self.phase, BindPhase::Bound)
    }

    /// Current slot counter, starting at the profile's `slot_base`.
    #[inline]
    #[must_use]
    pub const fn counter(&self) -> u8 {
        self.counter
    }

    /// Number of slots assigned by key presses (defaults not counted).
    #[inline]
    #[must_use]
    pub const fn slots_assigned(&self) -> u8 {
        self.counter - self.profile.slot_base
    }

    #[inline]
    #[must_use]
    pub const fn profile(&self) -> &'static Profile {
        self.profile
    }

    /// The prompt shown before the first key press, if the profile names
    /// any slot.
    #[must_use]
    pub fn first_prompt(&self) -> Option<Notification> {
        self.profile
            .prompt_label(self.counter)
            .map(|label| Notification::Prompt { label, first: true })
    }

    /// Consume one raw key press of the bind phase.
    pub fn handle_raw_press<S: StatusSink>(
        &mut self,
        table: &mut BindingTable,
        scancode: u8,
        status: &mut S,
    ) -> BindOutcome {
        if self.is_bound() {
            return BindOutcome::Ignored;
        }

        if scancode == ESCAPE_CODE {
            self.phase = BindPhase::Bound;
            let defaults_applied = self.counter == self.profile.slot_base;
            if defaults_applied {
                status.notify(&Notification::DefaultsApplied);
                for default in self.profile.defaults {
                    let label = self.profile.label_for(default.button);
                    Self::assign(table, default.scancode, default.button, label, status);
                }
            }
            info!("binding finished, {} slots assigned", self.slots_assigned());
            status.notify(&Notification::Finished);
            return BindOutcome::Finished { defaults_applied };
        }

        if self.counter >= self.profile.max_slot {
            self.phase = BindPhase::Bound;
            info!("out of slots after {} bindings", self.slots_assigned());
            status.notify(&Notification::OutOfSlots);
            return BindOutcome::OutOfSlots;
        }

        let slot = self.profile.slot(self.counter);
        if !Self::assign(table, scancode, slot.button, slot.label, status) {
            return BindOutcome::AlreadyBound;
        }
        self.counter += 1;

        if let Some(label) = self.profile.prompt_label(self.counter) {
            status.notify(&Notification::Prompt {
                label,
                first: false,
            });
        }
        BindOutcome::Assigned(slot.button)
    }

    /// Bind `scancode` unless it already has a binding.
    fn assign<S: StatusSink>(
        table: &mut BindingTable,
        scancode: u8,
        button: VirtualButton,
        label: &'static str,
        status: &mut S,
    ) -> bool {
        if table.is_bound(scancode) {
            debug!("scancode {:x} already bound", scancode);
            status.notify(&Notification::AlreadyBound { scancode });
            return false;
        }
        table.set(scancode, button);
        status.notify(&Notification::Bound {
            scancode,
            button,
            label,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::button::DirBit;
    use crate::profile::{switch, JOYSTICK, SWITCH, XINPUT};
    use crate::view::ControllerView;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        notes: Vec<Notification>,
    }

    impl StatusSink for Recorder {
        fn notify(&mut self, note: &Notification) {
            self.notes.push(*note);
        }

        fn render(&mut self, _view: &ControllerView) {}
    }

    fn press_all(
        ctrl: &mut BindingController,
        table: &mut BindingTable,
        status: &mut Recorder,
        keys: &[u8],
    ) -> Vec<BindOutcome> {
        keys.iter()
            .map(|&k| ctrl.handle_raw_press(table, k, status))
            .collect()
    }

    #[test]
    fn test_sequential_assignment_from_base() {
        let mut ctrl = BindingController::new(&JOYSTICK);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        let outcomes = press_all(&mut ctrl, &mut table, &mut status, &[0x2C, 0x04, 0x05]);
        assert_eq!(
            outcomes,
            [
                BindOutcome::Assigned(VirtualButton::Discrete(1)),
                BindOutcome::Assigned(VirtualButton::Discrete(2)),
                BindOutcome::Assigned(VirtualButton::Discrete(3)),
            ]
        );
        assert_eq!(ctrl.slots_assigned(), 3);
        assert_eq!(table.get(0x05), Some(VirtualButton::Discrete(3)));
    }

    #[test]
    fn test_switch_slots_use_fixed_buttons() {
        let mut ctrl = BindingController::new(&SWITCH);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        press_all(&mut ctrl, &mut table, &mut status, &[0x1A, 0x07, 0x16, 0x04, 0x0D]);
        assert_eq!(table.get(0x1A), Some(VirtualButton::Direction(DirBit::Up)));
        assert_eq!(table.get(0x04), Some(VirtualButton::Direction(DirBit::Left)));
        assert_eq!(table.get(0x0D), Some(VirtualButton::Discrete(switch::A)));
    }

    #[test]
    fn test_duplicate_press_changes_nothing() {
        let mut ctrl = BindingController::new(&SWITCH);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        ctrl.handle_raw_press(&mut table, 0x2C, &mut status);
        let before = table.clone();
        let outcome = ctrl.handle_raw_press(&mut table, 0x2C, &mut status);

        assert_eq!(outcome, BindOutcome::AlreadyBound);
        assert_eq!(table, before);
        assert_eq!(ctrl.slots_assigned(), 1);
        assert_eq!(
            status.notes.last(),
            Some(&Notification::AlreadyBound { scancode: 0x2C })
        );
    }

    #[test]
    fn test_escape_first_applies_defaults() {
        let mut ctrl = BindingController::new(&XINPUT);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        let outcome = ctrl.handle_raw_press(&mut table, ESCAPE_CODE, &mut status);
        assert_eq!(outcome, BindOutcome::Finished { defaults_applied: true });
        assert!(ctrl.is_bound());

        let expected: Vec<_> = XINPUT.defaults.iter().map(|d| (d.scancode, d.button)).collect();
        let mut actual: Vec<_> = table.iter().collect();
        let mut sorted = expected.clone();
        sorted.sort_by_key(|&(sc, _)| sc);
        actual.sort_by_key(|&(sc, _)| sc);
        assert_eq!(actual, sorted);

        assert_eq!(status.notes.first(), Some(&Notification::DefaultsApplied));
        assert_eq!(status.notes.last(), Some(&Notification::Finished));
    }

    #[test]
    fn test_escape_after_binding_skips_defaults() {
        let mut ctrl = BindingController::new(&SWITCH);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        press_all(&mut ctrl, &mut table, &mut status, &[0x2C]);
        let outcome = ctrl.handle_raw_press(&mut table, ESCAPE_CODE, &mut status);

        assert_eq!(outcome, BindOutcome::Finished { defaults_applied: false });
        assert_eq!(table.len(), 1);
        assert!(!status.notes.contains(&Notification::DefaultsApplied));
    }

    #[test]
    fn test_slot_exhaustion_ends_binding_without_defaults() {
        let mut ctrl = BindingController::new(&SWITCH);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        let keys: Vec<u8> = (0x04..0x04 + 16).collect();
        press_all(&mut ctrl, &mut table, &mut status, &keys);
        assert!(!ctrl.is_bound());
        assert_eq!(table.len(), 16);

        let outcome = ctrl.handle_raw_press(&mut table, 0x30, &mut status);
        assert_eq!(outcome, BindOutcome::OutOfSlots);
        assert!(ctrl.is_bound());
        assert!(!table.is_bound(0x30));
        assert_eq!(status.notes.last(), Some(&Notification::OutOfSlots));

        // Later presses, Escape included, no longer touch the table.
        assert_eq!(
            ctrl.handle_raw_press(&mut table, ESCAPE_CODE, &mut status),
            BindOutcome::Ignored
        );
        assert_eq!(table.len(), 16);
    }

    #[test]
    fn test_joystick_labels_run_out() {
        let mut ctrl = BindingController::new(&JOYSTICK);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        let keys: Vec<u8> = (0x04..0x04 + 15).collect();
        press_all(&mut ctrl, &mut table, &mut status, &keys);

        assert_eq!(
            status.notes.last(),
            Some(&Notification::Bound {
                scancode: 0x12,
                button: VirtualButton::Discrete(15),
                label: crate::profile::UNKNOWN_LABEL,
            })
        );
    }

    #[test]
    fn test_prompts_follow_slot_order() {
        let mut ctrl = BindingController::new(&SWITCH);
        let mut table = BindingTable::new();
        let mut status = Recorder::default();

        assert_eq!(
            ctrl.first_prompt(),
            Some(Notification::Prompt {
                label: "D-Pad Up",
                first: true
            })
        );
        ctrl.handle_raw_press(&mut table, 0x2C, &mut status);
        assert_eq!(
            status.notes,
            [
                Notification::Bound {
                    scancode: 0x2C,
                    button: VirtualButton::Direction(DirBit::Up),
                    label: "D-Pad Up",
                },
                Notification::Prompt {
                    label: "D-Pad Right",
                    first: false
                },
            ]
        );
    }
}
