//! The remapper context: binding table, bind phase and run phase in one
//! owned value driven by the poll loop.

use crate::binding::{BindOutcome, BindingController};
use crate::button::{ActiveButtons, Directions, VirtualButton};
use crate::config::RemapConfig;
use crate::input::KeyEvent;
use crate::output::GamepadOutput;
use crate::remap::InputRemapper;
use crate::status::{Notification, StatusSink};
use crate::table::BindingTable;
use crate::view::ControllerView;

/// Keyboard-to-gamepad remapper.
///
/// Starts in the bind phase, where raw presses fill the binding table, and
/// switches to the run phase for good once binding ends. In the run phase
/// raw presses and releases drive the output `O`; the status sink `S` gets
/// either a controller snapshot or, with keycode tracing on, a trace line
/// per event.
///
/// # Example
///
/// ```
/// use keyboard_to_gamepad::profile::SWITCH;
/// use keyboard_to_gamepad::{GamepadRemapper, NullStatus, RemapConfig, SwitchReport, HidReport};
///
/// let mut remapper = GamepadRemapper::new(
///     RemapConfig::new(&SWITCH),
///     SwitchReport::neutral(),
///     NullStatus,
/// );
/// remapper.handle_raw_press(0x29); // Escape: default bindings
/// remapper.handle_raw_press(0x19); // V is bound to A
/// assert_eq!(remapper.output().buttons, 1 << 2);
/// ```
pub struct GamepadRemapper<O, S> {
    config: RemapConfig,
    table: BindingTable,
    binding: BindingController,
    input: InputRemapper,
    output: O,
    status: S,
}

impl<O: GamepadOutput, S: StatusSink> GamepadRemapper<O, S> {
    #[must_use]
    pub fn new(config: RemapConfig, output: O, status: S) -> Self {
        Self {
            table: BindingTable::new(),
            binding: BindingController::new(config.profile),
            input: InputRemapper::new(config.direction_release),
            config,
            output,
            status,
        }
    }

    /// Show the first bind prompt.
    pub fn begin(&mut self) {
        info!("profile {}, binding started", self.config.profile.name);
        if let Some(prompt) = self.binding.first_prompt() {
            self.status.notify(&prompt);
        }
    }

    /// A raw key went down.
    ///
    /// During the bind phase this binds or finishes; afterwards it presses
    /// whatever the scancode is bound to.
    pub fn handle_raw_press(&mut self, scancode: u8) -> Option<VirtualButton> {
        if !self.binding.is_bound() {
            let outcome = self
                .binding
                .handle_raw_press(&mut self.table, scancode, &mut self.status);
            return match outcome {
                BindOutcome::Assigned(button) => Some(button),
                _ => None,
            };
        }
        let pressed = self.input.press(&self.table, scancode, &mut self.output);
        self.refresh(Notification::RawPress { scancode }, pressed);
        pressed
    }

    /// A raw key went up. Ignored during the bind phase.
    pub fn handle_raw_release(&mut self, scancode: u8) -> Option<VirtualButton> {
        if !self.binding.is_bound() {
            return None;
        }
        let released = self.input.release(&self.table, scancode, &mut self.output);
        self.refresh(Notification::RawRelease { scancode }, released);
        released
    }

    /// A decoded character. Only ever traced, never remapped.
    pub fn handle_decoded_press(&mut self, code: u8) {
        if self.config.trace_keycodes {
            self.status.notify(&Notification::DecodedKey { code });
        }
    }

    pub fn handle_event(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Press(scancode) => {
                self.handle_raw_press(scancode);
            }
            KeyEvent::Release(scancode) => {
                self.handle_raw_release(scancode);
            }
            KeyEvent::Decoded(code) => self.handle_decoded_press(code),
        }
    }

    /// Push the held directions to the output, once per poll.
    pub fn tick(&mut self) {
        self.input
            .apply_directions(self.config.profile.direction_output, &mut self.output);
    }

    /// Release every held button and direction, then tick.
    pub fn release_all(&mut self) {
        self.input.release_all(&mut self.output);
        self.tick();
    }

    /// Snapshot of the held controls in the profile layout.
    #[must_use]
    pub fn view(&self) -> ControllerView {
        ControllerView::project(
            &self.config.profile.layout,
            self.input.active(),
            self.input.held(),
        )
    }

    fn refresh(&mut self, trace: Notification, mapped: Option<VirtualButton>) {
        if self.config.trace_keycodes {
            self.status.notify(&trace);
        } else if mapped.is_some() {
            let view = self.view();
            self.status.render(&view);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    #[inline]
    #[must_use]
    pub fn slots_assigned(&self) -> u8 {
        self.binding.slots_assigned()
    }

    #[inline]
    #[must_use]
    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RemapConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn active(&self) -> ActiveButtons {
        self.input.active()
    }

    #[inline]
    #[must_use]
    pub fn held(&self) -> Directions {
        self.input.held()
    }

    #[inline]
    pub fn output(&self) -> &O {
        &self.output
    }

    #[inline]
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    #[inline]
    pub fn status(&self) -> &S {
        &self.status
    }

    #[inline]
    pub fn status_mut(&mut self) -> &mut S {
        &mut self.status
    }

    /// Decompose the remapper into its output and status sink.
    pub fn into_parts(self) -> (O, S) {
        (self.output, self.status)
    }
}
