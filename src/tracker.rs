//! Keyboard report tracking.
//!
//! Boot-protocol keyboards report their whole state every time something
//! changes. [`ReportTracker`] diffs consecutive reports into individual
//! press/release events, and [`KeyboardLink`] drives it from link lines,
//! buffering the events until the remapper takes them.

use heapless::{Deque, Vec};

use crate::input::{InputError, KeyEvent};
use crate::keycode::{KeyCode, KeyModifiers};
use crate::parser::{parse_line, LinkMessage};

/// Size of a boot-protocol keyboard report in bytes.
pub const REPORT_LEN: usize = 8;

/// Number of key slots in a boot-protocol report.
pub const KEY_SLOTS: usize = 6;

/// Most events a single report can produce: every modifier and key
/// released, every modifier and key pressed, and one decoded character
/// per pressed key.
pub const MAX_EVENTS_PER_REPORT: usize = 2 * (8 + KEY_SLOTS) + KEY_SLOTS;

/// Depth of the [`KeyboardLink`] event queue.
pub const EVENT_QUEUE_DEPTH: usize = 2 * MAX_EVENTS_PER_REPORT;

/// An 8-byte boot-protocol keyboard report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifiers: KeyModifiers,
    pub reserved: u8,
    /// Usage codes of held keys, unused slots are 0.
    pub keys: [u8; KEY_SLOTS],
}

impl KeyboardReport {
    /// Nothing held.
    pub const EMPTY: Self = Self {
        modifiers: KeyModifiers::empty(),
        reserved: 0,
        keys: [0; KEY_SLOTS],
    };

    #[must_use]
    pub fn from_bytes(bytes: [u8; REPORT_LEN]) -> Self {
        let mut keys = [0u8; KEY_SLOTS];
        keys.copy_from_slice(&bytes[2..]);
        Self {
            modifiers: KeyModifiers::from_bits_retain(bytes[0]),
            reserved: bytes[1],
            keys,
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let mut bytes = [0u8; REPORT_LEN];
        bytes[0] = self.modifiers.bits();
        bytes[1] = self.reserved;
        bytes[2..].copy_from_slice(&self.keys);
        bytes
    }

    /// Whether the keyboard signalled too many keys at once.
    #[inline]
    #[must_use]
    pub fn is_rollover(&self) -> bool {
        self.keys.contains(&KeyCode::ERROR_ROLL_OVER.0)
    }

    #[inline]
    #[must_use]
    pub fn holds(&self, code: u8) -> bool {
        code != 0 && self.keys.contains(&code)
    }

    /// Held key codes, each reported once, in slot order.
    pub fn held(&self) -> impl Iterator<Item = u8> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(|&(i, &k)| k != 0 && !self.keys[..i].contains(&k))
            .map(|(_, &k)| k)
    }
}

/// Turns consecutive keyboard reports into key events.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportTracker {
    previous: KeyboardReport,
}

impl ReportTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous: KeyboardReport::EMPTY,
        }
    }

    /// The last accepted report.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &KeyboardReport {
        &self.previous
    }

    /// Forget every held key without producing events.
    pub fn reset(&mut self) {
        self.previous = KeyboardReport::EMPTY;
    }

    /// Diff `report` against the previous one.
    ///
    /// Releases come before presses so a key moving between slots never
    /// appears held twice. A new non-modifier key with a character is
    /// followed by its [`KeyEvent::Decoded`] event. Rollover reports are
    /// dropped and leave the state unchanged.
    pub fn update(&mut self, report: &KeyboardReport) -> Vec<KeyEvent, MAX_EVENTS_PER_REPORT> {
        let mut events = Vec::new();
        if report.is_rollover() {
            trace!("rollover report ignored");
            return events;
        }

        let prev = self.previous;
        let released_mods = prev.modifiers.difference(report.modifiers);
        let pressed_mods = report.modifiers.difference(prev.modifiers);
        let shift = report.modifiers.shift();

        // Capacity covers the worst case, pushes cannot fail.
        for code in released_mods.scancodes() {
            let _ = events.push(KeyEvent::Release(code));
        }
        for code in prev.held().filter(|&k| !report.holds(k)) {
            let _ = events.push(KeyEvent::Release(code));
        }
        for code in pressed_mods.scancodes() {
            let _ = events.push(KeyEvent::Press(code));
        }
        for code in report.held().filter(|&k| !prev.holds(k)) {
            let _ = events.push(KeyEvent::Press(code));
            let key = KeyCode(code);
            if !key.is_modifier() {
                if let Some(c) = key.to_ascii(shift) {
                    let _ = events.push(KeyEvent::Decoded(c));
                }
            }
        }

        self.previous = *report;
        events
    }
}

/// Keyboard link endpoint: parses lines and queues the resulting events.
pub struct KeyboardLink {
    tracker: ReportTracker,
    queue: Deque<KeyEvent, EVENT_QUEUE_DEPTH>,
    attached: bool,
}

impl KeyboardLink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tracker: ReportTracker::new(),
            queue: Deque::new(),
            attached: false,
        }
    }

    /// Feed one received line.
    ///
    /// Any error (bad line, detach line or queue overflow) drops every
    /// pending event and forgets held keys; the caller is expected to
    /// release everything it derived from them.
    pub fn feed_line(&mut self, line: &[u8]) -> Result<(), InputError> {
        let message = match parse_line(line) {
            Ok(message) => message,
            Err(e) => {
                // Controls are released on any input error, so keys still
                // held must be pressed again by the next report.
                debug!("bad link line, forgetting held keys");
                self.forget();
                return Err(e.into());
            }
        };
        match message {
            LinkMessage::Report(report) => {
                if !self.attached {
                    info!("keyboard attached");
                    self.attached = true;
                }
                let events = self.tracker.update(&report);
                if self.queue.capacity() - self.queue.len() < events.len() {
                    warn!("key event queue overflow, dropping {} events", self.queue.len());
                    self.forget();
                    return Err(InputError::BufferOverflow);
                }
                for event in events {
                    let _ = self.queue.push_back(event);
                }
                Ok(())
            }
            LinkMessage::Detached => {
                info!("keyboard detached");
                self.attached = false;
                self.forget();
                Err(InputError::Disconnected)
            }
        }
    }

    /// Take the oldest pending event.
    #[inline]
    pub fn pop(&mut self) -> Option<KeyEvent> {
        self.queue.pop_front()
    }

    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Drop pending events and held-key state.
    pub fn forget(&mut self) {
        self.queue.clear();
        self.tracker.reset();
    }
}

impl Default for KeyboardLink {
    fn default() -> Self {
        Self::new()
    }
}
