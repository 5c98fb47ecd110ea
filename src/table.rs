//! Scancode to virtual-button lookup table.

use crate::button::VirtualButton;

/// Number of distinct scancodes.
pub const SCANCODE_COUNT: usize = 256;

/// Fixed-size mapping from every scancode to an optional [`VirtualButton`].
///
/// Indexed by the full `u8` range, so lookups can never go out of bounds.
/// Absence is distinct from a binding to `Discrete(0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingTable {
    entries: [Option<VirtualButton>; SCANCODE_COUNT],
}

impl BindingTable {
    /// An empty table with no bindings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [None; SCANCODE_COUNT],
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, scancode: u8) -> Option<VirtualButton> {
        self.entries[usize::from(scancode)]
    }

    /// Bind `scancode`, overwriting any previous binding.
    #[inline]
    pub fn set(&mut self, scancode: u8, button: VirtualButton) {
        self.entries[usize::from(scancode)] = Some(button);
    }

    #[inline]
    #[must_use]
    pub fn is_bound(&self, scancode: u8) -> bool {
        self.entries[usize::from(scancode)].is_some()
    }

    /// Number of bound scancodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Iterate over `(scancode, button)` pairs in scancode order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, VirtualButton)> + '_ {
        (0..=u8::MAX).filter_map(move |sc| self.get(sc).map(|b| (sc, b)))
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}
