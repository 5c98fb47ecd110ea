//! Remapper configuration.

use crate::profile::{Profile, JOYSTICK};

/// What releasing a direction key does to the held direction bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DirectionRelease {
    /// Clear the bit (`held &= !bit`). A direction bound to two keys
    /// ends on the first release.
    #[default]
    Clear,
    /// Toggle the bit (`held ^= bit`). A release without a matching press
    /// sets the bit.
    Toggle,
}

/// Build-time configuration of a remapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RemapConfig {
    pub profile: &'static Profile,
    /// Report raw and decoded key events to the status sink instead of
    /// rendering the controller snapshot.
    pub trace_keycodes: bool,
    pub direction_release: DirectionRelease,
}

impl RemapConfig {
    #[must_use]
    pub const fn new(profile: &'static Profile) -> Self {
        Self {
            profile,
            trace_keycodes: false,
            direction_release: DirectionRelease::Clear,
        }
    }

    #[must_use]
    pub const fn with_trace(mut self, trace_keycodes: bool) -> Self {
        self.trace_keycodes = trace_keycodes;
        self
    }

    #[must_use]
    pub const fn with_direction_release(mut self, release: DirectionRelease) -> Self {
        self.direction_release = release;
        self
    }
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self::new(&JOYSTICK)
    }
}
