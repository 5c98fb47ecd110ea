//! Keyboard input source trait and error types.

use core::future::Future;

use crate::parser::LinkError;

/// One event from the keyboard.
///
/// `Press` and `Release` carry raw HID usage codes (modifiers as
/// `0xE0..=0xE7`). `Decoded` carries the ASCII code of a key that produced
/// a character, and is reported after the matching `Press`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Press(u8),
    Release(u8),
    Decoded(u8),
}

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// UART/communication I/O error.
    Io,
    /// Malformed link line.
    Parse,
    /// Checksum mismatch.
    Checksum,
    /// Keyboard detached or link lost.
    Disconnected,
    /// Buffer overflow (line too long).
    BufferOverflow,
    /// UART framing error.
    Framing,
}

impl From<LinkError> for InputError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Parse => InputError::Parse,
            LinkError::Checksum => InputError::Checksum,
        }
    }
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            InputError::Io => "input I/O error",
            InputError::Parse => "malformed keyboard line",
            InputError::Checksum => "checksum mismatch",
            InputError::Disconnected => "keyboard disconnected",
            InputError::BufferOverflow => "line too long",
            InputError::Framing => "framing error",
        })
    }
}

/// Async trait for keyboard event sources.
///
/// This trait abstracts where key events come from (a UART link to a USB
/// host chip, a native USB host stack, a scripted test source).
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait InputSource {
    /// Wait for and receive the next key event.
    ///
    /// Yields when no data is available.
    fn receive(&mut self) -> impl Future<Output = Result<KeyEvent, InputError>>;

    /// Check if a keyboard is attached.
    fn is_connected(&self) -> bool;
}
