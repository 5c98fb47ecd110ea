//! Gamepad output traits and error types.

use core::future::Future;

use crate::dpad::DpadDirection;

/// Synchronous gamepad sink driven by the remapper.
///
/// Calls only update in-memory state; sending it to the host happens
/// separately through a [`ReportSink`].
pub trait GamepadOutput {
    /// Press the discrete button with profile id `id`.
    fn press(&mut self, id: u8);

    /// Release the discrete button with profile id `id`.
    fn release(&mut self, id: u8);

    /// Set the resolved D-pad direction.
    fn dpad(&mut self, direction: DpadDirection);

    /// Set the left stick axes. Positive Y points down.
    fn axes(&mut self, x: i8, y: i8);
}

impl<O: GamepadOutput + ?Sized> GamepadOutput for &mut O {
    fn press(&mut self, id: u8) {
        (**self).press(id);
    }

    fn release(&mut self, id: u8) {
        (**self).release(id);
    }

    fn dpad(&mut self, direction: DpadDirection) {
        (**self).dpad(direction);
    }

    fn axes(&mut self, x: i8, y: i8) {
        (**self).axes(x, y);
    }
}

/// Largest encoded report of any profile.
pub const MAX_REPORT_SIZE: usize = 16;

/// An input report that can be sent to the USB host.
pub trait HidReport: GamepadOutput + Copy + PartialEq {
    /// Encoded size in bytes, at most [`MAX_REPORT_SIZE`].
    const SIZE: usize;

    /// Report with nothing pressed and everything centered.
    fn neutral() -> Self;

    /// Encode into `buf`, returning the number of bytes written.
    fn write_to(&self, buf: &mut [u8; MAX_REPORT_SIZE]) -> usize;
}

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
    /// Report dropped (e.g., host not polling fast enough).
    Dropped,
    /// Endpoint busy.
    Busy,
}

impl core::fmt::Display for OutputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            OutputError::Io => "output I/O error",
            OutputError::NotReady => "output not ready",
            OutputError::Dropped => "report dropped",
            OutputError::Busy => "endpoint busy",
        })
    }
}

/// Async trait for report destinations.
///
/// This trait abstracts where encoded reports go (USB HID endpoint, a
/// signal to another task, a test recorder).
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ReportSink<R> {
    /// Send a report.
    ///
    /// May block until the previous report has been sent.
    fn send(&mut self, report: &R) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the sink is ready to accept reports.
    fn is_ready(&self) -> bool;
}
