//! UART-based keyboard input source.
//!
//! Reads keyboard link lines from UART, feeds them to a [`KeyboardLink`]
//! and hands out the resulting key events one at a time.
//!
//! # Protocol
//!
//! Report: `K<16 hex digits>*<crc8>\n`
//! Detach: `D*<crc8>\n`
//!
//! See [`keyboard_to_gamepad::parser`] for the full protocol specification.
//!
//! # Pins
//!
//! Uses UART1:
//! - GPIO 8: TX
//! - GPIO 9: RX

use embassy_rp::uart::{Async, Error as UartError, UartRx};
use heapless::Vec;
use keyboard_to_gamepad::{InputError, InputSource, KeyEvent, KeyboardLink, MAX_LINE_LENGTH};

/// Convert UART errors to [`InputError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `UartError` and `InputError` are defined in external crates).
#[inline]
fn uart_error_to_input_error(e: UartError) -> InputError {
    match e {
        UartError::Framing => InputError::Framing,
        UartError::Overrun => InputError::BufferOverflow,
        _ => InputError::Io,
    }
}

/// UART-based input source for receiving key events.
pub struct UartInputSource<'d> {
    rx: UartRx<'d, Async>,
    buffer: Vec<u8, MAX_LINE_LENGTH>,
    link: KeyboardLink,
}

impl<'d> UartInputSource<'d> {
    /// Create a new UART input source from the given UART receiver.
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>) -> Self {
        Self {
            rx,
            buffer: Vec::new(),
            link: KeyboardLink::new(),
        }
    }

    /// Read bytes until a newline is found or buffer is full.
    ///
    /// If a line exceeds the buffer capacity, the rest of the line is
    /// discarded to prevent cascading parse errors on subsequent reads.
    async fn read_line(&mut self) -> Result<(), InputError> {
        self.buffer.clear();
        let mut byte = [0u8; 1];

        loop {
            self.rx
                .read(&mut byte)
                .await
                .map_err(uart_error_to_input_error)?;

            if byte[0] == b'\n' {
                return Ok(());
            }

            if self.buffer.push(byte[0]).is_err() {
                // Buffer overflow - discard rest of line until newline
                loop {
                    self.rx
                        .read(&mut byte)
                        .await
                        .map_err(uart_error_to_input_error)?;
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                return Err(InputError::BufferOverflow);
            }
        }
    }
}

impl InputSource for UartInputSource<'_> {
    async fn receive(&mut self) -> Result<KeyEvent, InputError> {
        loop {
            if let Some(event) = self.link.pop() {
                return Ok(event);
            }
            if let Err(e) = self.read_line().await {
                // The bridge releases everything on error, held keys
                // must come back as presses with the next report.
                self.link.forget();
                return Err(e);
            }
            self.link.feed_line(&self.buffer)?;
        }
    }

    fn is_connected(&self) -> bool {
        self.link.is_attached()
    }
}
