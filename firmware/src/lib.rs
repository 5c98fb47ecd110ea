//! USB keyboard to gamepad remapper for RP2040.
//!
//! This crate provides the embedded side of the remapper: keyboard
//! reports arrive over UART from a USB-host co-processor, go through the
//! [`keyboard_to_gamepad`] remapper and leave as USB HID gamepad reports.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives keyboard link lines over UART (115200 baud, 8N1)
//! 2. Binds keys to gamepad buttons interactively, or loads defaults on Escape
//! 3. Outputs the remapped state as a USB HID gamepad
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Serial transmit |
//! | UART1 RX | 9    | Serial receive (keyboard link input) |
//! | I2C0 SDA | 4    | SSD1306 status display |
//! | I2C0 SCL | 5    | SSD1306 status display |
//! | LED      | 25   | On-board LED (error indicator) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with three concurrent tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Remap Task**: Reads UART lines, runs the [`KeyboardBridge`], signals reports
//! - **Output Task**: Receives report signals and sends them as USB HID reports
//!
//! Communication between tasks uses Embassy's [`Signal`](embassy_sync::signal::Signal)
//! with "latest value wins" semantics, ensuring the USB output always reflects
//! the most recent gamepad state.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`profile-switch`** (default), **`profile-xinput`**, **`profile-joystick`**:
//!   gamepad profile and matching HID descriptor
//! - **`dpad-stick`**: Switch profile with the direction keys on the left
//!   stick instead of the hat
//! - **`display-oled`** (default), **`display-log`**: status display backend
//! - **`keycode-trace`**: trace raw keycodes instead of drawing the controller

#![no_std]

#[cfg(any(
    all(feature = "profile-joystick", feature = "profile-xinput"),
    all(feature = "profile-joystick", feature = "profile-switch"),
    all(feature = "profile-xinput", feature = "profile-switch"),
))]
compile_error!("Enable only one of `profile-joystick`, `profile-xinput` and `profile-switch` - they define conflicting HID descriptors");

#[cfg(not(any(
    feature = "profile-joystick",
    feature = "profile-xinput",
    feature = "profile-switch"
)))]
compile_error!("Enable one of `profile-joystick`, `profile-xinput` or `profile-switch`");

#[cfg(all(feature = "display-oled", feature = "display-log"))]
compile_error!("Cannot enable both `display-oled` and `display-log`");

#[cfg(not(any(feature = "display-oled", feature = "display-log")))]
compile_error!("Enable one of `display-oled` or `display-log`");

// Re-export core types for convenience
pub use keyboard_to_gamepad::{
    BridgeError, GamepadRemapper, HidReport, InputError, InputSource, KeyEvent, KeyboardBridge,
    KeyboardLink, OutputError, Profile, RemapConfig, ReportSink, StatusSink, MAX_LINE_LENGTH,
};

pub mod display;
pub mod uart_input;
pub mod usb_output;

pub use display::ActiveStatus;
pub use uart_input::UartInputSource;
pub use usb_output::{configure_usb_hid, ReportSignal, UsbHidOutput};

/// HID report of the selected profile.
#[cfg(feature = "profile-joystick")]
pub type ActiveReport = keyboard_to_gamepad::JoystickReport;
#[cfg(feature = "profile-xinput")]
pub type ActiveReport = keyboard_to_gamepad::XInputReport;
#[cfg(feature = "profile-switch")]
pub type ActiveReport = keyboard_to_gamepad::SwitchReport;

/// The selected gamepad profile.
#[cfg(feature = "profile-joystick")]
pub const ACTIVE_PROFILE: &Profile = &keyboard_to_gamepad::JOYSTICK;
#[cfg(feature = "profile-xinput")]
pub const ACTIVE_PROFILE: &Profile = &keyboard_to_gamepad::XINPUT;
#[cfg(all(feature = "profile-switch", not(feature = "dpad-stick")))]
pub const ACTIVE_PROFILE: &Profile = &keyboard_to_gamepad::SWITCH;
#[cfg(feature = "dpad-stick")]
pub const ACTIVE_PROFILE: &Profile = &keyboard_to_gamepad::SWITCH_LEFT_STICK;

/// Remapper configuration selected by the build features.
pub const REMAP_CONFIG: RemapConfig =
    RemapConfig::new(ACTIVE_PROFILE).with_trace(cfg!(feature = "keycode-trace"));
