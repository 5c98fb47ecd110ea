//! Keyboard-to-gamepad binding and remapping engine.
//!
//! This crate turns key presses from a USB keyboard into gamepad input
//! without any platform-specific dependencies. It can be used both in
//! embedded `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! Operation has two phases:
//!
//! 1. **Binding**: each new key pressed is bound to the next button the
//!    active [`Profile`] prompts for. Escape finishes binding; pressing it
//!    before binding anything loads the profile defaults instead.
//! 2. **Running**: bound keys press and release gamepad buttons or hold
//!    D-pad directions. Unbound keys are ignored.
//!
//! The crate is organized into several modules:
//!
//! - [`keycode`], [`button`]: key codes and virtual buttons
//! - [`profile`]: build-time gamepad profiles ([`JOYSTICK`], [`XINPUT`], [`SWITCH`])
//! - [`table`], [`binding`]: the binding table and the bind phase
//! - [`remap`], [`dpad`]: run-phase remapping and D-pad resolution
//! - [`remapper`]: the context tying both phases together ([`GamepadRemapper`])
//! - [`status`], [`view`]: user messages and the controller snapshot
//! - [`output`], [`report`]: output traits and HID report models
//! - [`input`], [`parser`], [`tracker`]: keyboard link protocol and events
//! - [`bridge`]: orchestrates input-to-output flow ([`KeyboardBridge`])
//!
//! # Protocol
//!
//! The keyboard link carries boot-protocol keyboard reports as text lines:
//!
//! ```text
//! K<16 hex digits>*<crc8>\n
//! D*<crc8>\n
//! ```
//!
//! # Example
//!
//! ```rust
//! use keyboard_to_gamepad::profile::SWITCH;
//! use keyboard_to_gamepad::{
//!     GamepadRemapper, HidReport, KeyCode, NullStatus, RemapConfig, SwitchReport,
//! };
//!
//! let mut remapper =
//!     GamepadRemapper::new(RemapConfig::new(&SWITCH), SwitchReport::neutral(), NullStatus);
//!
//! // Bind Space to the first slot (D-pad up), then finish.
//! remapper.handle_raw_press(KeyCode::SPACE.0);
//! remapper.handle_raw_press(KeyCode::ESCAPE.0);
//! assert!(remapper.is_bound());
//!
//! remapper.handle_raw_press(KeyCode::SPACE.0);
//! remapper.tick();
//! assert_eq!(remapper.output().hat, 0);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded)
//! - **`log`**: Route internal logging to the `log` facade
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

pub mod binding;
pub mod bridge;
pub mod button;
pub mod config;
pub mod dpad;
pub mod input;
pub mod keycode;
pub mod output;
pub mod parser;
pub mod profile;
pub mod remap;
pub mod remapper;
pub mod report;
pub mod status;
pub mod table;
pub mod tracker;
pub mod view;

// Re-export main types at crate root
pub use binding::{BindOutcome, BindPhase, BindingController};
pub use bridge::{BridgeError, KeyboardBridge};
pub use button::{ActiveButtons, DirBit, Directions, VirtualButton};
pub use config::{DirectionRelease, RemapConfig};
pub use dpad::{resolve, DpadDirection, DPAD_TABLE};
pub use input::{InputError, InputSource, KeyEvent};
pub use keycode::{KeyCode, KeyModifiers, ESCAPE_CODE};
pub use output::{GamepadOutput, HidReport, OutputError, ReportSink, MAX_REPORT_SIZE};
pub use parser::{parse_line, LinkMessage, MAX_LINE_LENGTH};
pub use profile::{Profile, JOYSTICK, SWITCH, SWITCH_LEFT_STICK, XINPUT};
pub use remap::InputRemapper;
pub use remapper::GamepadRemapper;
pub use report::{JoystickReport, SwitchReport, XInputReport};
pub use status::{Notification, NullStatus, StatusSink};
pub use table::BindingTable;
pub use tracker::{KeyboardLink, KeyboardReport, ReportTracker};
pub use view::{ControllerView, Shape};
