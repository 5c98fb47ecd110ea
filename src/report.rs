//! HID input reports for each gamepad profile.
//!
//! Each report is a plain state struct implementing [`GamepadOutput`], so
//! the remapper updates it in place and the transport encodes it with
//! [`HidReport::write_to`]. Field order matches the report descriptors in
//! the firmware.

use crate::button::Directions;
use crate::dpad::DpadDirection;
use crate::output::{GamepadOutput, HidReport, MAX_REPORT_SIZE};
use crate::profile::{switch, xinput};

/// Generic joystick report.
///
/// Layout (7 bytes): buttons 1-32 (u32 LE), hat (low nibble), X, Y (i8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    /// Bit `n` is button `n + 1`.
    pub buttons: u32,
    pub hat: u8,
    pub x: i8,
    pub y: i8,
}

impl JoystickReport {
    fn button_mask(id: u8) -> Option<u32> {
        match id {
            1..=32 => Some(1 << (id - 1)),
            _ => {
                warn!("joystick has no button {}", id);
                None
            }
        }
    }
}

impl GamepadOutput for JoystickReport {
    fn press(&mut self, id: u8) {
        if let Some(mask) = Self::button_mask(id) {
            self.buttons |= mask;
        }
    }

    fn release(&mut self, id: u8) {
        if let Some(mask) = Self::button_mask(id) {
            self.buttons &= !mask;
        }
    }

    fn dpad(&mut self, direction: DpadDirection) {
        self.hat = direction.hat();
    }

    fn axes(&mut self, x: i8, y: i8) {
        self.x = x;
        self.y = y;
    }
}

impl HidReport for JoystickReport {
    const SIZE: usize = 7;

    fn neutral() -> Self {
        Self {
            buttons: 0,
            hat: DpadDirection::Centered.hat(),
            x: 0,
            y: 0,
        }
    }

    fn write_to(&self, buf: &mut [u8; MAX_REPORT_SIZE]) -> usize {
        buf[..4].copy_from_slice(&self.buttons.to_le_bytes());
        buf[4] = self.hat;
        buf[5] = self.x as u8;
        buf[6] = self.y as u8;
        Self::SIZE
    }
}

/// Scale an i8 axis to i16 (127 maps to 32766). -128 is treated as -127
/// so the axis stays symmetric and can be negated.
#[inline]
fn widen_axis(v: i8) -> i16 {
    i16::from(v.max(-127)) * 258
}

/// XInput-style report.
///
/// Layout (12 bytes): buttons (u16 LE), LX, LY, RX, RY (i16 LE),
/// LT, RT (u8). Stick Y is positive up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XInputReport {
    pub buttons: u16,
    pub left_x: i16,
    pub left_y: i16,
    pub right_x: i16,
    pub right_y: i16,
    pub left_trigger: u8,
    pub right_trigger: u8,
}

impl XInputReport {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const L3: u16 = 0x0040;
    pub const R3: u16 = 0x0080;
    pub const LB: u16 = 0x0100;
    pub const RB: u16 = 0x0200;
    pub const LOGO: u16 = 0x0400;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;

    const DPAD_MASK: u16 = 0x000F;

    fn button_mask(id: u8) -> Option<u16> {
        Some(match id {
            xinput::LOGO => Self::LOGO,
            xinput::A => Self::A,
            xinput::B => Self::B,
            xinput::X => Self::X,
            xinput::Y => Self::Y,
            xinput::LB => Self::LB,
            xinput::RB => Self::RB,
            xinput::BACK => Self::BACK,
            xinput::START => Self::START,
            xinput::L3 => Self::L3,
            xinput::R3 => Self::R3,
            xinput::DPAD_UP => Self::DPAD_UP,
            xinput::DPAD_DOWN => Self::DPAD_DOWN,
            xinput::DPAD_LEFT => Self::DPAD_LEFT,
            xinput::DPAD_RIGHT => Self::DPAD_RIGHT,
            _ => return None,
        })
    }

    fn set_control(&mut self, id: u8, pressed: bool) {
        let level = if pressed { u8::MAX } else { 0 };
        match id {
            xinput::TRIGGER_LEFT => self.left_trigger = level,
            xinput::TRIGGER_RIGHT => self.right_trigger = level,
            _ => match Self::button_mask(id) {
                Some(mask) if pressed => self.buttons |= mask,
                Some(mask) => self.buttons &= !mask,
                None => warn!("xinput has no control {}", id),
            },
        }
    }
}

impl GamepadOutput for XInputReport {
    fn press(&mut self, id: u8) {
        self.set_control(id, true);
    }

    fn release(&mut self, id: u8) {
        self.set_control(id, false);
    }

    fn dpad(&mut self, direction: DpadDirection) {
        let held = direction.directions();
        let mut bits = 0;
        for (dir, mask) in [
            (Directions::UP, Self::DPAD_UP),
            (Directions::DOWN, Self::DPAD_DOWN),
            (Directions::LEFT, Self::DPAD_LEFT),
            (Directions::RIGHT, Self::DPAD_RIGHT),
        ] {
            if held.contains(dir) {
                bits |= mask;
            }
        }
        self.buttons = (self.buttons & !Self::DPAD_MASK) | bits;
    }

    fn axes(&mut self, x: i8, y: i8) {
        self.left_x = widen_axis(x);
        self.left_y = -widen_axis(y);
    }
}

impl HidReport for XInputReport {
    const SIZE: usize = 12;

    fn neutral() -> Self {
        Self {
            buttons: 0,
            left_x: 0,
            left_y: 0,
            right_x: 0,
            right_y: 0,
            left_trigger: 0,
            right_trigger: 0,
        }
    }

    fn write_to(&self, buf: &mut [u8; MAX_REPORT_SIZE]) -> usize {
        buf[0..2].copy_from_slice(&self.buttons.to_le_bytes());
        buf[2..4].copy_from_slice(&self.left_x.to_le_bytes());
        buf[4..6].copy_from_slice(&self.left_y.to_le_bytes());
        buf[6..8].copy_from_slice(&self.right_x.to_le_bytes());
        buf[8..10].copy_from_slice(&self.right_y.to_le_bytes());
        buf[10] = self.left_trigger;
        buf[11] = self.right_trigger;
        Self::SIZE
    }
}

/// Stick value of a centered Switch axis.
pub const SWITCH_STICK_CENTER: u8 = 0x80;

/// Switch-compatible gamepad report.
///
/// Layout (8 bytes): buttons (u16 LE), hat, LX, LY, RX, RY, vendor byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchReport {
    pub buttons: u16,
    pub hat: u8,
    pub left_x: u8,
    pub left_y: u8,
    pub right_x: u8,
    pub right_y: u8,
    pub vendor: u8,
}

impl SwitchReport {
    fn button_mask(id: u8) -> Option<u16> {
        if id <= switch::CAPTURE {
            Some(1 << id)
        } else {
            warn!("switch has no button {}", id);
            None
        }
    }
}

impl GamepadOutput for SwitchReport {
    fn press(&mut self, id: u8) {
        if let Some(mask) = Self::button_mask(id) {
            self.buttons |= mask;
        }
    }

    fn release(&mut self, id: u8) {
        if let Some(mask) = Self::button_mask(id) {
            self.buttons &= !mask;
        }
    }

    fn dpad(&mut self, direction: DpadDirection) {
        self.hat = direction.hat();
    }

    fn axes(&mut self, x: i8, y: i8) {
        let shift = |v: i8| (i16::from(SWITCH_STICK_CENTER) + i16::from(v)).clamp(0, 255) as u8;
        self.left_x = shift(x);
        self.left_y = shift(y);
    }
}

impl HidReport for SwitchReport {
    const SIZE: usize = 8;

    fn neutral() -> Self {
        Self {
            buttons: 0,
            hat: DpadDirection::Centered.hat(),
            left_x: SWITCH_STICK_CENTER,
            left_y: SWITCH_STICK_CENTER,
            right_x: SWITCH_STICK_CENTER,
            right_y: SWITCH_STICK_CENTER,
            vendor: 0,
        }
    }

    fn write_to(&self, buf: &mut [u8; MAX_REPORT_SIZE]) -> usize {
        buf[0..2].copy_from_slice(&self.buttons.to_le_bytes());
        buf[2] = self.hat;
        buf[3] = self.left_x;
        buf[4] = self.left_y;
        buf[5] = self.right_x;
        buf[6] = self.right_y;
        buf[7] = self.vendor;
        Self::SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joystick_buttons_are_one_based() {
        let mut report = JoystickReport::neutral();
        report.press(1);
        report.press(32);
        report.press(0);
        report.press(33);
        assert_eq!(report.buttons, 0x8000_0001);
        report.release(1);
        assert_eq!(report.buttons, 0x8000_0000);
    }

    #[test]
    fn test_joystick_encoding() {
        let mut report = JoystickReport::neutral();
        report.press(2);
        report.dpad(DpadDirection::DownLeft);
        report.axes(-127, 127);
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = report.write_to(&mut buf);
        assert_eq!(&buf[..len], &[0x02, 0, 0, 0, 5, 0x81, 0x7F]);
    }

    #[test]
    fn test_xinput_triggers_are_analog_full_scale() {
        let mut report = XInputReport::neutral();
        report.press(xinput::TRIGGER_LEFT);
        report.press(xinput::A);
        assert_eq!(report.left_trigger, 255);
        assert_eq!(report.buttons, XInputReport::A);
        report.release(xinput::TRIGGER_LEFT);
        assert_eq!(report.left_trigger, 0);
    }

    #[test]
    fn test_xinput_dpad_keeps_other_buttons() {
        let mut report = XInputReport::neutral();
        report.press(xinput::START);
        report.dpad(DpadDirection::UpRight);
        assert_eq!(
            report.buttons,
            XInputReport::START | XInputReport::DPAD_UP | XInputReport::DPAD_RIGHT
        );
        report.dpad(DpadDirection::Centered);
        assert_eq!(report.buttons, XInputReport::START);
    }

    #[test]
    fn test_xinput_axes_flip_y() {
        let mut report = XInputReport::neutral();
        report.axes(127, 127);
        assert_eq!(report.left_x, 32766);
        assert_eq!(report.left_y, -32766);
    }

    #[test]
    fn test_xinput_axes_full_negative_range() {
        let mut report = XInputReport::neutral();
        report.axes(i8::MIN, i8::MIN);
        assert_eq!(report.left_x, -32766);
        assert_eq!(report.left_y, 32766);
    }

    #[test]
    fn test_switch_report() {
        let mut report = SwitchReport::neutral();
        report.press(switch::A);
        report.press(switch::CAPTURE);
        report.press(14);
        report.dpad(DpadDirection::Left);
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = report.write_to(&mut buf);
        assert_eq!(&buf[..len], &[0x04, 0x20, 6, 0x80, 0x80, 0x80, 0x80, 0]);
    }

    #[test]
    fn test_switch_axes() {
        let mut report = SwitchReport::neutral();
        report.axes(-127, 127);
        assert_eq!((report.left_x, report.left_y), (1, 255));
        report.axes(0, 0);
        assert_eq!((report.left_x, report.left_y), (0x80, 0x80));
    }
}
