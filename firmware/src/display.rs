//! Status display backends.
//!
//! - [`OledStatus`]: SSD1306 128x32 panel over I2C, status text during
//!   binding and the controller snapshot afterwards.
//! - [`LogStatus`]: everything over defmt, no panel attached.
//!
//! Both log every notification, so an RTT session shows the bind dialog
//! either way.

use defmt::{debug, info, Display2Format};
use keyboard_to_gamepad::status::Notification;
use keyboard_to_gamepad::view::ControllerView;
use keyboard_to_gamepad::StatusSink;

#[cfg(feature = "display-oled")]
pub use oled::OledStatus;

/// Status sink selected by the build features.
#[cfg(feature = "display-oled")]
pub type ActiveStatus = OledStatus<
    embassy_rp::i2c::I2c<'static, embassy_rp::peripherals::I2C0, embassy_rp::i2c::Blocking>,
>;
#[cfg(feature = "display-log")]
pub type ActiveStatus = LogStatus;

fn log_notification(note: &Notification) {
    info!("{}", Display2Format(note));
}

/// Status sink that only logs.
#[derive(Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn notify(&mut self, note: &Notification) {
        log_notification(note);
    }

    fn render(&mut self, view: &ControllerView) {
        debug!("controller: {}", view);
    }
}

#[cfg(feature = "display-oled")]
mod oled {
    use core::fmt::Write;

    use defmt::warn;
    use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
    use embedded_graphics::text::{Baseline, Text};
    use embedded_hal::i2c::I2c;
    use heapless::String;
    use keyboard_to_gamepad::status::Notification;
    use keyboard_to_gamepad::view::{self, ControllerView, Shape};
    use keyboard_to_gamepad::StatusSink;
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::{I2CDisplayInterface, Ssd1306};

    use super::log_notification;

    /// Text kept on screen between notifications.
    const TEXT_CAPACITY: usize = 128;

    type Display<I2C> =
        Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

    /// SSD1306 status display.
    ///
    /// Messages that clear the screen replace the text, the others are
    /// appended to it. Drawing errors are logged and otherwise ignored.
    pub struct OledStatus<I2C> {
        display: Display<I2C>,
        text: String<TEXT_CAPACITY>,
    }

    impl<I2C: I2c> OledStatus<I2C> {
        pub fn new(i2c: I2C) -> Self {
            let interface = I2CDisplayInterface::new(i2c);
            let display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode();
            Self {
                display,
                text: String::new(),
            }
        }

        /// Initialize the panel. Must run once after power-up.
        pub fn init(&mut self) {
            if self.display.init().is_err() {
                warn!("display init failed");
            }
            self.show_text();
        }

        fn show_text(&mut self) {
            let _ = self.display.clear(BinaryColor::Off);
            let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
            if Text::with_baseline(&self.text, Point::zero(), style, Baseline::Top)
                .draw(&mut self.display)
                .is_err()
            {
                warn!("display text draw failed");
            }
            self.flush();
        }

        fn flush(&mut self) {
            if self.display.flush().is_err() {
                warn!("display flush failed");
            }
        }
    }

    impl<I2C: I2c> StatusSink for OledStatus<I2C> {
        fn notify(&mut self, note: &Notification) {
            log_notification(note);
            if note.clears_screen() {
                self.text.clear();
            }
            if write!(self.text, "{note}").is_err() {
                // Does not fit after the held text, show it on its own.
                self.text.clear();
                let _ = write!(self.text, "{note}");
            }
            self.show_text();
        }

        fn render(&mut self, view: &ControllerView) {
            let _ = self.display.clear(BinaryColor::Off);
            for shape in view.shapes() {
                if draw_shape(&mut self.display, shape).is_err() {
                    warn!("display shape draw failed");
                    break;
                }
            }
            self.flush();
        }
    }

    fn to_point(p: view::Point) -> Point {
        Point::new(i32::from(p.x), i32::from(p.y))
    }

    fn style(filled: bool) -> PrimitiveStyle<BinaryColor> {
        if filled {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        }
    }

    fn draw_shape<D>(target: &mut D, shape: Shape) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match shape {
            Shape::Square {
                origin,
                size,
                filled,
            } => Rectangle::new(to_point(origin), Size::new_equal(u32::from(size)))
                .into_styled(style(filled))
                .draw(target),
            Shape::Circle {
                center,
                radius,
                filled,
            } => Circle::with_center(to_point(center), 2 * u32::from(radius) + 1)
                .into_styled(style(filled))
                .draw(target),
        }
    }
}
