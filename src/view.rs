//! Controller snapshot for small displays.
//!
//! Projects the held-button and held-direction state onto a fixed
//! arrangement sized for a 128x32 panel:
//!
//! ```text
//!   ||   ( ) ( ) ( ) ( )
//! |||||| ( ) ( ) ( ) ( )
//!   ||
//! ```
//!
//! Four D-pad squares on the left, two rows of four circles on the right.
//! Held controls are drawn filled, everything else outlined.

use crate::button::{ActiveButtons, Directions, VirtualButton};
use crate::profile::Layout;

/// Pixel coordinate on the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// A single drawable element of the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    Square { origin: Point, size: u8, filled: bool },
    Circle { center: Point, radius: u8, filled: bool },
}

// The panel has a dark bar along its top edge, so everything sits 6px lower.
const DPAD_ORIGINS: [Point; 4] = [
    Point::new(9, 6 + 1),  // Up
    Point::new(17, 6 + 9), // Right
    Point::new(9, 6 + 17), // Down
    Point::new(1, 6 + 9),  // Left
];
const DPAD_SIZE: u8 = 8;

const ROW_X: i16 = 40;
const ROW_STEP: i16 = 15;
const TOP_ROW_Y: i16 = 10;
const BOTTOM_ROW_Y: i16 = 24;
const BUTTON_RADIUS: u8 = 6;

/// Whether `button` is currently held.
#[inline]
#[must_use]
pub fn is_active(button: VirtualButton, active: ActiveButtons, held: Directions) -> bool {
    match button {
        VirtualButton::Discrete(id) => active.is_pressed(id),
        VirtualButton::Direction(d) => held.contains(d.mask()),
    }
}

/// Filled/outlined state of every control on the snapshot.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerView {
    /// Up, Right, Down, Left.
    pub dpad: [bool; 4],
    pub top_row: [bool; 4],
    pub bottom_row: [bool; 4],
}

impl ControllerView {
    /// Project the current state through a profile layout.
    #[must_use]
    pub fn project(layout: &Layout, active: ActiveButtons, held: Directions) -> Self {
        let lit = |row: [VirtualButton; 4]| row.map(|b| is_active(b, active, held));
        Self {
            dpad: lit(layout.dpad),
            top_row: lit(layout.top_row),
            bottom_row: lit(layout.bottom_row),
        }
    }

    /// The shapes to draw, D-pad first, then the top and bottom rows.
    pub fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        let dpad = self
            .dpad
            .iter()
            .zip(DPAD_ORIGINS)
            .map(|(&filled, origin)| Shape::Square {
                origin,
                size: DPAD_SIZE,
                filled,
            });
        dpad.chain(row_shapes(&self.top_row, TOP_ROW_Y))
            .chain(row_shapes(&self.bottom_row, BOTTOM_ROW_Y))
    }
}

fn row_shapes(states: &[bool; 4], y: i16) -> impl Iterator<Item = Shape> + '_ {
    states.iter().zip(0i16..).map(move |(&filled, i)| Shape::Circle {
        center: Point::new(ROW_X + ROW_STEP * i, y),
        radius: BUTTON_RADIUS,
        filled,
    })
}
