//! Virtual buttons: discrete gamepad buttons and D-pad direction bits.

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// One bit of the 4-direction D-pad mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DirBit {
    Up,
    Right,
    Down,
    Left,
}

impl DirBit {
    /// All directions in mask bit order.
    pub const ALL: [DirBit; 4] = [DirBit::Up, DirBit::Right, DirBit::Down, DirBit::Left];

    /// The single-bit mask for this direction.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> Directions {
        match self {
            DirBit::Up => Directions::UP,
            DirBit::Right => Directions::RIGHT,
            DirBit::Down => Directions::DOWN,
            DirBit::Left => Directions::LEFT,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DirBit::Up => "up",
            DirBit::Right => "right",
            DirBit::Down => "down",
            DirBit::Left => "left",
        }
    }
}

/// Held D-pad directions as a 4-bit mask.
///
/// Bit order: Up = bit 0, Right = bit 1, Down = bit 2, Left = bit 3.
/// Opposing bits may be set together; resolving them is the job of
/// [`resolve`](crate::dpad::resolve).
///
/// # Example
///
/// ```
/// use keyboard_to_gamepad::Directions;
///
/// let held = Directions::UP | Directions::RIGHT;
/// assert!(held.contains(Directions::UP));
/// assert!(!held.contains(Directions::DOWN));
/// assert_eq!(held.raw(), 0b0011);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Directions(u8);

impl Directions {
    pub const UP: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const DOWN: Self = Self(1 << 2);
    pub const LEFT: Self = Self(1 << 3);

    /// No direction held.
    pub const NONE: Self = Self(0);

    /// Build a mask from raw bits, dropping anything above bit 3.
    #[inline]
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    /// Check if all of the given direction(s) are held.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Directions) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Set or clear direction(s).
    #[inline]
    pub fn set(&mut self, other: Directions, held: bool) {
        if held {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Directions {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Directions {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Directions {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Directions {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitXor for Directions {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Directions {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Directions {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0 & 0x0F)
    }
}

/// An abstract gamepad control a scancode can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VirtualButton {
    /// A single gamepad button or trigger, identified by its profile id.
    Discrete(u8),
    /// One bit of the D-pad direction mask.
    Direction(DirBit),
}

impl fmt::Display for VirtualButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VirtualButton::Discrete(id) => write!(f, "{id:x}"),
            VirtualButton::Direction(dir) => write!(f, "dpad {}", dir.name()),
        }
    }
}

/// Currently held discrete buttons, one bit per id.
///
/// Only ids below [`ActiveButtons::CAPACITY`] are tracked; higher ids are
/// silently ignored by [`set`](Self::set).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveButtons(u32);

impl ActiveButtons {
    /// Number of trackable button ids.
    pub const CAPACITY: u8 = 32;

    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn is_pressed(self, id: u8) -> bool {
        id < Self::CAPACITY && (self.0 & (1 << id)) != 0
    }

    /// Set or clear the bit for `id`. Returns `false` if `id` is untrackable.
    #[inline]
    pub fn set(&mut self, id: u8, pressed: bool) -> bool {
        if id >= Self::CAPACITY {
            return false;
        }
        if pressed {
            self.0 |= 1 << id;
        } else {
            self.0 &= !(1 << id);
        }
        true
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the ids of all held buttons.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..Self::CAPACITY).filter(move |&id| self.is_pressed(id))
    }
}
