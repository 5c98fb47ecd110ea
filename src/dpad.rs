//! D-pad resolution: held direction bits to one of nine logical directions.

use crate::button::Directions;

/// Logical D-pad direction after conflict resolution.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DpadDirection {
    #[default]
    Centered,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl DpadDirection {
    /// Standard HID hat switch value: 0 = up, clockwise in steps of 45°,
    /// centered is the null state `0x0F`.
    #[must_use]
    pub const fn hat(self) -> u8 {
        match self {
            DpadDirection::Up => 0,
            DpadDirection::UpRight => 1,
            DpadDirection::Right => 2,
            DpadDirection::DownRight => 3,
            DpadDirection::Down => 4,
            DpadDirection::DownLeft => 5,
            DpadDirection::Left => 6,
            DpadDirection::UpLeft => 7,
            DpadDirection::Centered => 0x0F,
        }
    }

    /// The direction bits this logical direction stands for.
    #[must_use]
    pub const fn directions(self) -> Directions {
        Directions::from_bits_truncate(match self {
            DpadDirection::Centered => 0,
            DpadDirection::Up => 0b0001,
            DpadDirection::UpRight => 0b0011,
            DpadDirection::Right => 0b0010,
            DpadDirection::DownRight => 0b0110,
            DpadDirection::Down => 0b0100,
            DpadDirection::DownLeft => 0b1100,
            DpadDirection::Left => 0b1000,
            DpadDirection::UpLeft => 0b1001,
        })
    }
}

/// Resolution for every combination of held bits, indexed by the raw mask
/// (Up = bit 0, Right = bit 1, Down = bit 2, Left = bit 3).
///
/// An opposing pair cancels out; a third bit held alongside a cancelled
/// pair wins on its own.
pub const DPAD_TABLE: [DpadDirection; 16] = [
    DpadDirection::Centered,  // 0000
    DpadDirection::Up,        // 0001 up
    DpadDirection::Right,     // 0010 right
    DpadDirection::UpRight,   // 0011 up + right
    DpadDirection::Down,      // 0100 down
    DpadDirection::Centered,  // 0101 down + up
    DpadDirection::DownRight, // 0110 down + right
    DpadDirection::Right,     // 0111 down + right + up
    DpadDirection::Left,      // 1000 left
    DpadDirection::UpLeft,    // 1001 left + up
    DpadDirection::Centered,  // 1010 left + right
    DpadDirection::Up,        // 1011 left + right + up
    DpadDirection::DownLeft,  // 1100 left + down
    DpadDirection::Left,      // 1101 left + down + up
    DpadDirection::Down,      // 1110 left + right + down
    DpadDirection::Centered,  // 1111 all
];

/// Resolve held direction bits to a logical D-pad direction.
///
/// # Example
///
/// ```
/// use keyboard_to_gamepad::{resolve, Directions, DpadDirection};
///
/// assert_eq!(resolve(Directions::UP | Directions::DOWN), DpadDirection::Centered);
/// assert_eq!(resolve(Directions::UP | Directions::RIGHT), DpadDirection::UpRight);
/// ```
#[inline]
#[must_use]
pub const fn resolve(held: Directions) -> DpadDirection {
    DPAD_TABLE[(held.raw() & 0x0F) as usize]
}

/// Full deflection of a stick axis derived from direction bits.
pub const AXIS_FULL: i8 = 127;

/// Map held direction bits to signed stick axes `(x, y)`.
///
/// Each axis moves by one full step per held bit of its opposing pair, so
/// opposing bits cancel to center. Y grows downward (Down is positive).
#[must_use]
pub const fn axes(held: Directions) -> (i8, i8) {
    const fn bit(held: Directions, d: Directions) -> i8 {
        if held.contains(d) {
            1
        } else {
            0
        }
    }
    let x = bit(held, Directions::RIGHT) - bit(held, Directions::LEFT);
    let y = bit(held, Directions::DOWN) - bit(held, Directions::UP);
    (x * AXIS_FULL, y * AXIS_FULL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_total() {
        for bits in 0..16u8 {
            let d = resolve(Directions::from_bits_truncate(bits));
            // Every resolved direction must be reachable from the bits held.
            assert!(Directions::from_bits_truncate(bits).contains(d.directions()));
        }
    }

    #[test]
    fn test_opposing_pair_cancels() {
        assert_eq!(resolve(Directions::UP | Directions::DOWN), DpadDirection::Centered);
        assert_eq!(resolve(Directions::LEFT | Directions::RIGHT), DpadDirection::Centered);
        assert_eq!(resolve(Directions::from_bits_truncate(0x0F)), DpadDirection::Centered);
    }

    #[test]
    fn test_third_bit_wins_over_cancelled_pair() {
        assert_eq!(
            resolve(Directions::UP | Directions::DOWN | Directions::RIGHT),
            DpadDirection::Right
        );
        assert_eq!(
            resolve(Directions::LEFT | Directions::RIGHT | Directions::DOWN),
            DpadDirection::Down
        );
    }

    #[test]
    fn test_diagonals() {
        assert_eq!(resolve(Directions::UP | Directions::RIGHT), DpadDirection::UpRight);
        assert_eq!(resolve(Directions::UP | Directions::LEFT), DpadDirection::UpLeft);
        assert_eq!(resolve(Directions::DOWN | Directions::RIGHT), DpadDirection::DownRight);
        assert_eq!(resolve(Directions::DOWN | Directions::LEFT), DpadDirection::DownLeft);
    }

    #[test]
    fn test_hat_values() {
        assert_eq!(DpadDirection::Up.hat(), 0);
        assert_eq!(DpadDirection::UpLeft.hat(), 7);
        assert_eq!(DpadDirection::Centered.hat(), 0x0F);
    }

    #[test]
    fn test_axes() {
        assert_eq!(axes(Directions::NONE), (0, 0));
        assert_eq!(axes(Directions::UP), (0, -127));
        assert_eq!(axes(Directions::DOWN | Directions::LEFT), (-127, 127));
        assert_eq!(axes(Directions::UP | Directions::DOWN | Directions::RIGHT), (127, 0));
    }
}
