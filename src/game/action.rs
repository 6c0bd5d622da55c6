/// Direction the player can steer towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the unit velocity for moving in this direction
    pub fn velocity(&self) -> Velocity {
        match self {
            Direction::Up => Velocity::new(0, -1),
            Direction::Down => Velocity::new(0, 1),
            Direction::Left => Velocity::new(-1, 0),
            Direction::Right => Velocity::new(1, 0),
        }
    }
}

/// Per-tick displacement of the snake head
///
/// Always one of the four unit vectors or [`Velocity::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    /// Not moving at all
    pub const ZERO: Velocity = Velocity { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Whether a change to `requested` may be taken while moving with `self`.
    ///
    /// A request along an axis the snake already moves on is refused. That
    /// blocks the 180-degree turn, and also re-requesting the current
    /// heading, which is harmless since the heading is kept anyway.
    pub fn accepts(&self, requested: Velocity) -> bool {
        if requested.dx != 0 {
            self.dx == 0
        } else if requested.dy != 0 {
            self.dy == 0
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_velocity() {
        assert_eq!(Direction::Up.velocity(), Velocity::new(0, -1));
        assert_eq!(Direction::Down.velocity(), Velocity::new(0, 1));
        assert_eq!(Direction::Left.velocity(), Velocity::new(-1, 0));
        assert_eq!(Direction::Right.velocity(), Velocity::new(1, 0));
    }

    #[test]
    fn test_reversal_refused() {
        let up = Direction::Up.velocity();
        let right = Direction::Right.velocity();

        assert!(!up.accepts(Direction::Down.velocity()));
        assert!(!right.accepts(Direction::Left.velocity()));
        assert!(!Direction::Left.velocity().accepts(right));
        assert!(!Direction::Down.velocity().accepts(up));
    }

    #[test]
    fn test_perpendicular_accepted() {
        let up = Direction::Up.velocity();
        assert!(up.accepts(Direction::Left.velocity()));
        assert!(up.accepts(Direction::Right.velocity()));

        let left = Direction::Left.velocity();
        assert!(left.accepts(Direction::Up.velocity()));
        assert!(left.accepts(Direction::Down.velocity()));
    }

    #[test]
    fn test_same_axis_refused() {
        // Re-requesting the current heading is also refused
        assert!(!Direction::Up.velocity().accepts(Direction::Up.velocity()));
        assert!(!Direction::Right.velocity().accepts(Direction::Right.velocity()));
    }

    #[test]
    fn test_standing_still_accepts_anything() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert!(Velocity::ZERO.accepts(direction.velocity()));
        }
        assert!(!Velocity::ZERO.accepts(Velocity::ZERO));
    }
}
