use super::action::{Direction, Velocity};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by one step of `velocity`
    pub fn moved_by(&self, velocity: Velocity) -> Self {
        Self {
            x: self.x + velocity.dx,
            y: self.y + velocity.dy,
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
}

impl Snake {
    /// Create a snake whose head faces `direction`, body trailing behind it
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let forward = direction.velocity();
        let back = Velocity::new(-forward.dx, -forward.dy);

        let mut body = Vec::with_capacity(length);
        body.push(head);
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back));
        }

        Self { body }
    }

    /// Create a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>) -> Self {
        debug_assert!(!body.is_empty(), "a snake needs at least a head");
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Check if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front, growing the snake by one
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the last segment
    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No game played yet
    #[default]
    Idle,
    /// Ticks advance the simulation
    Running,
    /// The last game ended; state is frozen until the next start
    GameOver,
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake ran into itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Velocity applied on the current tick
    pub velocity: Velocity,
    /// Requested velocity, committed on the next tick
    pub next_velocity: Velocity,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub session: SessionState,
}

impl GameState {
    /// Create a running game state moving with `velocity`
    pub fn new(
        snake: Snake,
        food: Position,
        velocity: Velocity,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snake,
            food,
            velocity,
            next_velocity: velocity,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            session: SessionState::Running,
        }
    }

    /// An empty board waiting for the first start
    pub fn idle(grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake: Snake { body: Vec::new() },
            food: Position::new(0, 0),
            velocity: Velocity::ZERO,
            next_velocity: Velocity::ZERO,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            session: SessionState::Idle,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn is_running(&self) -> bool {
        self.session == SessionState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(Velocity::new(1, 0)), Position::new(6, 5));
        assert_eq!(pos.moved_by(Velocity::new(-1, 0)), Position::new(4, 5));
        assert_eq!(pos.moved_by(Velocity::new(0, 1)), Position::new(5, 6));
        assert_eq!(pos.moved_by(Velocity::new(0, -1)), Position::new(5, 4));
        assert_eq!(pos.moved_by(Velocity::ZERO), pos);
    }

    #[test]
    fn test_snake_creation_facing_up() {
        let snake = Snake::new(Position::new(5, 5), Direction::Up, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(5, 6));
        assert_eq!(snake.body.last(), Some(&Position::new(5, 7)));
    }

    #[test]
    fn test_push_and_pop() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.push_head(Position::new(6, 5));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(6, 5));

        assert_eq!(snake.pop_tail(), Some(Position::new(3, 5)));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.body.last(), Some(&Position::new(4, 5)));
    }

    #[test]
    fn test_occupies_includes_head_and_tail() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(snake.occupies(Position::new(5, 5)));
        assert!(snake.occupies(Position::new(3, 5)));
        assert!(!snake.occupies(Position::new(10, 10)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(10, 10),
            Velocity::new(1, 0),
            20,
            20,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_idle_state() {
        let state = GameState::idle(12, 8);
        assert_eq!(state.session, SessionState::Idle);
        assert!(state.snake.is_empty());
        assert!(!state.is_running());
    }
}
