use super::{
    action::Direction,
    config::{FOOD_REWARD, GameConfig, INITIAL_SNAKE_LENGTH},
    state::{CollisionType, GameState, Position, SessionState, Snake},
};
use rand::Rng;
use rand::rngs::ThreadRng;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// The snake covers every cell, leaving nowhere to put food
    pub board_filled: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Score gained on this step
    pub score_gained: u32,
    /// Whether the game has ended (on this step or earlier)
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn idle() -> Self {
        Self {
            score_gained: 0,
            terminated: true,
            info: StepInfo {
                ate_food: false,
                collision_type: None,
                board_filled: false,
            },
        }
    }

    /// Whether this very step ended a running game
    pub fn ended_game(&self) -> bool {
        self.info.collision_type.is_some() || self.info.board_filled
    }
}

/// Buffer a direction request for the next tick.
///
/// The request is checked against the velocity in effect right now, so a
/// refused request never displaces an accepted one. Later accepted requests
/// overwrite earlier ones. Returns whether the buffer changed.
pub fn submit_direction(state: &mut GameState, direction: Direction) -> bool {
    if state.session != SessionState::Running {
        return false;
    }

    let requested = direction.velocity();
    if !state.velocity.accepts(requested) {
        return false;
    }

    state.next_velocity = requested;
    true
}

/// The game engine that handles all game logic
///
/// Generic over the random source so tests can seed food placement.
pub struct GameEngine<R: Rng = ThreadRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Change the board used by the next [`GameEngine::reset`]
    pub fn set_grid(&mut self, width: usize, height: usize) {
        self.config.grid_width = width;
        self.config.grid_height = height;
    }

    /// Start a fresh game: vertical snake at the center heading up
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Up,
            INITIAL_SNAKE_LENGTH,
        );

        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            Direction::Up.velocity(),
            self.config.grid_width,
            self.config.grid_height,
        );
        match self.spawn_food_avoid_snake(&state) {
            Some(food) => state.food = food,
            None => {
                log::warn!(
                    "{}x{} board has no room for food",
                    state.grid_width,
                    state.grid_height
                );
                state.session = SessionState::GameOver;
            }
        }
        state
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if state.session != SessionState::Running {
            return StepResult::idle();
        }

        // Commit the buffered request unless it runs along the current axis
        if state.velocity.accepts(state.next_velocity) {
            state.velocity = state.next_velocity;
        }

        let new_head = state.snake.head().moved_by(state.velocity);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.session = SessionState::GameOver;

            return StepResult {
                score_gained: 0,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                    board_filled: false,
                },
            };
        }

        state.snake.push_head(new_head);

        let ate_food = new_head == state.food;
        let mut score_gained = 0;
        let mut board_filled = false;

        if ate_food {
            score_gained = FOOD_REWARD;
            state.score += score_gained;
            match self.spawn_food_avoid_snake(state) {
                Some(food) => state.food = food,
                None => {
                    // Nothing left to eat: the game is won
                    board_filled = true;
                    state.session = SessionState::GameOver;
                }
            }
        } else {
            state.snake.pop_tail();
        }

        state.steps += 1;

        StepResult {
            score_gained,
            terminated: board_filled,
            info: StepInfo {
                ate_food,
                collision_type: None,
                board_filled,
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail still counts: it only moves after the head is placed
        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a uniformly random cell not covered by the snake.
    /// Returns `None` once the snake covers the whole board.
    fn spawn_food_avoid_snake(&mut self, state: &GameState) -> Option<Position> {
        if state.snake.len() >= state.grid_width * state.grid_height {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..state.grid_width) as i32;
            let y = self.rng.gen_range(0..state.grid_height) as i32;
            let pos = Position::new(x, y);

            if !state.snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}
