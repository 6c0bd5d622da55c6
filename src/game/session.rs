//! Game session driven by an external fixed-rate timer
//!
//! [`GameLoop`] owns the engine, the current [`GameState`] and the high score
//! store. The caller decides when time passes by calling [`GameLoop::tick`];
//! nothing in here sleeps or spawns.

use rand::Rng;
use rand::rngs::ThreadRng;
use std::time::Duration;

use super::{
    action::Direction,
    config::GameConfig,
    engine::{self, GameEngine, StepResult},
    state::{GameState, Position, SessionState},
};
use crate::storage::HighScoreStore;

/// Read-only view of a session handed to renderers
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Head first; empty before the first game
    pub snake: &'a [Position],
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    pub session: SessionState,
}

impl Snapshot<'_> {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

pub struct GameLoop<S: HighScoreStore, R: Rng = ThreadRng> {
    engine: GameEngine<R>,
    state: GameState,
    store: S,
    high_score: u32,
}

impl<S: HighScoreStore> GameLoop<S, ThreadRng> {
    pub fn new(config: GameConfig, store: S) -> Self {
        Self::with_engine(GameEngine::new(config), store)
    }
}

impl<S: HighScoreStore, R: Rng> GameLoop<S, R> {
    /// Build a session around an existing engine, reading the high score once
    pub fn with_engine(engine: GameEngine<R>, store: S) -> Self {
        let high_score = store.load();
        let config = engine.config();
        let state = GameState::idle(config.grid_width, config.grid_height);

        Self {
            engine,
            state,
            store,
            high_score,
        }
    }

    /// Begin a new game, discarding whatever the previous one left behind
    pub fn start(&mut self) {
        self.state = self.engine.reset();
        log::info!(
            "Game started on {}x{} board",
            self.state.grid_width,
            self.state.grid_height
        );
    }

    /// Advance one tick; a no-op unless a game is running
    pub fn tick(&mut self) -> StepResult {
        let result = self.engine.step(&mut self.state);

        if result.ended_game() {
            match result.info.collision_type {
                Some(collision) => log::info!(
                    "Game over after {} steps ({:?}), score {}",
                    self.state.steps,
                    collision,
                    self.state.score
                ),
                None => log::info!("Board filled, final score {}", self.state.score),
            }
            self.game_over();
        }

        result
    }

    /// Buffer a turn for the next tick, see [`engine::submit_direction`]
    pub fn submit_direction(&mut self, direction: Direction) -> bool {
        engine::submit_direction(&mut self.state, direction)
    }

    /// End the running game and record a new high score if one was set.
    ///
    /// Writing the score is best effort: a failed write is logged and the
    /// in-memory high score still advances.
    pub fn game_over(&mut self) {
        self.state.session = SessionState::GameOver;

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            if let Err(err) = self.store.save(self.high_score) {
                log::warn!("Could not persist high score: {:#}", err);
            }
        }
    }

    /// Resize the board. Refused while a game is running.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if self.state.is_running() {
            return false;
        }

        self.engine.set_grid(width, height);
        self.state.grid_width = width;
        self.state.grid_height = height;
        log::debug!("Board resized to {}x{}", width, height);
        true
    }

    pub fn session(&self) -> SessionState {
        self.state.session
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tick_interval(&self) -> Duration {
        self.engine.config().tick_interval()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid_width: self.state.grid_width,
            grid_height: self.state.grid_height,
            snake: &self.state.snake.body,
            food: self.state.food,
            score: self.state.score,
            high_score: self.high_score,
            session: self.state.session,
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
