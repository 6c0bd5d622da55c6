use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{GameConfig, GameLoop};
use crate::input::{Command, InputHandler, SwipeTracker};
use crate::metrics::GameMetrics;
use crate::render::{RenderSink, TerminalSink};
use crate::storage::HighScoreStore;

/// Render at 30 FPS (33ms per frame)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

type CrosstermTerminal = Terminal<CrosstermBackend<Stderr>>;

pub struct HumanMode<S: HighScoreStore> {
    game: GameLoop<S>,
    metrics: GameMetrics,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    /// Follow the terminal size instead of a fixed board
    fit_to_terminal: bool,
    should_quit: bool,
    /// A game was started since the tick timer last fired
    restart_timer: bool,
}

impl<S: HighScoreStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S, fit_to_terminal: bool) -> Self {
        Self {
            game: GameLoop::new(config, store),
            metrics: GameMetrics::new(),
            input_handler: InputHandler::new(),
            swipe: SwipeTracker::new(),
            fit_to_terminal,
            should_quit: false,
            restart_timer: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let fit_to_terminal = self.fit_to_terminal;
        let setup = Self::setup_terminal().and_then(|terminal| {
            let size = if fit_to_terminal {
                Some(crossterm::terminal::size().context("Failed to read terminal size")?)
            } else {
                None
            };
            Ok((terminal, size))
        });
        let (terminal, size) = restore_on_error(setup, restore_terminal)?;

        if let Some((columns, rows)) = size {
            self.fit_board(columns, rows);
        }

        let mut sink = TerminalSink::new(terminal);

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut sink).await;

        // Cleanup terminal
        Self::cleanup_terminal(sink.terminal_mut())?;

        result
    }

    async fn run_game_loop(
        &mut self,
        sink: &mut TerminalSink<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.game.tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.game.is_running() {
                        self.update_game();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    sink.draw(&self.game.snapshot(), &self.metrics)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.restart_timer {
                // First step of a new game comes one full interval after start
                tick_timer.reset();
                self.restart_timer = false;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let command = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.swipe.handle_mouse_event(mouse).map(Command::Steer),
            Event::Resize(columns, rows) => {
                if self.fit_to_terminal {
                    self.fit_board(columns, rows);
                }
                None
            }
            _ => None,
        };

        if let Some(command) = command {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Steer(direction) => {
                self.game.submit_direction(direction);
            }
            Command::Start => {
                if !self.game.is_running() {
                    self.start_game();
                }
            }
            Command::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn fit_board(&mut self, columns: u16, rows: u16) {
        let (width, height) = GameConfig::fit_to_viewport(columns, rows);
        if !self.game.resize(width, height) {
            log::debug!("Ignoring terminal resize while a game is running");
        }
    }

    fn update_game(&mut self) {
        let result = self.game.tick();

        if result.ended_game() {
            self.metrics.on_game_over();
        }
    }

    fn start_game(&mut self) {
        self.game.start();
        self.metrics.on_game_start();
        self.restart_timer = true;
    }

    fn setup_terminal() -> Result<CrosstermTerminal> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        Ok(terminal)
    }

    fn cleanup_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Run `restore` when `result` is an error, then hand the result back
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

/// Best-effort undo of a partial terminal setup
fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        log::warn!("Failed to disable raw mode: {}", err);
    }
    if let Err(err) = execute!(stderr(), LeaveAlternateScreen, DisableMouseCapture) {
        log::warn!("Failed to leave alternate screen: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, SessionState};
    use crate::storage::MemoryHighScoreStore;
    use anyhow::anyhow;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::cell::Cell;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode<MemoryHighScoreStore> {
        HumanMode::new(GameConfig::small(), MemoryHighScoreStore::new(), true)
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.game.session(), SessionState::Idle);
        assert_eq!(mode.game.snapshot().score, 0);
    }

    #[test]
    fn test_enter_starts_game() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));

        assert!(mode.game.is_running());
        assert!(mode.restart_timer);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.update_game();
        let head = mode.game.state().snake.head();

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.game.state().snake.head(), head);
    }

    #[test]
    fn test_arrow_buffers_direction() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Left));

        assert_eq!(mode.game.state().next_velocity, Direction::Left.velocity());
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_resize_refits_board_when_idle() {
        let mut mode = mode();
        mode.handle_event(Event::Resize(42, 20));
        // (42 - 2) / 2 = 20 tiles, 20 - 8 = 12 rows
        assert_eq!(mode.game.snapshot().grid_width, 20);
        assert_eq!(mode.game.snapshot().grid_height, 12);

        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(Event::Resize(200, 100));
        assert_eq!(mode.game.snapshot().grid_width, 20);
    }

    #[test]
    fn test_failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let result: Result<()> = restore_on_error(Err(anyhow!("no tty")), || restored.set(true));
        assert!(result.is_err());
        assert!(restored.get());

        let restored = Cell::new(false);
        let result = restore_on_error(Ok(7), || restored.set(true));
        assert_eq!(result.unwrap(), 7);
        assert!(!restored.get());
    }

    #[test]
    fn test_game_over_stops_clock() {
        let mut mode = HumanMode::new(GameConfig::new(5, 5), MemoryHighScoreStore::new(), false);
        mode.handle_event(key(KeyCode::Enter));
        // Head at (2, 2) moving up: the third tick leaves the board
        for _ in 0..3 {
            mode.update_game();
        }

        assert_eq!(mode.game.session(), SessionState::GameOver);
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_fixed_board_ignores_resize() {
        let mut mode = HumanMode::new(GameConfig::small(), MemoryHighScoreStore::new(), false);
        mode.handle_event(Event::Resize(200, 100));
        assert_eq!(mode.game.snapshot().grid_width, 10);
    }
}
