use anyhow::{Context, Result};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::config::{CHROME_COLUMNS, TILE_COLUMNS};
use crate::game::{Position, SessionState, Snapshot};
use crate::metrics::GameMetrics;

const NEON_GREEN: Color = Color::Rgb(0x39, 0xff, 0x14);
const HEAD_GREEN: Color = Color::Rgb(0xcc, 0xff, 0xcc);
const FOOD_PINK: Color = Color::Rgb(0xff, 0x00, 0x55);
const GRID_BLUE: Color = Color::Rgb(0x20, 0x20, 0x50);

/// Something that can show a session to the player
pub trait RenderSink {
    fn draw(&mut self, snapshot: &Snapshot<'_>, metrics: &GameMetrics) -> Result<()>;
}

/// Draws snapshots to a ratatui terminal
pub struct TerminalSink<B: Backend> {
    terminal: Terminal<B>,
    renderer: Renderer,
}

impl<B: Backend> TerminalSink<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            renderer: Renderer::new(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> RenderSink for TerminalSink<B> {
    fn draw(&mut self, snapshot: &Snapshot<'_>, metrics: &GameMetrics) -> Result<()> {
        let renderer = &self.renderer;
        self.terminal
            .draw(|frame| renderer.render(frame, snapshot, metrics))
            .context("Failed to draw frame")?;
        Ok(())
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot<'_>, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        let board_area = centered(
            chunks[1],
            tiles_to_cells(snapshot.grid_width, TILE_COLUMNS).saturating_add(CHROME_COLUMNS),
            tiles_to_cells(snapshot.grid_height, 1).saturating_add(2),
        );
        frame.render_widget(self.render_grid(snapshot, board_area), board_area);

        match snapshot.session {
            SessionState::Running => {}
            SessionState::Idle => {
                let menu_area = centered(board_area, 30, 7);
                frame.render_widget(Clear, menu_area);
                frame.render_widget(self.render_menu(), menu_area);
            }
            SessionState::GameOver => {
                let menu_area = centered(board_area, 34, 8);
                frame.render_widget(Clear, menu_area);
                frame.render_widget(self.render_game_over(snapshot), menu_area);
            }
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot<'_>, area: Rect) -> Paragraph<'_> {
        let head = snapshot.head();
        // Tiles outside the area would be clipped anyway
        let columns = snapshot
            .grid_width
            .min(usize::from(area.width.saturating_sub(CHROME_COLUMNS) / TILE_COLUMNS));
        let rows = snapshot
            .grid_height
            .min(usize::from(area.height.saturating_sub(2)));
        let mut lines = Vec::with_capacity(rows);

        for y in 0..rows {
            let mut spans = Vec::with_capacity(columns);

            for x in 0..columns {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "██",
                        Style::default()
                            .fg(HEAD_GREEN)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("▓▓", Style::default().fg(NEON_GREEN))
                } else if !snapshot.snake.is_empty() && pos == snapshot.food {
                    Span::styled(
                        "()",
                        Style::default().fg(FOOD_PINK).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(" ·", Style::default().fg(GRID_BLUE))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(NEON_GREEN)),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot<'_>, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_menu(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "NEON SNAKE",
                Style::default().fg(NEON_GREEN).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(NEON_GREEN)),
        )
    }

    fn render_game_over(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SYSTEM FAILURE",
                Style::default().fg(FOOD_PINK).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" REBOOT  ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(FOOD_PINK)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / swipe to move | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" to start | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal cells needed for `tiles` tiles, saturating at the largest area
fn tiles_to_cells(tiles: usize, cells_per_tile: u16) -> u16 {
    u16::try_from(tiles)
        .unwrap_or(u16::MAX)
        .saturating_mul(cells_per_tile)
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
