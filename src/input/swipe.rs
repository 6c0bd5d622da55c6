//! Mouse drags read as swipes
//!
//! A drag is measured from button press to release. Terminal cells are about
//! twice as tall as they are wide, so horizontal travel is halved before the
//! two axes are compared.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Minimum travel, in tiles, for a drag to count
pub const SWIPE_THRESHOLD: i32 = 1;

#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a mouse event; returns a direction when a swipe completes
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (start_column, start_row) = self.start.take()?;
                let dx = (event.column as i32 - start_column as i32) / 2;
                let dy = event.row as i32 - start_row as i32;
                classify(dx, dy)
            }
            _ => None,
        }
    }
}

fn classify(dx: i32, dy: i32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx.abs() <= SWIPE_THRESHOLD {
            return None;
        }
        Some(if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        if dy.abs() <= SWIPE_THRESHOLD {
            return None;
        }
        Some(if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}
