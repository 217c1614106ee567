use rand::Rng;

use crate::Cell;
use crate::snake::{Snake, Direction::Right};

/// Playing field measured in the same units as cells. Every cell is a
/// multiple of `box_size`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub box_size: i32,
}

impl Board {
    pub fn new(width: i32, height: i32, box_size: i32) -> Self {
        Board { width, height, box_size }
    }

    pub fn columns(&self) -> i32 {
        self.width / self.box_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.box_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.0) && (0..self.height).contains(&cell.1)
    }

    /// Grid coordinates of a cell, `None` when it lies outside the board.
    pub fn grid_pos(&self, cell: Cell) -> Option<(i32, i32)> {
        if self.contains(cell) {
            Some((cell.0 / self.box_size, cell.1 / self.box_size))
        } else {
            None
        }
    }

    /// Uniform over all grid cells, occupied or not.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        let x = rng.gen_range(0..self.columns()) * self.box_size;
        let y = rng.gen_range(0..self.rows()) * self.box_size;
        (x, y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved { ate: bool },
    GameOver { score: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Cell,
    pub score: u32,
}

impl GameState {
    pub fn new<R: Rng + ?Sized>(board: &Board, start: Cell, rng: &mut R) -> Self {
        GameState {
            snake: Snake::new(start, Right),
            food: board.random_cell(rng),
            score: 0,
        }
    }

    pub fn is_game_over(&self, board: &Board) -> bool {
        !board.contains(self.snake.head()) || self.snake.hits_itself()
    }

    /// Advances the game by one step.
    ///
    /// Game over is checked before moving, so a snake that just left the
    /// board is still drawn once and reported on the following tick.
    pub fn tick<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> TickOutcome {
        if self.is_game_over(board) {
            return TickOutcome::GameOver { score: self.score };
        }

        let new_head = self.snake.advance(board.box_size);

        if new_head == self.food {
            self.score += 1;
            self.food = board.random_cell(rng);
            TickOutcome::Moved { ate: true }
        } else {
            self.snake.drop_tail();
            TickOutcome::Moved { ate: false }
        }
    }
}
