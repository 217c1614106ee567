use std::collections::VecDeque;

use crate::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Offset of one step of `size` units. The y axis grows downwards.
    pub fn offset(self, size: i32) -> (i32, i32) {
        match self {
            Up => (0, -size),
            Down => (0, size),
            Left => (-size, 0),
            Right => (size, 0),
        }
    }
}

/// The snake body, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(pos: Cell, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(pos);
        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], direction: Direction) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least one cell");
        Snake { body: cells.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Returns whether the turn was accepted. Reversals are dropped silently.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    /// Pushes a new head one step ahead and returns it. The tail stays.
    pub fn advance(&mut self, step: i32) -> Cell {
        let (dx, dy) = self.direction.offset(step);
        let old_head = self.head();
        let new_head = (old_head.0 + dx, old_head.1 + dy);

        self.body.push_front(new_head);
        new_head
    }

    pub fn drop_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    pub fn hits_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|cell| *cell == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [Up, Down, Left, Right];

    #[test]
    fn reversal_is_ignored_for_every_direction() {
        for dir in ALL {
            let mut snake = Snake::from_cells(&[(100, 100), (80, 100)], dir);
            assert!(!snake.set_direction(dir.opposite()));
            assert_eq!(snake.get_direction(), dir);
        }
    }

    #[test]
    fn perpendicular_turn_is_accepted() {
        let mut snake = Snake::new((0, 0), Right);
        assert!(snake.set_direction(Up));
        assert_eq!(snake.get_direction(), Up);
    }

    #[test]
    fn turns_are_checked_against_the_current_direction_only() {
        let mut snake = Snake::from_cells(&[(40, 0), (20, 0), (0, 0)], Right);
        assert!(snake.set_direction(Up));
        assert!(snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Left);
    }

    #[test]
    fn advance_moves_head_one_step() {
        for dir in ALL {
            let mut snake = Snake::new((100, 100), dir);
            let (dx, dy) = dir.offset(20);
            let head = snake.advance(20);
            assert_eq!(head, (100 + dx, 100 + dy));
            assert_eq!(snake.head(), head);
            assert_eq!(snake.len(), 2);
        }
    }

    #[test]
    fn tail_is_never_dropped_below_one_cell() {
        let mut snake = Snake::new((0, 0), Right);
        assert_eq!(snake.drop_tail(), None);
        snake.advance(20);
        assert_eq!(snake.drop_tail(), Some((0, 0)));
        assert_eq!(snake.body().copied().collect::<Vec<_>>(), vec![(20, 0)]);
    }

    #[test]
    fn detects_self_collision() {
        let snake = Snake::from_cells(&[(20, 20), (40, 20), (40, 40), (20, 40), (20, 20)], Up);
        assert!(snake.hits_itself());

        let snake = Snake::from_cells(&[(20, 20), (40, 20)], Left);
        assert!(!snake.hits_itself());
    }
}
