use crossterm::style::Color;

use crate::Cell;
use crate::engine::GameState;

pub const FOOD_COLOR: Color = Color::Red;
pub const HEAD_COLOR: Color = Color::Green;
pub const BODY_COLOR: Color = Color::Rgb { r: 144, g: 238, b: 144 };
pub const OUTLINE_COLOR: Color = Color::DarkGreen;

/// A flat 2D surface addressed in cells.
pub trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, cell: Cell, color: Color);
    fn stroke_rect(&mut self, cell: Cell, color: Color);
    fn present(&mut self) -> crate::error::Result<()>;
}

/// Draws the food, then every snake segment head first.
pub fn draw_state<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    surface.clear();
    surface.fill_rect(state.food, FOOD_COLOR);

    for (i, cell) in state.snake.body().enumerate() {
        let fill = if i == 0 { HEAD_COLOR } else { BODY_COLOR };
        surface.fill_rect(*cell, fill);
        surface.stroke_rect(*cell, OUTLINE_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::{Snake, Direction::Left};

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Fill(Cell, Color),
        Stroke(Cell, Color),
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl Surface for Recorder {
        fn clear(&mut self) {
            self.0.push(Op::Clear);
        }

        fn fill_rect(&mut self, cell: Cell, color: Color) {
            self.0.push(Op::Fill(cell, color));
        }

        fn stroke_rect(&mut self, cell: Cell, color: Color) {
            self.0.push(Op::Stroke(cell, color));
        }

        fn present(&mut self) -> crate::error::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn draws_food_then_snake_head_first() {
        let state = GameState {
            snake: Snake::from_cells(&[(40, 0), (60, 0)], Left),
            food: (100, 100),
            score: 0,
        };
        let mut rec = Recorder::default();
        draw_state(&mut rec, &state);

        assert_eq!(rec.0, vec![
            Op::Clear,
            Op::Fill((100, 100), FOOD_COLOR),
            Op::Fill((40, 0), HEAD_COLOR),
            Op::Stroke((40, 0), OUTLINE_COLOR),
            Op::Fill((60, 0), BODY_COLOR),
            Op::Stroke((60, 0), OUTLINE_COLOR),
        ]);
    }
}
