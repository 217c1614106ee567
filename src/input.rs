use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::TermInt;
use crate::snake::Direction::{self, *};

/// What the player asked for, before it is resolved against the game phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    Play,
    Pause,
    TogglePause,
    Reset,
    Retry,
    SelectSpeed(usize),
    Faster,
    Slower,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Play,
    Pause,
    Reset,
    Retry,
    Slower,
    Faster,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::Up => "[^]",
            Button::Down => "[v]",
            Button::Left => "[<]",
            Button::Right => "[>]",
            Button::Play => "[Play]",
            Button::Pause => "[Pause]",
            Button::Reset => "[Reset]",
            Button::Retry => "[Retry]",
            Button::Slower => "[-]",
            Button::Faster => "[+]",
        }
    }

    pub fn input(self) -> Input {
        match self {
            Button::Up => Input::Turn(Up),
            Button::Down => Input::Turn(Down),
            Button::Left => Input::Turn(Left),
            Button::Right => Input::Turn(Right),
            Button::Play => Input::Play,
            Button::Pause => Input::Pause,
            Button::Reset => Input::Reset,
            Button::Retry => Input::Retry,
            Button::Slower => Input::Slower,
            Button::Faster => Input::Faster,
        }
    }
}

/// One row of clickable labels.
#[derive(Debug, Clone)]
pub struct ButtonBar {
    row: TermInt,
    slots: Vec<(Button, TermInt, TermInt)>,
}

impl ButtonBar {
    /// Lays buttons out from `left`, dropping the ones that don't fit before
    /// `max_x`. Retry only exists once a game is over.
    pub fn layout(row: TermInt, left: TermInt, max_x: TermInt, show_retry: bool) -> Self {
        let retry: &[Button] = if show_retry { &[Button::Retry] } else { &[] };
        let groups: [&[Button]; 4] = [
            &[Button::Up, Button::Down, Button::Left, Button::Right],
            &[Button::Play, Button::Pause, Button::Reset],
            retry,
            &[Button::Slower, Button::Faster],
        ];

        let mut slots = vec![];
        let mut x = left;
        for group in groups.iter().filter(|g| !g.is_empty()) {
            for button in group.iter() {
                let width = button.label().len() as TermInt;
                if x + width > max_x {
                    return ButtonBar { row, slots };
                }
                slots.push((*button, x, width));
                x += width + 1;
            }
            x += 1;
        }

        ButtonBar { row, slots }
    }

    pub fn row(&self) -> TermInt {
        self.row
    }

    pub fn slots(&self) -> impl Iterator<Item = (Button, TermInt)> + '_ {
        self.slots.iter().map(|(button, x, _)| (*button, *x))
    }

    pub fn hit(&self, column: TermInt, row: TermInt) -> Option<Button> {
        if row != self.row {
            return None;
        }

        self.slots.iter()
            .find(|(_, x, width)| column >= *x && column < x + width)
            .map(|(button, _, _)| *button)
    }
}

/// Classifies a swipe from its `start - end` deltas in grid units.
/// Horizontal wins only when strictly dominant.
pub fn swipe_direction(dx: i32, dy: i32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > 0 { Some(Left) } else { Some(Right) }
    } else if dy > 0 {
        Some(Up)
    } else if dy < 0 {
        Some(Down)
    } else {
        None
    }
}

/// Turns raw terminal events into inputs. Mouse drags on the board act as
/// single-finger swipes and clicks on the bar press buttons.
pub struct InputAdapter {
    buttons: ButtonBar,
    swipe_start: Option<(TermInt, TermInt)>,
}

impl InputAdapter {
    pub fn new(buttons: ButtonBar) -> Self {
        InputAdapter { buttons, swipe_start: None }
    }

    pub fn buttons(&self) -> &ButtonBar {
        &self.buttons
    }

    pub fn set_buttons(&mut self, buttons: ButtonBar) {
        self.buttons = buttons;
    }

    pub fn translate(&mut self, event: &Event) -> Option<Input> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            _ => None,
        }
    }

    fn on_mouse(&mut self, ev: &MouseEvent) -> Option<Input> {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(button) = self.buttons.hit(ev.column, ev.row) {
                    self.swipe_start = None;
                    return Some(button.input());
                }
                self.swipe_start = Some((ev.column, ev.row));
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x0, y0) = self.swipe_start?;
                // A grid cell is two columns wide.
                let dx = (x0 as i32 - ev.column as i32) / 2;
                let dy = y0 as i32 - ev.row as i32;
                let dir = swipe_direction(dx, dy)?;
                self.swipe_start = None;
                Some(Input::Turn(dir))
            }
            MouseEventKind::Up(_) => {
                self.swipe_start = None;
                None
            }
            _ => None,
        }
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn map_key(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    let input = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Input::Turn(Up),
        KeyCode::Char('a') | KeyCode::Left => Input::Turn(Left),
        KeyCode::Char('s') | KeyCode::Down => Input::Turn(Down),
        KeyCode::Char('d') | KeyCode::Right => Input::Turn(Right),
        KeyCode::Char('p') => Input::Play,
        KeyCode::Enter => Input::Retry,
        KeyCode::Char(' ') | KeyCode::Esc => Input::TogglePause,
        KeyCode::Char('r') => Input::Reset,
        KeyCode::Char('+') | KeyCode::Char('=') => Input::Faster,
        KeyCode::Char('-') => Input::Slower,
        KeyCode::Char(c @ '1'..='9') => Input::SelectSpeed(c as usize - '1' as usize),
        KeyCode::Char('q') => Input::Quit,
        _ => return None,
    };

    Some(input)
}
