use crate::{Cell, Coords, TermInt};
use crate::config::Config;
use crate::engine::Board;
use crate::error::{Error, Result};
use crate::input::ButtonBar;
use crate::render::Surface;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, poll, read};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

const FILLED_CHAR: char = '█';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph::plain(' ');

    pub const fn plain(ch: char) -> Self {
        Glyph { ch, fg: Color::Reset, bg: Color::Reset }
    }
}

/// What has been painted on one board cell this frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Paint {
    fill: Option<Color>,
    stroke: Option<Color>,
}

impl Paint {
    /// A cell is two glyphs wide so it looks roughly square.
    fn glyphs(self) -> [Glyph; 2] {
        match (self.fill, self.stroke) {
            (None, None) => [Glyph::BLANK; 2],
            (Some(fill), None) => [Glyph { ch: FILLED_CHAR, fg: fill, bg: Color::Reset }; 2],
            (fill, Some(stroke)) => {
                let bg = fill.unwrap_or(Color::Reset);
                [Glyph { ch: '[', fg: stroke, bg }, Glyph { ch: ']', fg: stroke, bg }]
            }
        }
    }
}

/// Where everything goes on screen. Computed once per session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub board: Board,
    /// Board side in cells.
    pub side: TermInt,
    /// Column of the left border.
    pub frame_left: TermInt,
    /// Screen position of the top left board cell.
    pub origin: Coords,
    pub status_row: TermInt,
    pub buttons_row: TermInt,
}

impl Layout {
    /// Fits the largest square board into the terminal, leaving room for the
    /// border, the status line, the button bar and the configured margin.
    pub fn fit(size: Coords, config: &Config) -> Result<Layout> {
        let (width, height) = size;
        let avail_cols = width.saturating_sub(2) / 2;
        let avail_rows = height.saturating_sub(4);
        let side = avail_cols.min(avail_rows).saturating_sub(config.margin);

        let (sx, sy) = config.start_cell;
        if side == 0 || sx >= side as i32 || sy >= side as i32 {
            return Err(Error::BoardTooSmall { columns: width, rows: height });
        }

        let units = side as i32 * config.box_size;
        let frame_left = (width - (side * 2 + 2)) / 2;

        Ok(Layout {
            board: Board::new(units, units, config.box_size),
            side,
            frame_left,
            origin: (frame_left + 1, 1),
            status_row: side + 2,
            buttons_row: side + 3,
        })
    }

    pub fn frame_size(&self) -> Coords {
        (self.side * 2 + 2, self.side + 2)
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
    layout: Option<Layout>,
    frame: Vec<Paint>,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        Ok(TermManager {
            width, height, stdout, screen,
            current_msg: None,
            layout: None,
            frame: vec![],
            active: false,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.active = true;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, DisableMouseCapture, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Waits up to `timeout` for input, then drains whatever else is queued.
    pub fn read_events(&self, timeout: Duration) -> Result<Vec<Event>> {
        let mut events = vec![];

        if poll(timeout)? {
            events.push(read()?);
            while poll(Duration::ZERO)? {
                events.push(read()?);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.frame = vec![Paint::default(); layout.side as usize * layout.side as usize];
        self.layout = Some(layout);
    }

    pub fn draw_borders(&mut self, top_left: Coords, size: Coords) -> Result<()> {
        let (width, height) = size;
        let (x0, y0) = top_left;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    /// Writes `text` from `pos`, padding the rest of the terminal row.
    pub fn print_line(&mut self, pos: Coords, text: &str) -> Result<()> {
        let room = self.width.saturating_sub(pos.0) as usize;
        let padded = format!("{:<room$}", text, room = room);

        for (i, ch) in padded.chars().take(room).enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch)?;
        }

        Ok(())
    }

    pub fn draw_buttons(&mut self, bar: &ButtonBar) -> Result<()> {
        self.print_line((0, bar.row()), "")?;
        for (button, x) in bar.slots() {
            for (i, ch) in button.label().chars().enumerate() {
                self.print_at((x + i as TermInt, bar.row()), ch)?;
            }
        }
        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = match &self.layout {
            Some(layout) => (layout.origin.0 + layout.side, layout.origin.1 + layout.side / 2),
            None => (self.width / 2, self.height / 2),
        };
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), Glyph::BLANK)?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), Glyph::plain(ch))?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(idx) = self.index((x, y)) {
                    let glyph = self.screen[idx];
                    self.print_at_no_save((x, y), glyph)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        self.print_glyph(pos, Glyph::plain(ch))
    }

    pub fn clear_screen(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    /// Updates the screen buffer and writes the glyph if it changed. Glyphs
    /// under a message are only buffered; hiding the message shows them.
    fn print_glyph(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        let idx = match self.index(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };

        if self.screen[idx] == glyph {
            return Ok(());
        }
        self.screen[idx] = glyph;

        if self.covered(pos) {
            return Ok(());
        }
        self.print_at_no_save(pos, glyph)
    }

    fn print_at_no_save(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        // Used for messages, which must not overwrite the buffer they are
        // restored from
        if self.index(pos).is_none() {
            return Ok(());
        }

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(glyph.fg),
            style::SetBackgroundColor(glyph.bg),
            style::Print(glyph.ch)
        )?;
        Ok(())
    }

    fn covered(&self, pos: Coords) -> bool {
        self.current_msg.as_ref().map_or(false, |msg| {
            pos.0 >= msg.top_left.0 && pos.0 < msg.top_left.0 + msg.width &&
            pos.1 >= msg.top_left.1 && pos.1 < msg.top_left.1 + msg.height
        })
    }

    fn paint(&mut self, cell: Cell) -> Option<&mut Paint> {
        let layout = self.layout.as_ref()?;
        let (gx, gy) = layout.board.grid_pos(cell)?;
        let idx = gy as usize * layout.side as usize + gx as usize;
        self.frame.get_mut(idx)
    }
}

impl Surface for TermManager {
    fn clear(&mut self) {
        for paint in self.frame.iter_mut() {
            *paint = Paint::default();
        }
    }

    fn fill_rect(&mut self, cell: Cell, color: Color) {
        if let Some(paint) = self.paint(cell) {
            paint.fill = Some(color);
        }
    }

    fn stroke_rect(&mut self, cell: Cell, color: Color) {
        if let Some(paint) = self.paint(cell) {
            paint.stroke = Some(color);
        }
    }

    fn present(&mut self) -> Result<()> {
        let layout = match self.layout {
            Some(layout) => layout,
            None => return Ok(()),
        };

        for gy in 0..layout.side {
            for gx in 0..layout.side {
                let paint = self.frame[gy as usize * layout.side as usize + gx as usize];
                let [left, right] = paint.glyphs();
                let pos = (layout.origin.0 + gx * 2, layout.origin.1 + gy);
                self.print_glyph(pos, left)?;
                self.print_glyph((pos.0 + 1, pos.1), right)?;
            }
        }

        self.flush()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_a_square_board_in_a_standard_terminal() {
        let layout = Layout::fit((80, 24), &Config::default()).unwrap();
        assert_eq!(layout.side, 18);
        assert_eq!(layout.board, Board::new(360, 360, 20));
        assert_eq!(layout.frame_left, 21);
        assert_eq!(layout.origin, (22, 1));
        assert_eq!(layout.frame_size(), (38, 20));
        assert_eq!(layout.status_row, 20);
        assert_eq!(layout.buttons_row, 21);
    }

    #[test]
    fn tiny_terminal_is_rejected() {
        let res = Layout::fit((30, 12), &Config::default());
        assert!(matches!(res, Err(Error::BoardTooSmall { columns: 30, rows: 12 })));
        assert!(Layout::fit((0, 0), &Config::default()).is_err());
    }

    #[test]
    fn paint_to_glyphs() {
        assert_eq!(Paint::default().glyphs(), [Glyph::BLANK; 2]);

        let food = Paint { fill: Some(Color::Red), stroke: None }.glyphs();
        assert_eq!(food[0], Glyph { ch: FILLED_CHAR, fg: Color::Red, bg: Color::Reset });

        let segment = Paint { fill: Some(Color::Green), stroke: Some(Color::DarkGreen) }.glyphs();
        assert_eq!(segment[0], Glyph { ch: '[', fg: Color::DarkGreen, bg: Color::Green });
        assert_eq!(segment[1].ch, ']');
    }
}
