use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::Result;
use crate::input::{ButtonBar, Input, InputAdapter};
use crate::render::{Surface, draw_state};
use crate::session::{Command, Event as GameEvent, GameOverReport, Phase, Session};
use crate::store::JsonFileStore;
use crate::term::{Layout, TermManager};
use crate::timer::SpeedLevels;

use crossterm::event::Event;
use log::{debug, info};
use rand::rngs::ThreadRng;

// Upper bound on how long we wait for input when no tick is pending
const IDLE_POLL: Duration = Duration::from_millis(50);

const INTRO_LINES: &[&str] = &[
    "Arrow keys, WASD or drag to move",
    "Space to pause, +/- or 1-9 for speed",
    "R to reset, Q or CTRL+C to quit",
    "",
    "Press P or Enter to play",
];

const PAUSE_LINES: &[&str] = &["Paused", "Space or P to resume", "or Q to quit"];

pub struct SnakeGame {
    term: TermManager,
    layout: Layout,
    session: Session<JsonFileStore, ThreadRng>,
    input: InputAdapter,
    speeds: SpeedLevels,
    last_report: Option<GameOverReport>,
}

impl SnakeGame {
    pub fn new(config: &Config) -> Result<Self> {
        let term = TermManager::new()?;
        let layout = Layout::fit(term.get_terminal_size(), config)?;
        let store = JsonFileStore::new(&config.best_score_path);
        info!("best score file {}", store.path().display());
        let speed = Duration::from_millis(config.speed_ms);
        let session = Session::new(layout.board, config.start(), speed, store, rand::thread_rng());
        let buttons = button_bar(&layout, term.get_terminal_size().0, false);

        info!(
            "board {}x{} cells, box size {}, best score {}",
            layout.side, layout.side, layout.board.box_size, session.best_score()
        );

        Ok(SnakeGame {
            term,
            layout,
            session,
            input: InputAdapter::new(buttons),
            speeds: SpeedLevels::new(&config.speed_levels, config.speed_ms),
            last_report: None,
        })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()?;
        self.term.clear_screen()?;
        self.term.set_layout(self.layout);
        self.term.draw_borders((self.layout.frame_left, 0), self.layout.frame_size())?;
        self.term.draw_buttons(self.input.buttons())?;
        self.render()?;
        self.draw_status()
    }

    pub fn show_intro(&mut self) -> Result<()> {
        self.term.show_message(INTRO_LINES)
    }

    /// Runs until the player quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let timeout = self.session.time_until_tick(Instant::now())
                .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));

            for ev in self.term.read_events(timeout)? {
                if let Event::Resize(w, h) = ev {
                    debug!("ignoring resize to {}x{}", w, h);
                    continue;
                }

                match self.input.translate(&ev) {
                    Some(Input::Quit) => return Ok(()),
                    Some(input) => {
                        if let Some(command) = resolve(input, self.session.phase(), &mut self.speeds) {
                            self.session.push(command);
                        }
                    }
                    None => {}
                }
            }

            for event in self.session.update(Instant::now()) {
                self.handle(event)?;
            }
        }
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle(&mut self, event: GameEvent) -> Result<()> {
        match event {
            GameEvent::Started => self.term.hide_message()?,
            GameEvent::RetryHidden => {
                self.term.hide_message()?;
                self.set_buttons(false)?;
            }
            GameEvent::Paused => self.term.show_message(PAUSE_LINES)?,
            GameEvent::Reset => {
                self.last_report = None;
                self.term.hide_message()?;
                self.set_buttons(false)?;
                self.render()?;
            }
            GameEvent::SpeedChanged(_) => {}
            GameEvent::Ticked { .. } => self.render()?,
            GameEvent::GameOver(report) => self.game_over(report)?,
        }

        self.draw_status()
    }

    fn game_over(&mut self, report: GameOverReport) -> Result<()> {
        self.last_report = Some(report);
        self.set_buttons(true)?;

        let score = format!("Score: {}", report.score);
        let mut lines = vec!["Game over!", &*score];
        if report.new_best {
            lines.push("New best score!");
        }
        lines.extend_from_slice(&["", "Enter or R to retry,", "or Q to quit."]);

        self.term.show_message(&lines)
    }

    fn set_buttons(&mut self, show_retry: bool) -> Result<()> {
        let bar = button_bar(&self.layout, self.term.get_terminal_size().0, show_retry);
        self.term.draw_buttons(&bar)?;
        self.input.set_buttons(bar);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        draw_state(&mut self.term, self.session.state());
        self.term.present()
    }

    fn draw_status(&mut self) -> Result<()> {
        let line = status_line(
            self.session.phase(),
            self.session.state().score,
            self.session.best_score(),
            self.session.speed(),
            self.last_report.as_ref(),
        );
        self.term.print_line((self.layout.frame_left, self.layout.status_row), &line)?;
        self.term.flush()
    }
}

fn button_bar(layout: &Layout, term_width: u16, show_retry: bool) -> ButtonBar {
    ButtonBar::layout(layout.buttons_row, layout.frame_left, term_width, show_retry)
}

/// Maps an input to a session command given the current phase.
fn resolve(input: Input, phase: Phase, speeds: &mut SpeedLevels) -> Option<Command> {
    let command = match input {
        Input::Turn(dir) => Command::Turn(dir),
        Input::Play => Command::Start,
        Input::Pause => Command::Pause,
        Input::TogglePause if phase == Phase::Running => Command::Pause,
        Input::TogglePause => Command::Start,
        Input::Reset => Command::Reset,
        Input::Retry if phase == Phase::AwaitingRetry => Command::Reset,
        Input::Retry => Command::Start,
        Input::SelectSpeed(index) => Command::SetSpeed(speeds.select(index)?),
        Input::Faster => Command::SetSpeed(speeds.faster()),
        Input::Slower => Command::SetSpeed(speeds.slower()),
        Input::Quit => return None,
    };

    Some(command)
}

fn status_line(
    phase: Phase,
    score: u32,
    best: u32,
    speed: Duration,
    report: Option<&GameOverReport>,
) -> String {
    if let (Phase::AwaitingRetry, Some(report)) = (phase, report) {
        return if report.new_best {
            format!("Game Over! New Best Score: {}", report.best)
        } else {
            format!("Game Over! Score: {} | Best: {}", report.score, report.best)
        };
    }

    let line = format!("Score: {} | Best: {} | Speed: {}ms", score, best, speed.as_millis());
    match phase {
        Phase::Ready => format!("{} | P to play", line),
        Phase::Paused => format!("{} | paused", line),
        Phase::Running | Phase::AwaitingRetry => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::Up;

    fn speeds() -> SpeedLevels {
        SpeedLevels::new(&[200, 150, 100, 70, 50], 100)
    }

    #[test]
    fn toggle_depends_on_phase() {
        let mut s = speeds();
        assert_eq!(resolve(Input::TogglePause, Phase::Running, &mut s), Some(Command::Pause));
        assert_eq!(resolve(Input::TogglePause, Phase::Paused, &mut s), Some(Command::Start));
        assert_eq!(resolve(Input::TogglePause, Phase::Ready, &mut s), Some(Command::Start));
    }

    #[test]
    fn retry_resets_only_after_game_over() {
        let mut s = speeds();
        assert_eq!(resolve(Input::Retry, Phase::AwaitingRetry, &mut s), Some(Command::Reset));
        assert_eq!(resolve(Input::Retry, Phase::Ready, &mut s), Some(Command::Start));
    }

    #[test]
    fn speed_inputs_become_intervals() {
        let mut s = speeds();
        assert_eq!(resolve(Input::Faster, Phase::Running, &mut s), Some(Command::SetSpeed(70)));
        assert_eq!(resolve(Input::SelectSpeed(0), Phase::Running, &mut s), Some(Command::SetSpeed(200)));
        assert_eq!(resolve(Input::Slower, Phase::Running, &mut s), Some(Command::SetSpeed(200)));
        assert_eq!(resolve(Input::SelectSpeed(7), Phase::Running, &mut s), None);
    }

    #[test]
    fn turns_pass_through() {
        let mut s = speeds();
        assert_eq!(resolve(Input::Turn(Up), Phase::Paused, &mut s), Some(Command::Turn(Up)));
        assert_eq!(resolve(Input::Quit, Phase::Running, &mut s), None);
    }

    #[test]
    fn status_lines() {
        let speed = Duration::from_millis(100);
        assert_eq!(status_line(Phase::Running, 3, 7, speed, None), "Score: 3 | Best: 7 | Speed: 100ms");
        assert_eq!(status_line(Phase::Paused, 3, 7, speed, None), "Score: 3 | Best: 7 | Speed: 100ms | paused");

        let report = GameOverReport { score: 3, best: 7, new_best: false };
        assert_eq!(
            status_line(Phase::AwaitingRetry, 3, 7, speed, Some(&report)),
            "Game Over! Score: 3 | Best: 7"
        );

        let report = GameOverReport { score: 9, best: 9, new_best: true };
        assert_eq!(
            status_line(Phase::AwaitingRetry, 9, 9, speed, Some(&report)),
            "Game Over! New Best Score: 9"
        );
    }
}
