use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;

use crate::Cell;
use crate::engine::{Board, GameState, TickOutcome};
use crate::snake::Direction;
use crate::store::ScoreStore;
use crate::timer::Ticker;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Start,
    Pause,
    Reset,
    SetSpeed(u64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Paused,
    AwaitingRetry,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameOverReport {
    pub score: u32,
    pub best: u32,
    pub new_best: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Started,
    /// Start was pressed after game over: the retry prompt goes away but the
    /// finished game stays until a reset.
    RetryHidden,
    Paused,
    Reset,
    SpeedChanged(Duration),
    Ticked { ate: bool },
    GameOver(GameOverReport),
}

/// Owns the game state and is its only writer. Inputs arrive as commands
/// and take effect on the next `update`.
pub struct Session<S, R> {
    board: Board,
    start: Cell,
    state: GameState,
    phase: Phase,
    retry_prompt: bool,
    best_score: u32,
    ticker: Ticker,
    commands: VecDeque<Command>,
    store: S,
    rng: R,
}

impl<S: ScoreStore, R: Rng> Session<S, R> {
    pub fn new(board: Board, start: Cell, speed: Duration, store: S, mut rng: R) -> Self {
        let best_score = match store.load_best() {
            Ok(best) => best,
            Err(err) => {
                warn!("could not load best score, starting from 0: {}", err);
                0
            }
        };
        let state = GameState::new(&board, start, &mut rng);

        Session {
            board,
            start,
            state,
            phase: Phase::Ready,
            retry_prompt: false,
            best_score,
            ticker: Ticker::new(speed),
            commands: VecDeque::new(),
            store,
            rng,
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Drains the command queue, then runs one tick if the timer is due.
    pub fn update(&mut self, now: Instant) -> Vec<Event> {
        let mut events = vec![];

        while let Some(command) = self.commands.pop_front() {
            if let Some(event) = self.apply(command, now) {
                events.push(event);
            }
        }

        if self.ticker.poll(now) {
            events.push(self.tick());
        }

        debug_assert_eq!(self.ticker.is_running(), self.phase == Phase::Running);
        events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn speed(&self) -> Duration {
        self.ticker.interval()
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_tick(now)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn apply(&mut self, command: Command, now: Instant) -> Option<Event> {
        match command {
            Command::Turn(dir) => {
                if !self.state.snake.set_direction(dir) {
                    debug!("ignored turn to {:?} while moving {:?}", dir, self.state.snake.get_direction());
                }
                None
            }
            Command::Start => match self.phase {
                Phase::Ready | Phase::Paused => {
                    self.ticker.start(now);
                    self.phase = Phase::Running;
                    info!("game started");
                    Some(Event::Started)
                }
                Phase::AwaitingRetry if self.retry_prompt => {
                    self.retry_prompt = false;
                    Some(Event::RetryHidden)
                }
                Phase::Running | Phase::AwaitingRetry => None,
            },
            Command::Pause => {
                if self.phase != Phase::Running {
                    return None;
                }
                self.ticker.stop();
                self.phase = Phase::Paused;
                info!("game paused");
                Some(Event::Paused)
            }
            Command::Reset => {
                self.state = GameState::new(&self.board, self.start, &mut self.rng);
                self.ticker.stop();
                self.ticker.start(now);
                self.phase = Phase::Running;
                self.retry_prompt = false;
                info!("game reset");
                Some(Event::Reset)
            }
            Command::SetSpeed(ms) => {
                self.ticker.set_interval(Duration::from_millis(ms), now);
                info!("tick interval set to {}ms", self.ticker.interval().as_millis());
                Some(Event::SpeedChanged(self.ticker.interval()))
            }
        }
    }

    fn tick(&mut self) -> Event {
        match self.state.tick(&self.board, &mut self.rng) {
            TickOutcome::Moved { ate } => {
                if ate {
                    debug!("food eaten, score {}, length {}", self.state.score, self.state.snake.len());
                }
                Event::Ticked { ate }
            }
            TickOutcome::GameOver { score } => Event::GameOver(self.finish(score)),
        }
    }

    fn finish(&mut self, score: u32) -> GameOverReport {
        self.ticker.stop();
        self.phase = Phase::AwaitingRetry;
        self.retry_prompt = true;

        let new_best = score > self.best_score;
        if new_best {
            self.best_score = score;
            if let Err(err) = self.store.save_best(score) {
                warn!("could not save best score {}: {}", score, err);
            }
        }

        info!("game over, score {} (best {})", score, self.best_score);
        GameOverReport { score, best: self.best_score, new_best }
    }
}
