use std::time::{Duration, Instant};

/// Shortest tick interval the game accepts.
pub const MIN_INTERVAL_MS: u64 = 10;

/// A repeating timer driven by explicit instants.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker { interval: clamp(interval), next: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Starts the timer unless it is already running.
    pub fn start(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Replaces the interval. A running timer is rescheduled from `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = clamp(interval);
        if self.next.is_some() {
            self.next = Some(now + self.interval);
        }
    }

    /// Returns true at most once per call when a tick is due. Missed ticks
    /// are skipped instead of replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                let mut following = next + self.interval;
                if following <= now {
                    following = now + self.interval;
                }
                self.next = Some(following);
                true
            }
            _ => false,
        }
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }
}

fn clamp(interval: Duration) -> Duration {
    interval.max(Duration::from_millis(MIN_INTERVAL_MS))
}

/// The discrete speed choices, slowest first.
#[derive(Debug, Clone)]
pub struct SpeedLevels {
    levels: Vec<u64>,
    current: usize,
}

impl SpeedLevels {
    /// `levels` must not be empty. The current level is the one closest to
    /// `initial_ms`.
    pub fn new(levels: &[u64], initial_ms: u64) -> Self {
        let mut levels = levels.to_vec();
        levels.sort_unstable_by(|a, b| b.cmp(a));
        levels.dedup();

        let current = levels.iter()
            .enumerate()
            .min_by_key(|(_, ms)| ms.abs_diff(initial_ms))
            .map(|(i, _)| i)
            .unwrap_or(0);

        SpeedLevels { levels, current }
    }

    pub fn current_ms(&self) -> u64 {
        self.levels[self.current]
    }

    pub fn select(&mut self, index: usize) -> Option<u64> {
        if index < self.levels.len() {
            self.current = index;
            Some(self.current_ms())
        } else {
            None
        }
    }

    pub fn faster(&mut self) -> u64 {
        self.current = (self.current + 1).min(self.levels.len() - 1);
        self.current_ms()
    }

    pub fn slower(&mut self) -> u64 {
        self.current = self.current.saturating_sub(1);
        self.current_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn ticks_once_per_interval() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(ms(100));
        assert!(!ticker.poll(t0 + ms(500)));

        ticker.start(t0);
        assert!(!ticker.poll(t0 + ms(99)));
        assert!(ticker.poll(t0 + ms(100)));
        assert!(!ticker.poll(t0 + ms(150)));
        assert!(ticker.poll(t0 + ms(200)));
    }

    #[test]
    fn start_is_a_no_op_while_running() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(ms(100));
        ticker.start(t0);
        ticker.start(t0 + ms(90));
        assert!(ticker.poll(t0 + ms(100)));
    }

    #[test]
    fn stop_cancels_pending_ticks() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(ms(100));
        ticker.start(t0);
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
        assert!(!ticker.poll(t0 + ms(1000)));
        assert_eq!(ticker.time_until_tick(t0), None);
    }

    #[test]
    fn missed_ticks_are_skipped() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(ms(100));
        ticker.start(t0);
        assert!(ticker.poll(t0 + ms(550)));
        assert!(!ticker.poll(t0 + ms(600)));
        assert!(ticker.poll(t0 + ms(650)));
    }

    #[test]
    fn new_interval_applies_from_now() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(ms(100));
        ticker.start(t0);
        ticker.set_interval(ms(50), t0 + ms(80));
        assert_eq!(ticker.time_until_tick(t0 + ms(80)), Some(ms(50)));
        assert!(!ticker.poll(t0 + ms(100)));
        assert!(ticker.poll(t0 + ms(130)));
    }

    #[test]
    fn interval_change_does_not_start_a_stopped_timer() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(ms(100));
        ticker.set_interval(ms(50), t0);
        assert!(!ticker.is_running());
        assert_eq!(ticker.interval(), ms(50));
    }

    #[test]
    fn tiny_intervals_are_clamped() {
        let ticker = Ticker::new(ms(0));
        assert_eq!(ticker.interval(), ms(MIN_INTERVAL_MS));
    }

    #[test]
    fn speed_levels_pick_nearest_and_step() {
        let mut speeds = SpeedLevels::new(&[50, 200, 100, 150, 70], 110);
        assert_eq!(speeds.current_ms(), 100);
        assert_eq!(speeds.faster(), 70);
        assert_eq!(speeds.faster(), 50);
        assert_eq!(speeds.faster(), 50);
        assert_eq!(speeds.select(0), Some(200));
        assert_eq!(speeds.slower(), 200);
        assert_eq!(speeds.select(9), None);
        assert_eq!(speeds.current_ms(), 200);
    }
}
