use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::{THEMES, Theme};
use crate::game::{GameEngine, RunState, Snapshot, TickOutcome};
use crate::input::GameInput;
use crate::scheduler::{TickScheduler, period_for_speed};
use crate::score::ScoreStore;

/// Longest wait for input between redraws.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Wires the engine to its timer and to user commands.
///
/// Pausing leaves the timer running; the engine ignores ticks while paused,
/// so resuming continues on the same cadence.
#[derive(Debug)]
pub struct App<S> {
    engine: GameEngine<S>,
    scheduler: TickScheduler,
    theme_index: usize,
    should_quit: bool,
}

impl<S: ScoreStore> App<S> {
    #[must_use]
    pub fn new(engine: GameEngine<S>) -> Self {
        let scheduler = TickScheduler::new(period_for_speed(engine.speed_level()));
        Self {
            engine,
            scheduler,
            theme_index: 0,
            should_quit: false,
        }
    }

    /// Applies one command immediately; nothing is queued.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) {
        match input {
            GameInput::Direction(direction) => {
                if !self.engine.set_direction(direction) {
                    debug!(?direction, "direction change ignored");
                }
            }
            GameInput::TogglePause => {
                self.engine.toggle_pause();
            }
            GameInput::Confirm => match self.engine.run_state() {
                RunState::NotStarted => self.start(now),
                RunState::Over => self.restart(now),
                RunState::Running | RunState::Paused => {}
            },
            GameInput::Restart => self.restart(now),
            GameInput::ToggleTheme => {
                self.theme_index = (self.theme_index + 1) % THEMES.len();
                debug!(theme = self.theme().name, "theme changed");
            }
            GameInput::Quit => self.should_quit = true,
        }
    }

    fn start(&mut self, now: Instant) {
        if self.engine.start() {
            self.arm_scheduler(now);
        }
    }

    fn restart(&mut self, now: Instant) {
        if self.engine.restart() {
            self.arm_scheduler(now);
        }
    }

    fn arm_scheduler(&mut self, now: Instant) {
        self.scheduler
            .set_period(period_for_speed(self.engine.speed_level()), now);
        self.scheduler.start(now);
    }

    /// Runs at most one engine tick if the timer is due.
    pub fn update(&mut self, now: Instant) -> TickOutcome {
        if !self.scheduler.poll(now) {
            return TickOutcome::Idle;
        }

        let outcome = self.engine.tick();
        match outcome {
            TickOutcome::GameOver(_) => self.scheduler.stop(),
            TickOutcome::Ate {
                speed_changed: true,
            } => {
                let period = period_for_speed(self.engine.speed_level());
                self.scheduler.set_period(period, now);
                debug!(period_ms = period.as_millis(), "tick period updated");
            }
            TickOutcome::Idle | TickOutcome::Moved | TickOutcome::Ate { .. } => {}
        }
        outcome
    }

    /// How long the event loop may block on input before the next frame.
    #[must_use]
    pub fn input_timeout(&self, now: Instant) -> Duration {
        self.scheduler
            .time_until_next(now)
            .map_or(FRAME_INTERVAL, |remaining| remaining.min(FRAME_INTERVAL))
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.engine.snapshot()
    }

    #[must_use]
    pub fn theme(&self) -> &'static Theme {
        &THEMES[self.theme_index]
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine<S> {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut GameEngine<S> {
        &mut self.engine
    }

    #[must_use]
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}
