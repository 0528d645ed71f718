use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::food::FoodPlacer;
use crate::grid::{Cell, Grid};
use crate::input::{Direction, direction_change_is_valid};
use crate::score::{ScoreStore, ScoreTracker};
use crate::snake::Snake;

/// Heading of every freshly started snake.
pub const START_DIRECTION: Direction = Direction::Right;

/// High-level lifecycle of one session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RunState {
    NotStarted,
    Running,
    Paused,
    Over,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameOverReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

/// Result of one [`GameEngine::tick`] call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed.
    Idle,
    Moved,
    Ate { speed_changed: bool },
    GameOver(GameOverReason),
}

/// Complete mutable state for one game, replaced wholesale on restart.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub snake: Snake,
    /// `None` only once the board is full.
    pub food: Option<Cell>,
    /// Direction the next tick moves in.
    pub direction: Direction,
    heading: Direction,
    pub score: u32,
    pub speed_level: u32,
    pub run_state: RunState,
    pub tick_count: u64,
    pub over_reason: Option<GameOverReason>,
    /// Set once this session beats the previous high score.
    pub new_high_score: bool,
}

impl GameSession {
    /// Builds a running session from an explicit board position.
    ///
    /// Score starts at 0 and speed at `config.initial_speed`; both fields can
    /// be adjusted before the session is handed to [`GameEngine::with_session`].
    #[must_use]
    pub fn new(config: &GameConfig, snake: Snake, heading: Direction, food: Option<Cell>) -> Self {
        Self {
            snake,
            food,
            direction: heading,
            heading,
            score: 0,
            speed_level: config.initial_speed,
            run_state: RunState::Running,
            tick_count: 0,
            over_reason: None,
            new_high_score: false,
        }
    }

    /// Direction of the most recent completed move.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Replaces the snake and aligns both heading and pending direction.
    #[cfg(test)]
    pub(crate) fn place_snake(&mut self, snake: Snake, heading: Direction) {
        self.snake = snake;
        self.direction = heading;
        self.heading = heading;
    }

    fn occupied_cells(&self) -> HashSet<Cell> {
        self.snake.segments().copied().collect()
    }
}

/// Read-only view handed to the rendering collaborator.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: Grid,
    pub snake: &'a Snake,
    pub food: Option<Cell>,
    pub heading: Direction,
    pub run_state: RunState,
    pub score: u32,
    pub high_score: u32,
    pub speed_level: u32,
    pub over_reason: Option<GameOverReason>,
    pub new_high_score: bool,
}

/// Owns the session and applies the game rules to it.
#[derive(Debug)]
pub struct GameEngine<S> {
    config: GameConfig,
    placer: FoodPlacer,
    scores: ScoreTracker<S>,
    session: GameSession,
}

impl<S: ScoreStore> GameEngine<S> {
    /// Creates an engine waiting on the start screen.
    ///
    /// `config` is expected to have passed [`GameConfig::validate`].
    pub fn new(config: GameConfig, placer: FoodPlacer, scores: ScoreTracker<S>) -> Self {
        let mut placer = placer;
        let session = fresh_session(&config, &mut placer);

        Self {
            config,
            placer,
            scores,
            session,
        }
    }

    /// Creates an engine that continues from `session`.
    pub fn with_session(
        config: GameConfig,
        placer: FoodPlacer,
        scores: ScoreTracker<S>,
        session: GameSession,
    ) -> Self {
        Self {
            config,
            placer,
            scores,
            session,
        }
    }

    /// NotStarted -> Running with a freshly initialised session.
    pub fn start(&mut self) -> bool {
        if self.session.run_state != RunState::NotStarted {
            return false;
        }

        self.session = fresh_session(&self.config, &mut self.placer);
        self.session.run_state = RunState::Running;
        info!(
            speed_level = self.session.speed_level,
            food = ?self.session.food,
            "game started"
        );
        true
    }

    /// Over -> NotStarted -> Running.
    pub fn restart(&mut self) -> bool {
        if self.session.run_state != RunState::Over {
            return false;
        }

        self.session.run_state = RunState::NotStarted;
        info!("restarting game");
        self.start()
    }

    pub fn pause(&mut self) -> bool {
        if self.session.run_state != RunState::Running {
            return false;
        }

        self.session.run_state = RunState::Paused;
        info!(score = self.session.score, "game paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.session.run_state != RunState::Paused {
            return false;
        }

        self.session.run_state = RunState::Running;
        info!("game resumed");
        true
    }

    /// Pauses a running game or resumes a paused one.
    pub fn toggle_pause(&mut self) -> bool {
        match self.session.run_state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            RunState::NotStarted | RunState::Over => false,
        }
    }

    /// Sets the direction read by the next tick; latest valid request wins.
    ///
    /// Rejected unless running, and when `direction` reverses the current one.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let session = &mut self.session;
        if session.run_state != RunState::Running
            || !direction_change_is_valid(session.direction, direction)
        {
            return false;
        }

        session.direction = direction;
        true
    }

    /// Advances the running game by one cell.
    pub fn tick(&mut self) -> TickOutcome {
        if self.session.run_state != RunState::Running {
            return TickOutcome::Idle;
        }

        let grid = self.config.grid();
        let session = &mut self.session;
        session.tick_count += 1;

        let direction = session.direction;
        let next_head = session.snake.peek_next_head(direction);
        if !grid.contains(next_head) {
            return self.finish(GameOverReason::WallCollision);
        }

        let grew = session.food == Some(next_head);
        session.snake.advance(direction, grew);
        session.heading = direction;

        if session.snake.self_collides() {
            return self.finish(GameOverReason::SelfCollision);
        }

        if !grew {
            return TickOutcome::Moved;
        }

        session.score += 1;
        if self.scores.record_score(session.score) {
            session.new_high_score = true;
            debug!(high_score = session.score, "new high score");
        }

        match self.placer.place(&session.occupied_cells()) {
            Some(food) => session.food = Some(food),
            None => {
                session.food = None;
                return self.finish(GameOverReason::BoardFilled);
            }
        }

        let speed_changed = session.score % self.config.points_per_speed_level == 0
            && session.speed_level < self.config.max_speed;
        if speed_changed {
            session.speed_level += 1;
            info!(speed_level = session.speed_level, "speed increased");
        }

        TickOutcome::Ate { speed_changed }
    }

    fn finish(&mut self, reason: GameOverReason) -> TickOutcome {
        let session = &mut self.session;
        session.run_state = RunState::Over;
        session.over_reason = Some(reason);
        info!(
            final_score = session.score,
            high_score = self.scores.high_score(),
            ?reason,
            "game over"
        );
        TickOutcome::GameOver(reason)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        let session = &self.session;
        Snapshot {
            grid: self.config.grid(),
            snake: &session.snake,
            food: session.food,
            heading: session.heading,
            run_state: session.run_state,
            score: session.score,
            high_score: self.scores.high_score(),
            speed_level: session.speed_level,
            over_reason: session.over_reason,
            new_high_score: session.new_high_score,
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.session.run_state
    }

    #[must_use]
    pub fn speed_level(&self) -> u32 {
        self.session.speed_level
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.scores.high_score()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn scores(&self) -> &ScoreTracker<S> {
        &self.scores
    }
}

fn fresh_session(config: &GameConfig, placer: &mut FoodPlacer) -> GameSession {
    let grid = config.grid();
    let snake = Snake::new(grid.center(), START_DIRECTION, config.initial_length);
    let occupied: HashSet<Cell> = snake.segments().copied().collect();
    let food = placer.place(&occupied);

    GameSession {
        snake,
        food,
        direction: START_DIRECTION,
        heading: START_DIRECTION,
        score: 0,
        speed_level: config.initial_speed,
        run_state: RunState::NotStarted,
        tick_count: 0,
        over_reason: None,
        new_high_score: false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::GameConfig;
    use crate::food::FoodPlacer;
    use crate::grid::Cell;
    use crate::input::Direction;
    use crate::score::{HIGH_SCORE_KEY, MemoryStore, ScoreStore, ScoreTracker};
    use crate::snake::Snake;

    use super::{GameEngine, GameOverReason, GameSession, RunState, TickOutcome};

    fn engine_with_seed(seed: u64) -> GameEngine<MemoryStore> {
        let config = GameConfig::default();
        GameEngine::new(
            config,
            FoodPlacer::with_seed(config.grid(), seed),
            ScoreTracker::load(MemoryStore::new()),
        )
    }

    fn running_engine(seed: u64) -> GameEngine<MemoryStore> {
        let mut engine = engine_with_seed(seed);
        assert!(engine.start());
        engine
    }

    fn cells(engine: &GameEngine<MemoryStore>) -> Vec<Cell> {
        engine.session().snake.segments().copied().collect()
    }

    #[test]
    fn new_engine_waits_on_start_screen() {
        let mut engine = engine_with_seed(1);

        assert_eq!(engine.run_state(), RunState::NotStarted);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.set_direction(Direction::Up));
    }

    #[test]
    fn start_initialises_a_running_session() {
        let engine = running_engine(1);
        let session = engine.session();

        assert_eq!(session.run_state, RunState::Running);
        assert_eq!(
            cells(&engine),
            vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
        );
        assert_eq!(session.direction, Direction::Right);
        assert_eq!(session.score, 0);
        assert_eq!(session.speed_level, 7);

        let food = session.food.expect("fresh board has room for food");
        assert!(!session.snake.occupies(food));
    }

    #[test]
    fn engine_continues_from_a_given_session() {
        let config = GameConfig::default();
        let session = GameSession::new(
            &config,
            Snake::new(Cell::new(4, 4), Direction::Down, 2),
            Direction::Down,
            Some(Cell::new(4, 5)),
        );
        assert_eq!(session.run_state, RunState::Running);
        assert_eq!(session.speed_level, 7);

        let mut engine = GameEngine::with_session(
            config,
            FoodPlacer::with_seed(config.grid(), 1),
            ScoreTracker::load(MemoryStore::new()),
            session,
        );

        assert!(!engine.set_direction(Direction::Up));
        assert!(matches!(engine.tick(), TickOutcome::Ate { .. }));
        assert_eq!(cells(&engine), vec![Cell::new(4, 5), Cell::new(4, 4), Cell::new(4, 3)]);
        assert_eq!(engine.high_score(), 1);
    }

    #[test]
    fn start_is_a_no_op_once_running() {
        let mut engine = running_engine(1);
        engine.tick();

        assert!(!engine.start());
        assert_eq!(engine.session().tick_count, 1);
    }

    #[test]
    fn tick_moves_head_and_drops_tail() {
        let mut engine = running_engine(2);
        engine.session_mut().food = Some(Cell::new(0, 0));

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(
            cells(&engine),
            vec![Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10)]
        );
    }

    #[test]
    fn eating_grows_scores_and_replaces_food() {
        let mut engine = running_engine(3);
        engine.session_mut().food = Some(Cell::new(11, 10));

        assert_eq!(
            engine.tick(),
            TickOutcome::Ate {
                speed_changed: false
            }
        );

        let session = engine.session();
        assert_eq!(session.snake.len(), 4);
        assert_eq!(session.snake.tail(), Cell::new(8, 10));
        assert_eq!(session.score, 1);
        assert_eq!(engine.high_score(), 1);

        let food = session.food.expect("board has room for food");
        assert!(!session.snake.occupies(food));
    }

    #[test]
    fn wall_collision_ends_the_game() {
        let mut engine = running_engine(4);
        engine
            .session_mut()
            .place_snake(Snake::new(Cell::new(19, 10), Direction::Right, 3), Direction::Right);
        engine.session_mut().score = 3;
        let before = cells(&engine);

        assert_eq!(
            engine.tick(),
            TickOutcome::GameOver(GameOverReason::WallCollision)
        );
        assert_eq!(engine.run_state(), RunState::Over);
        assert_eq!(engine.session().score, 3);
        assert_eq!(cells(&engine), before);
    }

    #[test]
    fn self_collision_ends_the_game() {
        let mut engine = running_engine(5);
        engine.session_mut().place_snake(
            Snake::from_segments(vec![
                Cell::new(2, 2),
                Cell::new(1, 2),
                Cell::new(1, 3),
                Cell::new(2, 3),
                Cell::new(3, 3),
                Cell::new(3, 2),
            ]),
            Direction::Left,
        );
        engine.session_mut().food = Some(Cell::new(15, 15));

        assert!(engine.set_direction(Direction::Down));
        assert_eq!(
            engine.tick(),
            TickOutcome::GameOver(GameOverReason::SelfCollision)
        );
        assert_eq!(engine.session().over_reason, Some(GameOverReason::SelfCollision));
    }

    #[test]
    fn reverse_direction_is_rejected() {
        let mut engine = running_engine(6);

        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.session().direction, Direction::Right);
    }

    #[test]
    fn turn_is_checked_against_the_pending_direction() {
        let mut engine = running_engine(6);

        assert!(engine.set_direction(Direction::Up));
        assert!(!engine.set_direction(Direction::Down));
        assert!(engine.set_direction(Direction::Left));
        assert_eq!(engine.session().direction, Direction::Left);
    }

    #[test]
    fn folding_back_within_one_tick_hits_the_neck() {
        let mut engine = running_engine(6);
        engine.session_mut().food = Some(Cell::new(0, 0));

        assert!(engine.set_direction(Direction::Up));
        assert!(engine.set_direction(Direction::Left));

        assert_eq!(
            engine.tick(),
            TickOutcome::GameOver(GameOverReason::SelfCollision)
        );
    }

    #[test]
    fn latest_direction_request_wins() {
        let mut engine = running_engine(7);
        engine.session_mut().food = Some(Cell::new(0, 0));

        assert!(engine.set_direction(Direction::Up));
        assert!(!engine.set_direction(Direction::Down));
        assert!(engine.set_direction(Direction::Right));
        assert!(engine.set_direction(Direction::Down));
        engine.tick();

        assert_eq!(engine.session().snake.head(), Cell::new(10, 11));
        assert_eq!(engine.session().heading(), Direction::Down);
    }

    #[test]
    fn speed_rises_on_every_fifth_point() {
        let mut engine = running_engine(8);
        engine.session_mut().score = 4;
        engine.session_mut().food = Some(Cell::new(11, 10));

        assert_eq!(
            engine.tick(),
            TickOutcome::Ate {
                speed_changed: true
            }
        );
        assert_eq!(engine.session().score, 5);
        assert_eq!(engine.speed_level(), 8);

        engine.session_mut().food = Some(Cell::new(0, 0));
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.speed_level(), 8);
    }

    #[test]
    fn speed_is_capped_at_max() {
        let mut engine = running_engine(9);
        engine.session_mut().score = 9;
        engine.session_mut().speed_level = 15;
        engine.session_mut().food = Some(Cell::new(11, 10));

        assert_eq!(
            engine.tick(),
            TickOutcome::Ate {
                speed_changed: false
            }
        );
        assert_eq!(engine.speed_level(), 15);
    }

    #[test]
    fn pause_freezes_the_session() {
        let mut engine = running_engine(10);
        engine.session_mut().food = Some(Cell::new(0, 0));

        assert!(engine.pause());
        assert_eq!(engine.run_state(), RunState::Paused);
        let before = cells(&engine);

        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(cells(&engine), before);

        assert!(engine.resume());
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.session().snake.head(), Cell::new(11, 10));
    }

    #[test]
    fn pause_and_resume_are_no_ops_in_wrong_state() {
        let mut engine = running_engine(11);

        assert!(!engine.resume());
        assert!(engine.toggle_pause());
        assert!(!engine.pause());
        assert!(engine.toggle_pause());
        assert_eq!(engine.run_state(), RunState::Running);
    }

    #[test]
    fn restart_only_leaves_game_over() {
        let mut engine = running_engine(12);
        assert!(!engine.restart());

        engine
            .session_mut()
            .place_snake(Snake::new(Cell::new(19, 5), Direction::Right, 3), Direction::Right);
        engine.session_mut().score = 6;
        engine.session_mut().speed_level = 8;
        engine.tick();
        assert_eq!(engine.run_state(), RunState::Over);
        assert!(!engine.toggle_pause());
        assert_eq!(engine.tick(), TickOutcome::Idle);

        assert!(engine.restart());
        let session = engine.session();
        assert_eq!(session.run_state, RunState::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.speed_level, 7);
        assert_eq!(session.over_reason, None);
        assert_eq!(session.snake.head(), Cell::new(10, 10));
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let config = GameConfig {
            grid_size: 2,
            initial_length: 1,
            ..GameConfig::default()
        };
        let mut engine = GameEngine::new(
            config,
            FoodPlacer::with_seed(config.grid(), 13),
            ScoreTracker::load(MemoryStore::new()),
        );
        engine.start();
        engine.session_mut().place_snake(
            Snake::from_segments(vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)]),
            Direction::Up,
        );
        engine.session_mut().food = Some(Cell::new(1, 0));

        assert!(engine.set_direction(Direction::Right));
        assert_eq!(
            engine.tick(),
            TickOutcome::GameOver(GameOverReason::BoardFilled)
        );
        assert_eq!(engine.session().snake.len(), 4);
        assert_eq!(engine.session().food, None);
        assert_eq!(engine.session().score, 1);
    }

    #[test]
    fn high_score_persists_only_when_beaten() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, 2).expect("memory store never fails");
        let config = GameConfig::default();
        let mut engine = GameEngine::new(
            config,
            FoodPlacer::with_seed(config.grid(), 14),
            ScoreTracker::load(store),
        );
        engine.start();

        for expected_high in [2, 2, 3] {
            let next = engine.session().snake.peek_next_head(Direction::Right);
            engine.session_mut().food = Some(next);
            engine.tick();
            assert_eq!(engine.high_score(), expected_high);
        }
        assert!(engine.session().new_high_score);

        let stored = engine.scores().store().get(HIGH_SCORE_KEY).ok().flatten();
        assert_eq!(stored, Some(3));
    }

    #[test]
    fn snake_stays_duplicate_free_while_alive() {
        let mut engine = running_engine(15);
        let turns = [
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
        ];

        for step in 0..40 {
            if step % 3 == 0 {
                engine.set_direction(turns[(step / 3) % turns.len()]);
            }
            let before = engine.session().snake.len();
            match engine.tick() {
                TickOutcome::Moved => assert_eq!(engine.session().snake.len(), before),
                TickOutcome::Ate { .. } => assert_eq!(engine.session().snake.len(), before + 1),
                TickOutcome::GameOver(_) | TickOutcome::Idle => break,
            }

            let unique: HashSet<Cell> = engine.session().snake.segments().copied().collect();
            assert_eq!(unique.len(), engine.session().snake.len());
            if let Some(food) = engine.session().food {
                assert!(!engine.session().snake.occupies(food));
            }
        }
    }

    #[test]
    fn snapshot_reflects_session() {
        let mut engine = running_engine(16);
        engine.pause();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.run_state, RunState::Paused);
        assert_eq!(snapshot.snake.head(), Cell::new(10, 10));
        assert_eq!(snapshot.speed_level, 7);
        assert_eq!(snapshot.grid.size(), 20);
    }
}
