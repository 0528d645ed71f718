use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use classic_snake::app::App;
use classic_snake::config::GameConfig;
use classic_snake::food::FoodPlacer;
use classic_snake::game::GameEngine;
use classic_snake::input::InputHandler;
use classic_snake::logging::{default_log_path, init_file_logging};
use classic_snake::renderer;
use classic_snake::score::{JsonFileStore, ScoreStore, ScoreTracker, default_scores_path};
use classic_snake::terminal_runtime::TerminalSession;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Board edge length in cells.
    #[arg(long, default_value_t = GameConfig::default().grid_size)]
    grid_size: u16,

    /// Ticks per second at the start of a game.
    #[arg(long, default_value_t = GameConfig::default().initial_speed)]
    initial_speed: u32,

    /// Highest reachable ticks per second.
    #[arg(long, default_value_t = GameConfig::default().max_speed)]
    max_speed: u32,

    /// Seed food placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// High score file (defaults to the platform data directory).
    #[arg(long)]
    scores_file: Option<PathBuf>,

    /// Log file (defaults to the platform data directory).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            grid_size: self.grid_size,
            initial_speed: self.initial_speed,
            max_speed: self.max_speed,
            ..GameConfig::default()
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let config = cli.game_config();
    config
        .validate()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Err(error) = init_file_logging(&log_path) {
        eprintln!("Logging disabled ({}): {error}", log_path.display());
    }

    let store = JsonFileStore::new(cli.scores_file.clone().unwrap_or_else(default_scores_path));
    let (scores, status) = ScoreTracker::load_checked(store);
    if let Err(error) = status {
        eprintln!("Warning: high score unavailable: {error}");
    }

    let placer = match cli.seed {
        Some(seed) => FoodPlacer::with_seed(config.grid(), seed),
        None => FoodPlacer::new(config.grid()),
    };
    let engine = GameEngine::new(config, placer, scores);
    let mut app = App::new(engine);

    info!(?config, seed = ?cli.seed, "starting classic-snake");
    run(&mut app)?;
    info!(high_score = app.engine().high_score(), "exiting");
    Ok(())
}

fn run<S: ScoreStore>(app: &mut App<S>) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();

    while !app.should_quit() {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &app.snapshot(), app.theme()))?;

        if let Some(game_input) = input.poll_input(app.input_timeout(Instant::now()))? {
            app.handle_input(game_input, Instant::now());
        }

        app.update(Instant::now());
    }

    Ok(())
}
