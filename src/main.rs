mod config;
mod engine;
mod error;
mod game;
mod input;
mod logging;
mod render;
mod session;
mod snake;
mod store;
mod term;
mod timer;

use std::{path::PathBuf, process::exit};

use log::info;

pub type TermInt = u16;
pub type Coords = (u16, u16);
/// Board position, in multiples of the box size.
pub type Cell = (i32, i32);

fn main() {
    if let Err(err) = run() {
        eprintln!("snake: {}", err);
        exit(1);
    }
}

fn run() -> error::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::Config::load(config_path.as_deref())?;
    logging::init_logging(&config.logging)?;
    info!("starting with {:?}", config);

    let mut game = game::SnakeGame::new(&config)?;
    game.initialize()?;
    game.show_intro()?;

    // The main game loop returns once the player quits
    game.run()?;
    game.shutdown()
}
