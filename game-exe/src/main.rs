//! Runs the game without a window: the demo loop, a recorded demo, or a
//! warp straight to a map, at 35 tics a second.

mod cli;
mod config;
mod d_main;
mod hud;
mod timestep;

use std::error::Error;
use std::path::PathBuf;

use cli::*;
use gameplay::log::{self, error, info};
use gamestate::Game;
use mimalloc::MiMalloc;
use simplelog::TermLogger;
use sound_nosnd::Snd;
use sound_traits::{SoundAction, SoundServer, SoundServerTic};
use wad::WadData;

use crate::config::UserConfig;
use crate::d_main::d_doom_loop;
use input::Input;

const BASE_DIR: &str = "room4doom/";

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// The main `game-exe` crate should take care of initialising a few things
fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Warn),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load();
    user_config.sync_cli(&mut options);
    user_config.write();

    let wad = WadData::new(PathBuf::from(&options.iwad))?;

    let mut snd = Snd::new()?;
    let snd_tx = snd.init()?;
    let shutdown_tx = snd_tx.clone();
    let snd_thread = std::thread::spawn(move || while snd.tic() {});
    info!("Started sound server");

    let result = Game::new(options.clone().into(), wad, snd_tx)
        .map_err(Box::<dyn Error>::from)
        .and_then(|game| {
            let input = Input::new(user_config.input.clone());
            d_doom_loop(game, input, &options)
        });

    // already gone if the game was dropped, needed if it never started
    shutdown_tx.send(SoundAction::Shutdown).ok();
    if snd_thread.join().is_err() {
        error!("Sound server thread panicked");
    }
    if let Err(e) = &result {
        error!("{e}");
    }
    result
}
