//! The main loop driver. The primary function is the main loop which attempts
//! to run all tics that are due. Handling of actual game-exe state is done
//! within the `Game` object.

use std::error::Error;
use std::thread::sleep;
use std::time::Duration;

use finale_doom::Finale;
use gameplay::log::{debug, info};
use gamestate::machination::Machinations;
use gamestate::{Game, GameError};
use gamestate_traits::{GameTraits, MachinationTrait};
use input::{Input, InputEvent};
use intermission_doom::Intermission;

use crate::CLIOptions;
use crate::hud::Messages;
use crate::timestep::TimeStep;

/// Runs until the game stops or a tic fails
pub fn d_doom_loop(
    mut game: Game,
    mut input: Input,
    options: &CLIOptions,
) -> Result<(), Box<dyn Error>> {
    let mut machines = Machinations {
        hud_msgs: Messages::new(),
        intermission: Intermission::new(game.game_mode),
        finale: Finale::new(),
    };
    let mut timestep = TimeStep::new();

    while game.running() {
        // There's no window to poll, a frontend would hand its events over
        // here.
        process_events(&mut game, &mut input, std::iter::empty());

        if options.unpaced {
            run_tic(&mut game, &mut input, &mut machines, options.tics)?;
            timestep.count_tic();
        } else {
            let ran = timestep.run_this(|| {
                if !game.running() {
                    return Ok(());
                }
                run_tic(&mut game, &mut input, &mut machines, options.tics)
            })?;
            if ran == 0 {
                sleep(Duration::from_millis(1));
            }
        }

        if let Some(rate) = timestep.frame_rate() {
            debug!("{rate}");
        }
    }

    info!("Ran {} tics", game.game_tic);
    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;
    Ok(())
}

fn process_events(
    game: &mut Game,
    input: &mut Input,
    events: impl IntoIterator<Item = InputEvent>,
) {
    input.update(events, |_| false);
    if input.get_quit() {
        game.quit_game();
    }
}

/// One pass of `TryRunTics`: build the local command, run the game, count
/// the tic.
fn run_tic<I, H, F>(
    game: &mut Game,
    input: &mut Input,
    machinations: &mut Machinations<I, H, F>,
    max_tics: Option<u32>,
) -> Result<(), GameError>
where
    I: MachinationTrait,
    H: MachinationTrait,
    F: MachinationTrait,
{
    let cmd = input.build_tic_cmd();
    game.build_local_cmd(|c| {
        c.forwardmove = cmd.forwardmove;
        c.sidemove = cmd.sidemove;
        c.angleturn = cmd.angleturn;
        c.buttons = cmd.buttons;
    });
    game.ticker(machinations)?;
    game.game_tic += 1;

    if max_tics.is_some_and(|max| game.game_tic >= max) {
        info!("Reached {} tics", game.game_tic);
        game.quit_game();
    }
    Ok(())
}
