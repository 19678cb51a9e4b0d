mod common;

use common::*;
use gameplay::{GameAction, PlatStatus, PlayerState, Skill, TIC_CMD_BUTTONS, TicCmd};
use gamestate::{DoomOptions, GameError};
use gamestate_traits::{GameState, GameTraits};
use math::FixedPoint;
use wad::test_utils::{commercial_bytes, shareware_bytes};

#[test]
fn warp_starts_level() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 3));
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Level);
    assert_eq!(game.game_map(), 3);
    let level = game.level.as_ref().unwrap();
    assert_eq!(level.level_time, 1);
    assert_eq!(game.players[0].health, 100);
    assert_eq!(player_mobj(&game).x, FixedPoint::from_int(150));
}

#[test]
fn new_game_clamps_episode() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 1));
    let mut m = machinations();
    game.defered_init_new(Skill::Hard, 3, 12);
    run_tic(&mut game, &mut m);
    assert_eq!(game.game_episode(), 1);
    assert_eq!(game.game_map(), 9);
    assert_eq!(game.game_skill(), Skill::Hard);
}

#[test]
fn completed_goes_to_intermission_then_next_map() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 2));
    let mut m = machinations();
    for _ in 0..10 {
        run_tic(&mut game, &mut m);
    }
    game.level.as_mut().unwrap().do_exit_level();
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Intermission);
    assert!(game.level.is_none());
    assert_eq!(m.intermission.started, 1);

    let info = game.level_end_info();
    assert_eq!(info.epsd, 0);
    assert_eq!(info.last, 1);
    assert_eq!(info.next, 2);
    assert_eq!(info.partime, 75 * 35);
    assert_eq!(info.plyr[0].stime, 10);
    assert!(info.plyr[0].inn);

    // the test intermission calls level_done on its first tic
    assert_eq!(game.game_action(), GameAction::WorldDone);
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Level);
    assert_eq!(game.game_map(), 3);
    assert_eq!(m.intermission.ended, 1);
}

#[test]
fn secret_exit_and_return() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 3));
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    game.level.as_mut().unwrap().do_secret_exit_level();
    run_tic(&mut game, &mut m);
    assert_eq!(game.level_end_info().next, 8);
    run_tic(&mut game, &mut m);
    assert_eq!(game.game_map(), 9);
    assert!(game.players[0].didsecret);

    game.level.as_mut().unwrap().do_exit_level();
    run_tic(&mut game, &mut m);
    assert_eq!(game.level_end_info().next, 3);
    assert!(game.level_end_info().didsecret);
}

#[test]
fn secret_exit_marks_the_console_player() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 3));
    let mut m = machinations();
    game.begin_net_game([true, true, false, false], false).unwrap();
    run_tic(&mut game, &mut m);
    game.level.as_mut().unwrap().do_secret_exit_level();
    run_tic(&mut game, &mut m);
    assert_eq!(game.game_action(), GameAction::WorldDone);
    assert!(game.players[0].didsecret);
    assert!(!game.players[1].didsecret);
}

#[test]
fn episode_end_goes_to_finale() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 8));
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    game.level.as_mut().unwrap().do_exit_level();
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Finale);
    assert!(game.level.is_none());
    assert_eq!(m.intermission.started, 0);
}

#[test]
fn doom2_secret_map_routing() {
    let TestGame { mut game, .. } = new_game(commercial_bytes(), warp_options(1, 15));
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    game.level.as_mut().unwrap().do_secret_exit_level();
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Intermission);
    assert_eq!(game.level_end_info().next, 30);
    assert_eq!(game.level_end_info().partime, 210 * 35);
    // map 15 left by the secret exit shows the text screen first
    assert_eq!(game.game_action(), GameAction::Victory);

    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Finale);

    game.finale_done();
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Level);
    assert_eq!(game.game_map(), 31);
}

#[test]
fn doom2_normal_exit_skips_finale() {
    let TestGame { mut game, .. } = new_game(commercial_bytes(), warp_options(1, 4));
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    game.level.as_mut().unwrap().do_exit_level();
    run_tic(&mut game, &mut m);
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::Level);
    assert_eq!(game.game_map(), 5);
}

#[test]
fn pause_stops_the_world() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 1));
    let mut m = machinations();
    run_tic(&mut game, &mut m);

    game.toggle_pause_game();
    game.build_local_cmd(|_| {});
    run_tic(&mut game, &mut m);
    assert!(game.paused);
    let time = game.level.as_ref().unwrap().level_time;

    for _ in 0..5 {
        game.build_local_cmd(|_| {});
        run_tic(&mut game, &mut m);
    }
    assert_eq!(game.level.as_ref().unwrap().level_time, time);

    game.toggle_pause_game();
    game.build_local_cmd(|_| {});
    run_tic(&mut game, &mut m);
    assert!(!game.paused);
    assert_eq!(game.level.as_ref().unwrap().level_time, time + 1);
}

#[test]
fn dead_player_reloads_level() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 1));
    let mut m = machinations();
    for _ in 0..20 {
        game.build_local_cmd(|cmd| cmd.forwardmove = 0x19);
        run_tic(&mut game, &mut m);
    }
    assert!(player_mobj(&game).x > FixedPoint::from_int(150));

    game.players[0].player_state = PlayerState::Reborn;
    game.build_local_cmd(|_| {});
    run_tic(&mut game, &mut m);
    assert_eq!(game.players[0].player_state, PlayerState::Live);
    assert_eq!(game.level.as_ref().unwrap().level_time, 1);
    assert_eq!(player_mobj(&game).x, FixedPoint::from_int(150));
}

#[test]
fn use_button_starts_lift() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), warp_options(1, 1));
    let mut m = machinations();
    run_tic(&mut game, &mut m);

    game.build_local_cmd(|cmd| cmd.buttons = TIC_CMD_BUTTONS.bt_use);
    run_tic(&mut game, &mut m);
    let level = game.level.as_ref().unwrap();
    assert_eq!(level.active_platforms.len(), 1);

    // lowers, waits, comes back up and is removed
    for _ in 0..300 {
        game.build_local_cmd(|_| {});
        run_tic(&mut game, &mut m);
    }
    let level = game.level.as_ref().unwrap();
    assert!(level.active_platforms.is_empty());
    assert_eq!(level.map_data.sectors[1].floorheight, FixedPoint::from_int(64));
}

#[test]
fn netgame_consistency_failure() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), DoomOptions::default());
    let mut m = machinations();
    game.begin_net_game([true, true, false, false], false).unwrap();
    assert!(game.is_netgame());

    // the second player strafes off their start so the low bits of x are set
    let body_x = |game: &gamestate::Game| {
        let id = game.players[1].mobj.unwrap();
        let level = game.level.as_ref().unwrap();
        level.thinkers.get(id).unwrap().mobj().unwrap().x.raw() as i16
    };
    let remote_cmd = |consistancy| TicCmd {
        sidemove: 0x18,
        consistancy,
        ..TicCmd::new()
    };

    let mut seen = Vec::new();
    for tic in 0..24usize {
        seen.push(body_x(&game));
        let stamp = if tic > 12 { seen[tic - 12] } else { 0 };
        game.build_local_cmd(|_| {});
        game.netcmds[1][tic % 12] = remote_cmd(stamp);
        run_tic(&mut game, &mut m);
    }
    assert_ne!(seen[12], 0);

    // one bit off what the game worked out 12 tics ago
    let expected = seen[24 - 12];
    game.build_local_cmd(|_| {});
    game.netcmds[1][24 % 12] = remote_cmd(expected ^ 1);
    match game.ticker(&mut m) {
        Err(GameError::ConsistencyFailure {
            player,
            found,
            expected: wanted,
        }) => {
            assert_eq!(player, 1);
            assert_eq!(found, expected ^ 1);
            assert_eq!(wanted, expected);
        }
        other => panic!("expected a consistency failure, got {other:?}"),
    }
}

#[test]
fn save_then_load_restores_the_level() {
    let dir = temp_dir("save-load");
    let options = DoomOptions {
        save_dir: dir.clone(),
        ..warp_options(1, 1)
    };
    let TestGame { mut game, .. } = new_game(shareware_bytes(), options.clone());
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    // start the lift then back away, the lift is still lowering when saved
    for i in 0..10 {
        game.build_local_cmd(|cmd| {
            cmd.forwardmove = -0x19;
            cmd.angleturn = if i > 5 { 0x200 } else { 0 };
            if i == 0 {
                cmd.buttons = TIC_CMD_BUTTONS.bt_use;
            }
        });
        run_tic(&mut game, &mut m);
    }

    // the request rides the next command, the save happens a tic later
    game.save_game(0, "test".to_string());
    game.build_local_cmd(|_| {});
    run_tic(&mut game, &mut m);
    game.build_local_cmd(|_| {});
    run_tic(&mut game, &mut m);
    assert!(dir.join("doomsav0.dsg").exists());
    assert!(!dir.join("temp.dsg").exists());
    assert_eq!(
        game.player_msg_take().as_deref(),
        Some("\"test\" saved.")
    );
    let saved = player_mobj(&game).clone();
    assert_ne!(saved.momx, FixedPoint::ZERO);
    let saved_viewz = game.players[0].viewz;
    let saved_time = game.level.as_ref().unwrap().level_time;
    let saved_plat = lift(&game).clone();
    assert_eq!(saved_plat.status, PlatStatus::Down);

    let TestGame {
        game: mut loaded, ..
    } = new_game(
        shareware_bytes(),
        DoomOptions {
            load_slot: Some(0),
            ..options
        },
    );
    let mut m = machinations();
    run_tic(&mut loaded, &mut m);
    assert_eq!(loaded.gamestate, GameState::Level);
    assert_eq!(loaded.game_map(), 1);
    assert_eq!(loaded.level.as_ref().unwrap().level_time, saved_time);
    let restored = player_mobj(&loaded);
    assert_eq!(restored.x, saved.x);
    assert_eq!(restored.y, saved.y);
    assert_eq!(restored.z, saved.z);
    assert_eq!(restored.momx, saved.momx);
    assert_eq!(restored.momy, saved.momy);
    assert_eq!(restored.angle, saved.angle);
    assert_eq!(restored.health, saved.health);
    assert_eq!(loaded.players[0].viewz, saved_viewz);

    let plat = lift(&loaded);
    assert_eq!(plat.status, saved_plat.status);
    assert_eq!(plat.speed, saved_plat.speed);
    assert_eq!(plat.low, saved_plat.low);
    assert_eq!(plat.high, saved_plat.high);
    assert_eq!(plat.count, saved_plat.count);
    let level = loaded.level.as_ref().unwrap();
    assert_eq!(level.active_platforms.len(), 1);
    assert_eq!(
        level.map_data.sectors[1].floorheight,
        game.level.as_ref().unwrap().map_data.sectors[1].floorheight
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_save_is_not_fatal() {
    let dir = temp_dir("no-save");
    let TestGame { mut game, .. } = new_game(
        shareware_bytes(),
        DoomOptions {
            save_dir: dir.clone(),
            load_slot: Some(3),
            ..DoomOptions::default()
        },
    );
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    assert!(game.level.is_none());
    assert_eq!(game.game_action(), GameAction::None);
    let _ = std::fs::remove_dir_all(&dir);
}
