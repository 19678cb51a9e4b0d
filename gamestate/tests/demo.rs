mod common;

use common::*;
use gameplay::TicCmd;
use gamestate::DoomOptions;
use gamestate::demo::DemoPlayer;
use gamestate_traits::{GameState, GameTraits};
use math::FixedPoint;
use wad::test_utils::{shareware_bytes, test_demo};

#[test]
fn single_demo_plays_then_quits() {
    let options = DoomOptions {
        play_demo: Some("demo1".to_string()),
        ..DoomOptions::default()
    };
    let TestGame { mut game, .. } = new_game(shareware_bytes(), options);
    let mut m = machinations();

    let mut tics = 0;
    while game.running() && tics < 100 {
        run_tic(&mut game, &mut m);
        tics += 1;
        if tics == 10 {
            assert!(game.is_demo_playback());
            assert_eq!(game.gamestate, GameState::Level);
            assert!(player_mobj(&game).x > FixedPoint::from_int(150));
        }
    }
    // 35 recorded tics, the next finds the end marker
    assert_eq!(tics, 36);
    assert!(!game.is_demo_playback());
}

#[test]
fn demo_loop_moves_on_after_demo() {
    let TestGame { mut game, .. } = new_game(shareware_bytes(), DoomOptions::default());
    let mut m = machinations();

    // title page
    run_tic(&mut game, &mut m);
    assert_eq!(game.gamestate, GameState::DemoScreen);
    assert_eq!(game.page_name, "TITLEPIC");

    // 170 tics of title then demo1 starts
    for _ in 0..171 {
        run_tic(&mut game, &mut m);
    }
    assert!(game.is_demo_playback());

    for _ in 0..40 {
        run_tic(&mut game, &mut m);
    }
    assert!(game.running());
    assert!(!game.is_demo_playback());
    assert_eq!(game.gamestate, GameState::DemoScreen);
    assert_eq!(game.page_name, "CREDIT");
}

#[test]
fn turbo_warning_cadence() {
    let demo = demo_lump(&[[0x33, 0, 0, 0]; 140]);
    let options = DoomOptions {
        play_demo: Some("demo1".to_string()),
        ..DoomOptions::default()
    };
    let TestGame { mut game, .. } = new_game(shareware_with_demo(demo), options);
    let mut m = machinations();

    run_tic(&mut game, &mut m);
    assert_eq!(game.player_msg_take().as_deref(), Some("Green is turbo!"));

    // player 1's window comes round every 128 tics
    for _ in 1..128 {
        run_tic(&mut game, &mut m);
        assert_eq!(game.player_msg_take(), None, "tic {}", game.game_tic);
    }
    run_tic(&mut game, &mut m);
    assert_eq!(game.player_msg_take().as_deref(), Some("Green is turbo!"));
}

#[test]
fn slow_walk_is_not_turbo() {
    let options = DoomOptions {
        play_demo: Some("demo1".to_string()),
        ..DoomOptions::default()
    };
    let TestGame { mut game, .. } = new_game(shareware_with_demo(test_demo()), options);
    let mut m = machinations();
    run_tic(&mut game, &mut m);
    assert_eq!(game.player_msg_take(), None);
}

#[test]
fn recorded_demo_plays_back_the_same() {
    let dir = temp_dir("record");
    let name = dir.join("rec").to_string_lossy().to_string();
    let options = DoomOptions {
        record: Some(name.clone()),
        ..warp_options(1, 1)
    };
    let TestGame { mut game, .. } = new_game(shareware_bytes(), options);
    let mut m = machinations();

    for t in 0..40 {
        game.build_local_cmd(|cmd: &mut TicCmd| {
            cmd.forwardmove = 0x19;
            cmd.sidemove = if t % 2 == 0 { 0x18 } else { -0x18 };
            cmd.angleturn = 0x1234;
        });
        run_tic(&mut game, &mut m);
    }
    assert!(game.is_demo_recording());
    let recorded = player_mobj(&game).clone();
    game.quit_game();
    assert!(!game.is_demo_recording());
    assert!(!game.running());

    let bytes = std::fs::read(format!("{name}.lmp")).unwrap();
    let (header, mut player) = DemoPlayer::read_header(bytes.clone()).unwrap();
    assert_eq!(header.episode, 1);
    assert_eq!(header.map, 1);
    let mut count = 0;
    while let Some(cmd) = player.read_cmd() {
        // the low byte of the turn is lost in short tics
        assert_eq!(cmd.angleturn, 0x1200);
        count += 1;
    }
    assert_eq!(count, 40);

    let options = DoomOptions {
        play_demo: Some("demo1".to_string()),
        ..DoomOptions::default()
    };
    let TestGame { mut game, .. } = new_game(shareware_with_demo(bytes), options);
    for _ in 0..40 {
        run_tic(&mut game, &mut m);
    }
    let played = player_mobj(&game);
    assert_eq!(played.x, recorded.x);
    assert_eq!(played.y, recorded.y);
    assert_eq!(played.angle, recorded.angle);
    assert_eq!(played.momx, recorded.momx);
    assert_eq!(played.momy, recorded.momy);
}
