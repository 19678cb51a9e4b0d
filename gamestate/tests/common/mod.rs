#![allow(dead_code)]

use std::path::PathBuf;

use gameplay::{MapObject, Platform};
use gamestate::machination::Machinations;
use gamestate::{DoomOptions, Game};
use gamestate_traits::{GameTraits, MachinationTrait};
use sound_nosnd::Snd;
use sound_traits::SoundServer;
use wad::WadData;

/// Does nothing, stands in for the HUD and the finale
pub struct Idle;

impl MachinationTrait for Idle {
    fn init(&mut self, _game: &impl GameTraits) {}

    fn ticker(&mut self, _game: &mut impl GameTraits) -> bool {
        false
    }
}

/// Finishes the intermission on its first tic
pub struct QuickIntermission {
    pub started: usize,
    pub ended: usize,
}

impl MachinationTrait for QuickIntermission {
    fn init(&mut self, _game: &impl GameTraits) {
        self.started += 1;
    }

    fn ticker(&mut self, game: &mut impl GameTraits) -> bool {
        game.level_done();
        false
    }

    fn end(&mut self, _game: &mut impl GameTraits) {
        self.ended += 1;
    }
}

pub type TestMachinations = Machinations<QuickIntermission, Idle, Idle>;

pub fn machinations() -> TestMachinations {
    Machinations {
        hud_msgs: Idle,
        intermission: QuickIntermission {
            started: 0,
            ended: 0,
        },
        finale: Idle,
    }
}

/// A game with the sound server kept alive beside it
pub struct TestGame {
    pub game: Game,
    _snd: Snd,
}

pub fn new_game(wad: Vec<u8>, options: DoomOptions) -> TestGame {
    let mut snd = Snd::new().unwrap();
    let tx = snd.init().unwrap();
    let wad = WadData::from_bytes(wad).unwrap();
    let game = Game::new(options, wad, tx).unwrap();
    TestGame { game, _snd: snd }
}

/// Options to start straight into a map
pub fn warp_options(episode: i32, map: i32) -> DoomOptions {
    DoomOptions {
        warp: true,
        episode,
        map,
        ..DoomOptions::default()
    }
}

/// One pass of the main loop
pub fn run_tic(game: &mut Game, machinations: &mut TestMachinations) {
    game.ticker(machinations).unwrap();
    game.game_tic += 1;
}

/// The console player's body
pub fn player_mobj(game: &Game) -> &MapObject {
    let id = game.players[game.consoleplayer].mobj.unwrap();
    game.level
        .as_ref()
        .unwrap()
        .thinkers
        .get(id)
        .unwrap()
        .mobj()
        .unwrap()
}

/// The one platform running in the level
pub fn lift(game: &Game) -> &Platform {
    game.level
        .as_ref()
        .unwrap()
        .thinkers
        .iter()
        .find_map(|(_, t)| t.platform())
        .unwrap()
}

/// A fresh directory under the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("room4doom-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Episode 1 IWAD with `demo` as `DEMO1`
pub fn shareware_with_demo(demo: Vec<u8>) -> Vec<u8> {
    let room = wad::test_utils::test_room();
    let mut builder = wad::test_utils::WadBuilder::iwad()
        .add_lump("TITLEPIC", vec![0])
        .add_lump("DEMO1", demo);
    for m in 1..=9 {
        builder = builder.add_map(&format!("E1M{m}"), &room);
    }
    builder.build()
}

/// A version 109 single player demo of E1M1
pub fn demo_lump(tics: &[[u8; 4]]) -> Vec<u8> {
    let mut demo = vec![109, 2, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0];
    for t in tics {
        demo.extend_from_slice(t);
    }
    demo.push(0x80);
    demo
}
