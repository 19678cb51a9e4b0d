use std::path::PathBuf;

use argh::FromArgs;
use gameplay::{LevelLimits, Skill, log};
use gamestate::DoomOptions;

/// CLI options for the game-exe
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// path to game-exe WAD
    #[argh(option, default = "Default::default()")]
    pub iwad: String,
    /// path to patch WAD
    #[argh(option)]
    pub pwad: Vec<String>,
    /// disable monsters
    #[argh(option, default = "false")]
    pub no_monsters: bool,
    /// monsters respawn after being killed
    #[argh(option, default = "false")]
    pub respawn: bool,
    /// monsters move faster
    #[argh(option, default = "false")]
    pub fast: bool,
    /// developer mode, extra logging
    #[argh(option, default = "false")]
    pub dev_parm: bool,
    /// start a deathmatch game-exe: 1 = classic, 2 = deathmatch 2.0
    #[argh(option, default = "0")]
    pub deathmatch: u8,
    /// set the game-exe skill, 0-4 (0: easiest, 4: hardest)
    #[argh(option)]
    pub skill: Option<Skill>,
    /// select episode
    #[argh(option)]
    pub episode: Option<i32>,
    /// select level in episode. If Doom II the episode is ignored
    #[argh(option)]
    pub map: Option<i32>,
    /// start a new game straight away rather than the demo loop
    #[argh(option, default = "false")]
    pub autostart: bool,
    /// play back a demo lump then quit, e.g `demo1`
    #[argh(option)]
    pub playdemo: Option<String>,
    /// record a new game to `<name>.lmp`
    #[argh(option)]
    pub record: Option<String>,
    /// record with full resolution turning (version 1.91 demos)
    #[argh(option, default = "false")]
    pub longtics: bool,
    /// load a save slot on startup
    #[argh(option)]
    pub loadgame: Option<usize>,
    /// directory for save games
    #[argh(option)]
    pub save_dir: Option<PathBuf>,
    /// quit after this many tics
    #[argh(option)]
    pub tics: Option<u32>,
    /// run tics as fast as possible rather than 35 a second
    #[argh(option, default = "false")]
    pub unpaced: bool,
    /// how many platforms can move at once
    #[argh(option)]
    pub max_platforms: Option<usize>,
}

impl From<CLIOptions> for DoomOptions {
    fn from(g: CLIOptions) -> Self {
        let mut limits = LevelLimits::default();
        if let Some(max) = g.max_platforms {
            limits.max_platforms = max;
        }
        DoomOptions {
            iwad: g.iwad,
            pwad: g.pwad,
            no_monsters: g.no_monsters,
            dev_parm: g.dev_parm,
            skill: g.skill.unwrap_or_default(),
            episode: g.episode.unwrap_or(1),
            map: g.map.unwrap_or(1),
            warp: g.map.is_some() || g.episode.is_some(),
            verbose: g.verbose.unwrap_or(log::LevelFilter::Warn),
            respawn_parm: g.respawn,
            fast_parm: g.fast,
            deathmatch: g.deathmatch,
            autostart: g.autostart,
            play_demo: g.playdemo,
            record: g.record,
            long_tics: g.longtics,
            load_slot: g.loadgame,
            save_dir: g.save_dir.unwrap_or_else(|| PathBuf::from(".")),
            limits,
        }
    }
}

#[cfg(test)]
mod tests {
    use argh::FromArgs;
    use gameplay::{Skill, log};
    use gamestate::DoomOptions;

    use super::CLIOptions;

    #[test]
    fn warp_from_map() {
        let cli = CLIOptions::from_args(
            &["room4doom"],
            &["--iwad", "doom2.wad", "--map", "7", "--skill", "3"],
        )
        .unwrap();
        let opts: DoomOptions = cli.into();
        assert!(opts.warp);
        assert_eq!(opts.map, 7);
        assert_eq!(opts.episode, 1);
        assert_eq!(opts.skill, Skill::Hard);
        assert_eq!(opts.verbose, log::LevelFilter::Warn);
    }

    #[test]
    fn demo_options() {
        let cli = CLIOptions::from_args(
            &["room4doom"],
            &["--record", "run", "--longtics", "true", "--max-platforms", "60"],
        )
        .unwrap();
        let opts: DoomOptions = cli.into();
        assert!(!opts.warp);
        assert_eq!(opts.record.as_deref(), Some("run"));
        assert!(opts.long_tics);
        assert_eq!(opts.limits.max_platforms, 60);
    }

    #[test]
    fn bad_skill_rejected() {
        assert!(CLIOptions::from_args(&["room4doom"], &["--skill", "9"]).is_err());
    }
}
