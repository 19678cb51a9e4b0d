//! Exposes an API of sorts that allows crates for things like the
//! intermission and finale screens to get certain information they require or
//! cause a gamestate change.

pub use gameplay::{
    AmmoType, Card, GameMission, GameMode, PlayerCheat, PowerType, Skill, TICRATE,
    WBPlayerStruct, WBStartStruct, WeaponType,
};
pub use sound_traits::SfxName;

/// Used by tests across the workspace
pub mod test_utils;

/// The intermission parameters, filled in when a level is completed
pub type WorldInfo = WBStartStruct;

/// The current state of the game-exe: whether we are playing, gazing at the
/// intermission screen, the game-exe final animation, or a demo.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameState {
    /// The state the game will spend most of its time in is `GameState::Level`
    /// as this is where all of the actual gameplay happens (including net +
    /// deathmatch play).
    Level,
    Intermission,
    Finale,
    /// The second most seen state is `GameState::DemoScreen` which plays back
    /// recorded demos and is the default startup mode.
    DemoScreen,
}

/// The buttons a collaborator may watch for, per player
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerButtons {
    pub attack: bool,
    pub use_: bool,
}

/// Universal game traits. To be implemented by the Game
pub trait GameTraits {
    /// Helper to start a new game, e.g, from menus
    fn defered_init_new(&mut self, skill: Skill, episode: i32, map: i32);

    /// A lot of things in Doom are dependant on knowing which of the game
    /// releases is currently being played. Commercial (Doom II) contains
    /// demons that Doom doesn't have, and Doom contains intermission
    /// screens that Doom II doesn't have (for example).
    fn get_mode(&self) -> GameMode;

    fn get_mission(&self) -> GameMission;

    /// Episode being played, 1 based
    fn get_episode(&self) -> i32;

    /// Map being played, 1 based
    fn get_map(&self) -> i32;

    /// Ask the game to load this save
    fn load_game(&mut self, name: String);

    /// Ask the game to save to this slot with this name
    fn save_game(&mut self, slot: usize, description: String);

    /// Pauses the game-loop (generally stops gameplay input and thinkers
    /// running)
    fn toggle_pause_game(&mut self);

    /// Exit the game (there will be no confirmation)
    fn quit_game(&mut self);

    /// A basic sound starter
    fn start_sound(&mut self, sfx: SfxName);

    /// Tell the game that the level is completed and the next level or state
    /// should begin
    fn level_done(&mut self);

    fn finale_done(&mut self);

    /// Fetch the end-of-level information
    fn level_end_info(&self) -> &WorldInfo;

    /// Fetch the end-of-level player statistics (console player)
    fn player_end_info(&self) -> &WBPlayerStruct;

    /// This tic's buttons for each player in game, `None` if not playing
    fn player_buttons(&self) -> [Option<PlayerButtons>; 4];

    /// Takes the player message waiting and replaces with None
    fn player_msg_take(&mut self) -> Option<String>;
}

/// To be implemented by machination type things (HUD, intermission, finale)
pub trait MachinationTrait {
    /// Possibly initialise the machination
    fn init(&mut self, game: &impl GameTraits);

    /// Responds to changes in the game or affects game. Returns true if the
    /// machination is still busy.
    fn ticker(&mut self, game: &mut impl GameTraits) -> bool;

    /// Called as the game leaves the state this machination runs in
    fn end(&mut self, _game: &mut impl GameTraits) {}
}
