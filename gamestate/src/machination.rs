//! A `Machination` is defined as something that can be a self-contained entity.
//! These implement the `MachinationTrait` which allows them to initialise their
//! state and tick (update self). The methods on this trait provide access
//! to `GameTraits` methods.

use gamestate_traits::MachinationTrait;

/// Blob of various tickers required during gameplay, this exists mostly to pass things
/// around as some functions can end up with quite a few args
pub struct Machinations<I, H, F>
where
    I: MachinationTrait,
    H: MachinationTrait,
    F: MachinationTrait,
{
    /// The HUD statuses (things like player messages), ticked during
    /// `GameState::Level`
    pub hud_msgs: H,
    /// Intermission - WI_Ticker calls level_done()
    pub intermission: I,
    /// Show the finale screen
    pub finale: F,
}
