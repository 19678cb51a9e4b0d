//! All environment interaction stuff. Things like `Thinker`s that move parts of
//! the level, switches, and line specials

pub mod platforms;
pub mod specials;
