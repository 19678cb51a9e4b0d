//! This crate contains all the structures and tools for processing
//! WAD files, maps, things, basically all the data.
//!
//! The structure of a WAD is this:
//!
//! ```text,ignore
//!                        <───── 32 bits ──────>
//!                        ┌────────────────────┐
//!             ┌──── 0x00 |  ASCII WAD Type    | 0x03
//!             |          | ────────────────── |
//!     Header ─┤     0x04 | # of directories   | 0x07
//!             |          | ────────────────── |
//!             └──── 0x08 | offset to listing ───0x0B ──┐
//!             ┌───────── | ────────────────── |        |
//!             |     0x0C | ┌────────────────┐ |        |
//!             |          | |   Lump Bytes   |<─────┐   |
//!     Lumps ──┤          | |       .        | |    |   |
//!             |          | └────────────────┘ |    |   |
//!             |          |         .          |    |   |
//!             └───────── |         .          |    |   |
//!             ┌───────── | ┌────────────────┐<─────────┘
//!             |          | |   Lump Offset  |──────┘
//!             |          | |----------------| |
//!  Directory ─┤          | |   Lump Size    | |
//!     List    |          | |----------------| |
//!             |          | |   Lump Name    | |
//!             |          | └────────────────┘ |
//!             |          |         .          |
//!             |          |         .          |
//!             |          |         .          |
//!             └───────── └────────────────────┘
//! ```
//!
//! The game core only ever sees the WAD as a named byte store: `get_lump`
//! for plain reads, and the reference counted `AssetStore` for lumps that are
//! held for a while (demos).

/// Bring only the WAD structs down to root level
pub use crate::wad::*;

/// The WAD structure and parser
pub mod wad;

/// A Lump is a chunk of data that starts at an offset in the WAD, and ends
/// at a location that is `sizeof<record-in-lump> * num-of-entries`
///
/// The lump module contains the required structures that the map lump records
/// are parsed in to.
pub mod lumps;

/// Typed iterators over the records of a map lump
pub mod iterators;

/// Reference counted lump cache, `W_CacheLumpName` and friends
pub mod cache;

/// Build WADs in memory. Used by tests across the workspace so that no
/// commercial IWAD is required.
pub mod test_utils;

pub use cache::AssetStore;
