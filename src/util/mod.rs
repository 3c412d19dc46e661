//! Internal utilities.

pub mod arena;

pub use arena::{SlotArena, SlotIndex};
