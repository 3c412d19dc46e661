//! Core types for futures: result values, states, and completion outcomes.

pub mod outcome;
pub mod state;
pub mod value;

pub use outcome::FutureOutcome;
pub use state::FutureState;
pub use value::{FutureValue, ValueTag};
