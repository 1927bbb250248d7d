//! Editorial workflow core
//!
//! - `lifecycle`: the pure manuscript state machine (states, decisions,
//!   legal transitions)
//! - `ops`: the side-effecting workflow operations (role gate, single
//!   transaction per transition, notification fan-out)
//! - `messages`: notification text builders

pub mod lifecycle;
pub mod messages;
pub mod ops;

pub use lifecycle::Decision;
pub use ops::{DecisionOutcome, NewManuscript};
