//! Entity types

pub mod order;

pub use order::{GroupParseError, Observation, Order, ProcessGroup, MIN_MEASUREMENT};
