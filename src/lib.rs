//! wab: warehouse process A/B testing
//!
//! Generates synthetic warehouse orders, loads them from a SQLite order
//! store, and compares process A against process B on processing time and
//! labor cost with Welch's t-test.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
