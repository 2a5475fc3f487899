//! Connection Management
//!
//! Statement statistics for stores. The counter is the observable stand-in
//! for a round trip to the database.

pub mod statistics;

pub use statistics::*;
