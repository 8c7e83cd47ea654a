//! Domain model for the flight table and the selections made over it.

pub mod airline;
pub mod filter;
pub mod flight;
pub mod time;

#[cfg(test)]
pub(crate) mod fixtures;

pub use airline::*;
pub use filter::*;
pub use flight::*;
pub use time::*;
