//! Domain models for the clinic-desk system.

mod catalog;
mod patient;

pub use catalog::*;
pub use patient::*;
