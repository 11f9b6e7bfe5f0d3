//! Loading the "Total Score" sheet into ranked company records.

pub mod cell;
pub mod grid;
pub mod loader;
pub mod record;
