//! Percentile ranking and composite scoring over a loaded dataset.

pub mod calculator;
pub mod composite;
pub mod percentile;
pub mod sentiment;
