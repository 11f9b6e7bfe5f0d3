pub mod calculator;
pub mod screening;
pub mod sheet;
