pub mod config;
pub mod predict;
pub mod priority;
pub mod schedule;
