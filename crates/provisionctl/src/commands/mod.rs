//! Command implementations

pub mod bucket;
pub mod config;
pub mod item;
pub mod run;
pub mod table;
pub mod wait;
