//! Artillery-style game core: a bullet fired at an angle and force across a
//! bounded grid, hitting point targets, obstacles and bosses.
//!
//! `entities` holds the validated data types, `compute` the trajectory
//! engine and attempt bookkeeping, `config` the stage files.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
