//! # trattoria
//!
//! Command-line application over `trattoria-core`: configuration, the clap
//! CLI and demo seeding.

pub mod cli;
pub mod config;
pub mod seed;
