#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! multitool: a multi-command CLI root with platform-gated commands,
//! debug logging controls and opt-in call profiling.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod profile;
pub mod types;
