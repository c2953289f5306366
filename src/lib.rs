//! Gengoka - a TUI for two-step verbalization training
//!
//! Pick a theme, spend a shared two-minute budget writing what you think
//! (step 1) and why you think it (step 2), then review and save the run.
//! The binary entry point is in main.rs.

pub mod app;
pub mod config;
pub mod editor;
pub mod history;
pub mod input;
pub mod session;
pub mod themes;
pub mod ui;

mod theme;
