//! Shooting Gallery - a terminal arcade shooting gallery.
//!
//! Core modules:
//! - `geometry`: axis-aligned boxes and hit tests
//! - `entities`: pure game data
//! - `wave`: difficulty scaling and level progression
//! - `compute`: per-frame simulation (pure, RNG injected)
//! - `input`: abstract input events → domain commands
//! - `engine`: game state machine
//! - `frame`: draw-list and audio cue facade
//! - `display`: crossterm rendering

pub mod assets;
pub mod compute;
pub mod config;
pub mod display;
pub mod engine;
pub mod entities;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod wave;

pub use config::GameConfig;
pub use engine::{Engine, Phase};
pub use error::GameError;
