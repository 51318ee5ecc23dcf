// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod persistence;
pub mod semantic;
pub mod server;
pub mod training;
pub use crate::core::engine::BlendEngine;
pub use crate::core::types::{MatchResult, Outcome, Prompt};
