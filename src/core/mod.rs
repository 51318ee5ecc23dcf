pub mod dataset;
pub mod engine;
pub mod fusion;
pub mod search;
pub mod syllable;
pub mod types;
