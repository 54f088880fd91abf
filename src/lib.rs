// Game engine for putting shuffled sentences and words back in order.
// The binary (main.rs) owns the terminal UI; everything here is UI-free so
// integration tests and benchmarks can drive it through `reordr::*`.

pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod session;
