// File: src/lib.rs
pub mod config;
pub mod countdown;
pub mod logging;
pub mod model;
pub mod paths;
pub mod storage;
pub mod store;
pub mod ticker;

#[cfg(feature = "tui")]
pub mod tui;
