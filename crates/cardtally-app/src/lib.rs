// Library root: re-exports all modules so integration tests and the binary
// can access the host layer's public API.

pub mod app;
pub mod config;
pub mod input;
pub mod protocol;
pub mod render;
