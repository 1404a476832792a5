// LogDoctor - lib.rs
//
// Library entry point, exposing all modules for integration testing and for
// embedding the analyzer in other front-ends.
//
// The CLI lives in `main.rs` and is not part of the library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
