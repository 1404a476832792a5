// LogDoctor - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or open files by path (discovery reads
// directory metadata only).

pub mod analyzer;
pub mod discovery;
pub mod export;
pub mod knowledge;
pub mod model;
pub mod report;
