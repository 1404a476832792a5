// LogDoctor - app/mod.rs
//
// Application layer: file validation, analysis orchestration, knowledge-base
// loading.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod analysis;
pub mod knowledge_mgr;
