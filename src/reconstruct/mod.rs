// Reconstruction domain — the six-stage external toolchain orchestration.

pub mod error;
pub mod orchestrator;
pub mod runner;
pub mod stage;
