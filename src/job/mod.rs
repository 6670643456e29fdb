// src/job/mod.rs
pub mod runner;

pub use runner::JobRunner;
