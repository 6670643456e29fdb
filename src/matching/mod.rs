// src/matching/mod.rs
pub mod canonicalizer;
pub mod gate;
pub mod normalizer;
pub mod pipeline;
pub mod similarity;

pub use canonicalizer::AliasMap;
pub use gate::{ExclusionRule, GatePolicy};
pub use pipeline::{LineOutcome, LinePipeline};
