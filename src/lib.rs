// src/lib.rs
pub mod job;
pub mod matching;
pub mod models;
pub mod utils;
