pub mod constants;
pub mod env;
pub mod job_config;
pub mod progress_bars;
