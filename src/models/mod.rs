pub mod record;
pub mod stats_models;
