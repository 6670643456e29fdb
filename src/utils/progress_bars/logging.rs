// src/utils/progress_bars/logging.rs - Logging helpers for a screening run
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::models::stats_models::RunStats;

#[derive(Clone)]
pub struct JobLogger {
    job_name: &'static str,
    job_emoji: &'static str,
    start_time: Instant,
}

impl JobLogger {
    pub fn new(job_name: &'static str, job_emoji: &'static str) -> Self {
        Self {
            job_name,
            job_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn screening() -> Self {
        Self::new("SCREEN", "🔎")
    }

    pub fn log_start(&self, input: &str, batch_size: usize, workers: usize) {
        info!(
            "[{}] {} 🚀 Starting donor screening on {}",
            self.job_name, self.job_emoji, input
        );
        info!(
            "[{}] {} ⚙️  Configuration: batch size {}, {} concurrent batches",
            self.job_name, self.job_emoji, batch_size, workers
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.job_name, self.job_emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.job_name, self.job_emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_alias_map_loaded(&self, entries: usize, exclusion_rules: usize) {
        info!(
            "[{}] {} 📚 Alias map ready: {} entries, {} exclusion rules",
            self.job_name, self.job_emoji, entries, exclusion_rules
        );
        if entries == 0 {
            warn!(
                "[{}] {} ⚠️  Alias map is empty; no record can be emitted",
                self.job_name, self.job_emoji
            );
        }
    }

    pub fn log_batch_progress(&self, batch_num: usize, lines_so_far: usize, emitted_so_far: usize) {
        if batch_num % 50 == 0 || batch_num == 1 {
            info!(
                "[{}] {} 📦 Batch {} done ({} lines read, {} rows emitted)",
                self.job_name, self.job_emoji, batch_num, lines_so_far, emitted_so_far
            );
        }
    }

    pub fn log_completion(&self, stats: &RunStats) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED: {} rows emitted from {} lines in {:.2?}",
            self.job_name, self.job_emoji, stats.emitted, stats.lines_read, duration
        );
        info!(
            "[{}] {} 📊 Dropped: {} unresolved, {} without score, {} at/above threshold, {} excluded",
            self.job_name,
            self.job_emoji,
            stats.unresolved,
            stats.missing_score,
            stats.above_threshold,
            stats.excluded
        );
        debug!(
            "[{}] {} {} header lines skipped",
            self.job_name, self.job_emoji, stats.header_lines
        );
        self.log_malformed(stats);
        match serde_json::to_string(stats) {
            Ok(json) => debug!("[{}] {} run stats: {}", self.job_name, self.job_emoji, json),
            Err(e) => warn!("[{}] {} could not serialize run stats: {}", self.job_name, self.job_emoji, e),
        }
    }

    fn log_malformed(&self, stats: &RunStats) {
        let malformed = &stats.malformed;
        if malformed.total() > 0 {
            warn!(
                "[{}] {} ⚠️  Data quality: {} malformed lines ({} empty, {} non-ASCII, {} unparseable, {} short)",
                self.job_name,
                self.job_emoji,
                malformed.total(),
                malformed.empty,
                malformed.non_ascii,
                malformed.tokenize,
                malformed.column_count
            );
        }
    }

    pub fn get_elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
