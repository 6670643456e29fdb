// src/job/runner.rs - Streams an input file through the line pipeline in parallel batches
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::debug;
use std::collections::VecDeque;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::matching::pipeline::{BatchOutput, LinePipeline};
use crate::models::stats_models::RunStats;
use crate::utils::progress_bars::logging::JobLogger;

/// Reads lines, hands fixed-size batches to blocking worker threads and writes
/// the emitted rows back out in input order.
pub struct JobRunner {
    pipeline: LinePipeline,
    batch_size: usize,
    max_in_flight: usize,
    progress: Option<ProgressBar>,
    logger: JobLogger,
}

impl JobRunner {
    pub fn new(pipeline: LinePipeline, batch_size: usize, max_in_flight: usize) -> Self {
        Self {
            pipeline,
            batch_size: batch_size.max(1),
            max_in_flight: max_in_flight.max(1),
            progress: None,
            logger: JobLogger::screening(),
        }
    }

    pub fn with_progress(mut self, progress: Option<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: JobLogger) -> Self {
        self.logger = logger;
        self
    }

    fn spawn_batch(&self, lines: Vec<Vec<u8>>) -> JoinHandle<BatchOutput> {
        let pipeline = self.pipeline.clone();
        tokio::task::spawn_blocking(move || pipeline.process_batch(&lines))
    }

    async fn drain_batch<W>(
        &self,
        handle: JoinHandle<BatchOutput>,
        writer: &mut W,
        stats: &mut RunStats,
        batch_num: usize,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let output = handle
            .await
            .with_context(|| format!("Worker for batch {} did not complete", batch_num))?;
        for row in &output.rows {
            writer
                .write_all(row.as_bytes())
                .await
                .context("Failed to write output row")?;
            writer
                .write_all(b"\n")
                .await
                .context("Failed to write output row")?;
        }
        stats.merge(&output.stats);
        if let Some(pb) = &self.progress {
            pb.inc(output.stats.lines_read as u64);
        }
        self.logger
            .log_batch_progress(batch_num, stats.lines_read, stats.emitted);
        Ok(())
    }

    pub async fn run<R, W>(&self, reader: R, writer: &mut W) -> Result<RunStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut segments = reader.split(b'\n');
        let mut in_flight: VecDeque<JoinHandle<BatchOutput>> = VecDeque::new();
        let mut stats = RunStats::default();
        let mut batch: Vec<Vec<u8>> = Vec::with_capacity(self.batch_size);
        let mut batches_spawned = 0;
        let mut batches_drained = 0;

        while let Some(line) = segments
            .next_segment()
            .await
            .context("Failed to read input line")?
        {
            batch.push(line);
            if batch.len() < self.batch_size {
                continue;
            }
            let full = std::mem::replace(&mut batch, Vec::with_capacity(self.batch_size));
            in_flight.push_back(self.spawn_batch(full));
            batches_spawned += 1;

            if in_flight.len() >= self.max_in_flight {
                if let Some(handle) = in_flight.pop_front() {
                    batches_drained += 1;
                    self.drain_batch(handle, writer, &mut stats, batches_drained)
                        .await?;
                }
            }
        }

        if !batch.is_empty() {
            in_flight.push_back(self.spawn_batch(batch));
            batches_spawned += 1;
        }
        while let Some(handle) = in_flight.pop_front() {
            batches_drained += 1;
            self.drain_batch(handle, writer, &mut stats, batches_drained)
                .await?;
        }

        writer.flush().await.context("Failed to flush output")?;
        debug!("Processed {} batches", batches_spawned);
        if let Some(pb) = &self.progress {
            pb.finish_with_message(format!("{} rows emitted", stats.emitted));
        }
        Ok(stats)
    }
}
