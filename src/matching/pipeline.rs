// src/matching/pipeline.rs - One line in, zero or one output row out
use std::sync::Arc;

use crate::matching::canonicalizer::{resolve_record, AliasMap};
use crate::matching::gate::GatePolicy;
use crate::matching::normalizer::{normalize_line, MalformedLine, NormalizeOutcome};
use crate::matching::similarity::similarity_score;
use crate::models::record::ParsedRecord;
use crate::models::stats_models::{DropReason, RunStats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Emitted(String),
    Header,
    Malformed(MalformedLine),
    Dropped(DropReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Record(ParsedRecord),
    Header,
    Malformed(MalformedLine),
}

/// Rows produced by one batch, in input order, plus the batch's counters.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub rows: Vec<String>,
    pub stats: RunStats,
}

/// Score for the record's donor against its canonical parent, falling back
/// to the organization. `None` when either side is missing.
pub fn score_record(record: &ParsedRecord) -> Option<u8> {
    let donor = record.donor_name.as_deref()?;
    let target = record
        .parent_organization
        .as_deref()
        .or(record.organization.as_deref())?;
    Some(similarity_score(donor, target))
}

/// The per-record pipeline. Cheap to clone; all state is shared and read-only.
#[derive(Debug, Clone)]
pub struct LinePipeline {
    alias_map: Arc<AliasMap>,
    policy: Arc<GatePolicy>,
}

impl LinePipeline {
    pub fn new(alias_map: Arc<AliasMap>, policy: Arc<GatePolicy>) -> Self {
        Self { alias_map, policy }
    }

    pub fn parse_line(&self, line: &[u8]) -> ParseOutcome {
        match normalize_line(line) {
            NormalizeOutcome::Fields(fields) => {
                ParseOutcome::Record(resolve_record(fields, &self.alias_map))
            }
            NormalizeOutcome::Header => ParseOutcome::Header,
            NormalizeOutcome::Malformed(reason) => ParseOutcome::Malformed(reason),
        }
    }

    pub fn process_line(&self, line: &[u8]) -> LineOutcome {
        let record = match self.parse_line(line) {
            ParseOutcome::Record(record) => record,
            ParseOutcome::Header => return LineOutcome::Header,
            ParseOutcome::Malformed(reason) => return LineOutcome::Malformed(reason),
        };
        let score = score_record(&record);
        match self.policy.evaluate(&record, score) {
            Ok(row) => LineOutcome::Emitted(row.to_string()),
            Err(reason) => LineOutcome::Dropped(reason),
        }
    }

    /// Processes raw lines (trailing `\r` tolerated) and tallies the outcomes.
    pub fn process_batch(&self, lines: &[Vec<u8>]) -> BatchOutput {
        let mut output = BatchOutput::default();
        for line in lines {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            output.stats.lines_read += 1;
            match self.process_line(line) {
                LineOutcome::Emitted(row) => {
                    output.stats.emitted += 1;
                    output.rows.push(row);
                }
                LineOutcome::Header => output.stats.header_lines += 1,
                LineOutcome::Malformed(reason) => output.stats.malformed.record(&reason),
                LineOutcome::Dropped(reason) => output.stats.record_drop(reason),
            }
        }
        output
    }
}
