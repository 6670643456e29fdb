// src/models/stats_models.rs
use serde::Serialize;

use crate::matching::normalizer::MalformedLine;

/// Why the gate refused to emit a parsed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Neither the employer nor the parent organization is in the alias map.
    Unresolved,
    /// A canonical name exists but no usable score was produced.
    NoScore,
    /// Names are similar enough that the row is not interesting.
    AboveThreshold { score: u8 },
    /// An exclusion rule rejected the row.
    Excluded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MalformedCounts {
    pub empty: usize,
    pub non_ascii: usize,
    pub tokenize: usize,
    pub column_count: usize,
}

impl MalformedCounts {
    pub fn total(&self) -> usize {
        self.empty + self.non_ascii + self.tokenize + self.column_count
    }

    pub fn record(&mut self, reason: &MalformedLine) {
        match reason {
            MalformedLine::Empty => self.empty += 1,
            MalformedLine::NonAscii { .. } => self.non_ascii += 1,
            MalformedLine::Tokenize(_) => self.tokenize += 1,
            MalformedLine::ColumnCount { .. } => self.column_count += 1,
        }
    }

    pub fn merge(&mut self, other: &MalformedCounts) {
        self.empty += other.empty;
        self.non_ascii += other.non_ascii;
        self.tokenize += other.tokenize;
        self.column_count += other.column_count;
    }
}

/// Counters for one run (or one batch, before merging).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub lines_read: usize,
    pub header_lines: usize,
    pub malformed: MalformedCounts,
    pub unresolved: usize,
    pub missing_score: usize,
    pub above_threshold: usize,
    pub excluded: usize,
    pub emitted: usize,
}

impl RunStats {
    pub fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Unresolved => self.unresolved += 1,
            DropReason::NoScore => self.missing_score += 1,
            DropReason::AboveThreshold { .. } => self.above_threshold += 1,
            DropReason::Excluded => self.excluded += 1,
        }
    }

    pub fn merge(&mut self, other: &RunStats) {
        self.lines_read += other.lines_read;
        self.header_lines += other.header_lines;
        self.malformed.merge(&other.malformed);
        self.unresolved += other.unresolved;
        self.missing_score += other.missing_score;
        self.above_threshold += other.above_threshold;
        self.excluded += other.excluded;
        self.emitted += other.emitted;
    }

    /// Lines that parsed but were not emitted.
    pub fn dropped(&self) -> usize {
        self.unresolved + self.missing_score + self.above_threshold + self.excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_every_counter() {
        let mut a = RunStats {
            lines_read: 3,
            emitted: 1,
            ..Default::default()
        };
        a.malformed.record(&MalformedLine::Empty);
        a.record_drop(DropReason::Unresolved);

        let mut b = RunStats {
            lines_read: 4,
            header_lines: 1,
            ..Default::default()
        };
        b.malformed.record(&MalformedLine::ColumnCount { expected: 42, found: 3 });
        b.record_drop(DropReason::AboveThreshold { score: 95 });
        b.record_drop(DropReason::Excluded);

        a.merge(&b);
        assert_eq!(a.lines_read, 7);
        assert_eq!(a.header_lines, 1);
        assert_eq!(a.malformed.total(), 2);
        assert_eq!(a.malformed.empty, 1);
        assert_eq!(a.malformed.column_count, 1);
        assert_eq!(a.dropped(), 3);
        assert_eq!(a.emitted, 1);
    }

    #[test]
    fn test_run_stats_serialize_with_nested_malformed_counts() {
        let mut stats = RunStats {
            lines_read: 2,
            emitted: 1,
            ..Default::default()
        };
        stats.malformed.record(&MalformedLine::Tokenize("line contains NUL byte".to_string()));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["emitted"], 1);
        assert_eq!(json["malformed"]["tokenize"], 1);
    }
}
