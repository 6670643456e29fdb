// src/matching/gate.rs - Emit/drop decision and output row formatting
use anyhow::{Context, Result};
use log::{info, trace};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::record::{OutputRow, ParsedRecord};
use crate::models::stats_models::DropReason;
use crate::utils::constants::SIMILARITY_THRESHOLD;

/// Drops every row for `donor_name` unless its amount is exactly `unless_amount`.
/// Narrow data-cleaning overrides live here instead of in the gate logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub donor_name: String,
    pub unless_amount: String,
}

impl ExclusionRule {
    pub fn excludes(&self, record: &ParsedRecord) -> bool {
        record.donor_name.as_deref() == Some(self.donor_name.as_str())
            && record.amount.as_deref() != Some(self.unless_amount.as_str())
    }
}

/// The rule shipped with the job when no exclusion file is configured.
pub fn default_exclusions() -> Vec<ExclusionRule> {
    vec![ExclusionRule {
        donor_name: "BAILEY JEROME H".to_string(),
        unless_amount: "25000.00000.00.00".to_string(),
    }]
}

/// Reads a JSON array of `{"donor_name": ..., "unless_amount": ...}` objects.
pub fn load_exclusions(path: &Path) -> Result<Vec<ExclusionRule>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read exclusion rules from {}", path.display()))?;
    let rules: Vec<ExclusionRule> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse exclusion rules {}", path.display()))?;
    info!("Loaded {} exclusion rules from {}", rules.len(), path.display());
    Ok(rules)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    exclusions: Vec<ExclusionRule>,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::new(default_exclusions())
    }
}

impl GatePolicy {
    pub fn new(exclusions: Vec<ExclusionRule>) -> Self {
        Self { exclusions }
    }

    pub fn exclusions(&self) -> &[ExclusionRule] {
        &self.exclusions
    }

    fn is_excluded(&self, record: &ParsedRecord) -> bool {
        self.exclusions.iter().any(|rule| rule.excludes(record))
    }

    /// Decides whether `record`, scored as `score`, becomes an output row.
    ///
    /// A score of zero counts as no score. The threshold is strict: a row
    /// scoring exactly `SIMILARITY_THRESHOLD` is dropped.
    pub fn evaluate(&self, record: &ParsedRecord, score: Option<u8>) -> Result<OutputRow, DropReason> {
        if !record.has_resolved_entity() {
            return Err(DropReason::Unresolved);
        }
        let score = match score {
            Some(s) if s > 0 => s,
            _ => return Err(DropReason::NoScore),
        };
        if score >= SIMILARITY_THRESHOLD {
            return Err(DropReason::AboveThreshold { score });
        }
        if self.is_excluded(record) {
            trace!("Exclusion rule matched donor {:?}", record.donor_name);
            return Err(DropReason::Excluded);
        }
        Ok(format_row(record))
    }
}

/// Splits `YYYY-MM-...` into `(month, year)`. An empty date gives neither.
fn split_date(date: Option<&str>) -> (Option<String>, Option<String>) {
    match date {
        None | Some("") => (None, None),
        Some(date) => {
            let mut parts = date.split('-');
            let year = parts.next().map(str::to_string);
            let month = parts.next().map(str::to_string);
            (month, year)
        }
    }
}

pub fn format_row(record: &ParsedRecord) -> OutputRow {
    let (month, year) = split_date(record.date.as_deref());
    OutputRow {
        donor_name: record.donor_name.clone(),
        organization: record.organization.clone(),
        parent_organization: record.parent_organization.clone(),
        recipient: record.recipient.clone(),
        party: record.party.clone(),
        seat: record.seat.clone(),
        result: record.result.clone(),
        month,
        year,
        amount: record.amount.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(donor: &str, organization: Option<&str>, amount: &str) -> ParsedRecord {
        ParsedRecord {
            donor_name: Some(donor.to_string()),
            organization: organization.map(str::to_string),
            parent_organization: None,
            recipient: Some("DOE JANE".to_string()),
            party: Some("DEMOCRATIC".to_string()),
            seat: Some("STATE:LOWER".to_string()),
            result: Some("WON".to_string()),
            date: Some("2016-03-15".to_string()),
            amount: Some(amount.to_string()),
        }
    }

    #[test]
    fn test_strict_threshold() {
        let policy = GatePolicy::default();
        let r = record("JOHN SMITH", Some("MEGACORP"), "10.00");
        assert_eq!(
            policy.evaluate(&r, Some(90)),
            Err(DropReason::AboveThreshold { score: 90 })
        );
        assert!(policy.evaluate(&r, Some(89)).is_ok());
    }

    #[test]
    fn test_unresolved_and_missing_score() {
        let policy = GatePolicy::default();
        let unresolved = record("JOHN SMITH", None, "10.00");
        assert_eq!(policy.evaluate(&unresolved, Some(10)), Err(DropReason::Unresolved));

        let resolved = record("JOHN SMITH", Some("MEGACORP"), "10.00");
        assert_eq!(policy.evaluate(&resolved, None), Err(DropReason::NoScore));
        assert_eq!(policy.evaluate(&resolved, Some(0)), Err(DropReason::NoScore));
    }

    #[test]
    fn test_default_exclusion_depends_on_amount() {
        let policy = GatePolicy::default();
        let ordinary = record("BAILEY JEROME H", Some("BAILEY FARMS"), "1000.00");
        assert_eq!(policy.evaluate(&ordinary, Some(50)), Err(DropReason::Excluded));

        let literal = record("BAILEY JEROME H", Some("BAILEY FARMS"), "25000.00000.00.00");
        assert!(policy.evaluate(&literal, Some(50)).is_ok());

        let someone_else = record("BAILEY JANE", Some("BAILEY FARMS"), "1000.00");
        assert!(policy.evaluate(&someone_else, Some(50)).is_ok());
    }

    #[test]
    fn test_empty_policy_excludes_nothing() {
        let policy = GatePolicy::new(Vec::new());
        let r = record("BAILEY JEROME H", Some("BAILEY FARMS"), "1000.00");
        assert!(policy.evaluate(&r, Some(50)).is_ok());
    }

    #[test]
    fn test_format_row_splits_date() {
        let row = format_row(&record("JOHN SMITH", Some("GLOBAL MEGACORP"), "1000.00"));
        assert_eq!(
            row.to_string(),
            "JOHN SMITH,GLOBAL MEGACORP,NaN,DOE JANE,DEMOCRATIC,STATE:LOWER,WON,03,2016,1000.00"
        );
    }

    #[test]
    fn test_split_date_edge_cases() {
        assert_eq!(split_date(Some("")), (None, None));
        assert_eq!(split_date(None), (None, None));
        assert_eq!(split_date(Some("2016")), (None, Some("2016".to_string())));
        assert_eq!(
            split_date(Some("2016-03")),
            (Some("03".to_string()), Some("2016".to_string()))
        );
    }

    #[test]
    fn test_load_exclusions_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"donor_name": "DOE JOHN", "unless_amount": "1.00"}}]"#
        )?;
        let rules = load_exclusions(file.path())?;
        assert_eq!(
            rules,
            vec![ExclusionRule {
                donor_name: "DOE JOHN".to_string(),
                unless_amount: "1.00".to_string(),
            }]
        );
        Ok(())
    }
}
