// src/models/record.rs
use std::fmt;

use crate::utils::constants::NAN_TOKEN;

/// Cleaned text pulled out of one data row, before alias resolution.
/// Every field is present (possibly empty) because the row parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub donor_name: String,
    /// Raw employer string, used as the alias-map key for the organization.
    pub employer: String,
    /// Raw parent-organization string, used as the alias-map key for the parent.
    pub parent_organization: String,
    pub recipient: String,
    pub party: String,
    pub date: String,
    pub amount: String,
    pub seat: String,
    pub result: String,
}

/// A row after alias resolution. `organization` and `parent_organization`
/// hold canonical names, or `None` when the alias map has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecord {
    pub donor_name: Option<String>,
    pub organization: Option<String>,
    pub parent_organization: Option<String>,
    pub recipient: Option<String>,
    pub party: Option<String>,
    pub seat: Option<String>,
    pub result: Option<String>,
    pub date: Option<String>,
    pub amount: Option<String>,
}

impl ParsedRecord {
    pub fn has_resolved_entity(&self) -> bool {
        self.organization.is_some() || self.parent_organization.is_some()
    }
}

/// One emitted line. Field order is fixed by the downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    pub donor_name: Option<String>,
    pub organization: Option<String>,
    pub parent_organization: Option<String>,
    pub recipient: Option<String>,
    pub party: Option<String>,
    pub seat: Option<String>,
    pub result: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub amount: Option<String>,
}

impl OutputRow {
    pub fn fields(&self) -> [Option<&str>; 10] {
        [
            self.donor_name.as_deref(),
            self.organization.as_deref(),
            self.parent_organization.as_deref(),
            self.recipient.as_deref(),
            self.party.as_deref(),
            self.seat.as_deref(),
            self.result.as_deref(),
            self.month.as_deref(),
            self.year.as_deref(),
            self.amount.as_deref(),
        ]
    }
}

impl fmt::Display for OutputRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<&str> = self
            .fields()
            .iter()
            .map(|field| field.unwrap_or(NAN_TOKEN))
            .collect();
        write!(f, "{}", rendered.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_render_as_nan() {
        let row = OutputRow {
            donor_name: Some("JOHN SMITH".to_string()),
            organization: Some("GLOBAL MEGACORP".to_string()),
            amount: Some("1000.00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            row.to_string(),
            "JOHN SMITH,GLOBAL MEGACORP,NaN,NaN,NaN,NaN,NaN,NaN,NaN,1000.00"
        );
    }

    #[test]
    fn test_empty_string_is_not_absent() {
        let row = OutputRow {
            party: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(row.to_string(), "NaN,NaN,NaN,NaN,,NaN,NaN,NaN,NaN,NaN");
    }

    #[test]
    fn test_has_resolved_entity() {
        let mut record = ParsedRecord::default();
        assert!(!record.has_resolved_entity());
        record.parent_organization = Some("ACME".to_string());
        assert!(record.has_resolved_entity());
    }
}
