// src/matching/canonicalizer.rs - Alias resolution for employer and parent names
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::models::record::{NormalizedFields, ParsedRecord};

/// Read-only lookup from a raw organization string to its canonical name.
/// Built once before any line is processed and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: HashMap<String, String>,
}

impl AliasMap {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a JSON object of `{"raw name": "canonical name"}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).context("Alias map is not a JSON object of strings")?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read alias map from {}", path.display()))?;
        let map = Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse alias map {}", path.display()))?;
        info!(
            "Loaded alias map with {} entries from {}",
            map.len(),
            path.display()
        );
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical name for `raw` with commas removed, or `None` when unknown.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        self.entries.get(raw).map(|canonical| canonical.replace(',', ""))
    }
}

/// Swaps the raw employer and parent strings for their canonical names.
pub fn resolve_record(fields: NormalizedFields, alias_map: &AliasMap) -> ParsedRecord {
    let organization = alias_map.canonicalize(&fields.employer);
    let parent_organization = alias_map.canonicalize(&fields.parent_organization);
    if organization.is_none() && parent_organization.is_none() {
        debug!(
            "No alias entry for employer '{}' or parent '{}'",
            fields.employer, fields.parent_organization
        );
    }

    ParsedRecord {
        donor_name: Some(fields.donor_name),
        organization,
        parent_organization,
        recipient: Some(fields.recipient),
        party: Some(fields.party),
        seat: Some(fields.seat),
        result: Some(fields.result),
        date: Some(fields.date),
        amount: Some(fields.amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_canonicalize_strips_commas() {
        let map = AliasMap::from_entries([("ACME WIDGETS INC", "ACME WIDGETS, INC.")]);
        assert_eq!(
            map.canonicalize("ACME WIDGETS INC"),
            Some("ACME WIDGETS INC.".to_string())
        );
    }

    #[test]
    fn test_unknown_name_is_unresolved() {
        let map = AliasMap::from_entries([("ACME", "ACME CORP")]);
        assert_eq!(map.canonicalize("ACME CORPORATION"), None);
        assert_eq!(map.canonicalize("acme"), None);
    }

    #[test]
    fn test_resolve_record_keeps_auxiliary_fields() {
        let map = AliasMap::from_entries([("MEGACORP", "GLOBAL MEGACORP")]);
        let fields = NormalizedFields {
            donor_name: "JOHN SMITH".to_string(),
            employer: "MEGACORP".to_string(),
            parent_organization: "UNKNOWN PARENT".to_string(),
            amount: "1000.00".to_string(),
            ..Default::default()
        };
        let record = resolve_record(fields, &map);
        assert_eq!(record.organization.as_deref(), Some("GLOBAL MEGACORP"));
        assert_eq!(record.parent_organization, None);
        assert_eq!(record.donor_name.as_deref(), Some("JOHN SMITH"));
        assert_eq!(record.amount.as_deref(), Some("1000.00"));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"MEGACORP": "GLOBAL MEGACORP", "ACME": "ACME WIDGETS"}}"#)?;
        let map = AliasMap::load(file.path())?;
        assert_eq!(map.len(), 2);
        assert_eq!(map.canonicalize("ACME"), Some("ACME WIDGETS".to_string()));
        Ok(())
    }

    #[test]
    fn test_non_string_values_rejected() {
        assert!(AliasMap::from_json_str(r#"{"ACME": 3}"#).is_err());
        assert!(AliasMap::from_json_str("[]").is_err());
    }
}
