// src/matching/normalizer.rs - Field extraction and cleanup for one input row
use csv::{ReaderBuilder, StringRecord};
use log::trace;
use thiserror::Error;

use crate::models::record::NormalizedFields;
use crate::utils::constants::{ColumnSchema, CONTRIBUTION_COLUMNS, HEADER_TOKEN};

/// Why a line could not be turned into fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLine {
    #[error("line is empty")]
    Empty,
    #[error("non-ASCII byte at offset {offset}")]
    NonAscii { offset: usize },
    #[error("tokenizer rejected line: {0}")]
    Tokenize(String),
    #[error("expected at least {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    Fields(NormalizedFields),
    /// The column-header row. Never data.
    Header,
    Malformed(MalformedLine),
}

/// Normalizes one line using the standard contribution column layout.
pub fn normalize_line(line: &[u8]) -> NormalizeOutcome {
    normalize_line_with_schema(line, &CONTRIBUTION_COLUMNS)
}

pub fn normalize_line_with_schema(line: &[u8], schema: &ColumnSchema) -> NormalizeOutcome {
    match split_columns(line) {
        Ok(columns) => extract_fields(&columns, schema),
        Err(reason) => {
            trace!("Dropping malformed line: {}", reason);
            NormalizeOutcome::Malformed(reason)
        }
    }
}

/// Tokenizes a line and applies the per-column cleanup shared by every field.
fn split_columns(line: &[u8]) -> Result<Vec<String>, MalformedLine> {
    if let Some(offset) = line.iter().position(|b| !b.is_ascii()) {
        return Err(MalformedLine::NonAscii { offset });
    }
    if line.is_empty() {
        return Err(MalformedLine::Empty);
    }
    if line.contains(&b'\0') {
        return Err(MalformedLine::Tokenize("line contains NUL byte".to_string()));
    }
    // One input line is one record; the csv reader would otherwise end it at a stray CR.
    if line.iter().any(|b| matches!(b, b'\r' | b'\n')) {
        return Err(MalformedLine::Tokenize(
            "line terminator inside record".to_string(),
        ));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line);
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Ok(record.iter().map(clean_column).collect()),
        Ok(false) => Err(MalformedLine::Empty),
        Err(e) => Err(MalformedLine::Tokenize(e.to_string())),
    }
}

/// Drops quote characters and slashes, then upper-cases.
fn clean_column(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\\' | '/'))
        .collect::<String>()
        .to_ascii_uppercase()
}

fn extract_fields(columns: &[String], schema: &ColumnSchema) -> NormalizeOutcome {
    if columns
        .get(schema.id)
        .is_some_and(|first| first.eq_ignore_ascii_case(HEADER_TOKEN))
    {
        return NormalizeOutcome::Header;
    }

    let expected = schema.required_columns();
    if columns.len() < expected {
        return NormalizeOutcome::Malformed(MalformedLine::ColumnCount {
            expected,
            found: columns.len(),
        });
    }

    let field = |index: usize| columns[index].trim().to_string();

    NormalizeOutcome::Fields(NormalizedFields {
        donor_name: field(schema.contributor_name).replace(',', ""),
        employer: field(schema.contributor_employer),
        parent_organization: field(schema.parent_organization),
        recipient: clean_recipient(&columns[schema.recipient_name]),
        party: field(schema.candidate_party),
        date: field(schema.date),
        amount: field(schema.amount),
        seat: field(schema.seat),
        // Every 'T' is removed from the result column. Downstream data depends on it.
        result: columns[schema.result]
            .to_ascii_uppercase()
            .replace('T', "")
            .trim()
            .to_string(),
    })
}

fn clean_recipient(raw: &str) -> String {
    raw.trim()
        .replace("(D)", "")
        .replace("(R)", "")
        .replace(',', "")
        .trim()
        .to_string()
}
