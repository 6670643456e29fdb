// src/utils/constants.rs

/// Positions of the fields we read from one contribution row (0-indexed).
/// The input is a wide fixed-column table; every index lives here so a schema
/// change is a single edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub id: usize,
    pub amount: usize,
    pub date: usize,
    pub contributor_name: usize,
    pub contributor_type: usize,
    pub contributor_employer: usize,
    pub organization: usize,
    pub parent_organization: usize,
    pub recipient_name: usize,
    pub candidate_party: usize,
    pub seat: usize,
    pub result: usize,
}

impl ColumnSchema {
    /// Number of columns a row needs before every index above is addressable.
    pub const fn required_columns(&self) -> usize {
        let indices = [
            self.id,
            self.amount,
            self.date,
            self.contributor_name,
            self.contributor_type,
            self.contributor_employer,
            self.organization,
            self.parent_organization,
            self.recipient_name,
            self.candidate_party,
            self.seat,
            self.result,
        ];
        let mut max = 0;
        let mut i = 0;
        while i < indices.len() {
            if indices[i] > max {
                max = indices[i];
            }
            i += 1;
        }
        max + 1
    }
}

pub const CONTRIBUTION_COLUMNS: ColumnSchema = ColumnSchema {
    id: 0,
    amount: 8,
    date: 9,
    contributor_name: 10,
    contributor_type: 12,
    contributor_employer: 14,
    organization: 21,
    parent_organization: 23,
    recipient_name: 25,
    candidate_party: 27,
    seat: 36,
    result: 41,
};

/// Value of the first column on the header row.
pub const HEADER_TOKEN: &str = "id";

/// Rendered in place of every absent output field.
pub const NAN_TOKEN: &str = "NaN";

/// Rows scoring at or above this are too similar to be interesting.
pub const SIMILARITY_THRESHOLD: u8 = 90;

pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// Tokens dropped from both names before they are compared.
pub const STOPWORDS: [&str; 46] = [
    "a", "in", "for", "and", "the", "as", "at", "by", "from", "into", "to", "of", "on", "off", "our", "that", "so", "own", "out", "communication", "communications", "inc", "incorporated", "company", "corporation", "co", "enterprise", "enterprises", "group", "industries", "corp", "llc", "llp", "international", "product", "products", "technologies", "technology", "holdings", "holding", "global", "financial", "service", "services", "resource", "resources",
];
