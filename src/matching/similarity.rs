// src/matching/similarity.rs - Donor-vs-organization name similarity
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::utils::constants::STOPWORDS;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]").unwrap());

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Strips symbols, lower-cases, drops stopwords and glues the remaining
/// tokens together with no separator.
///
/// "Acme Widgets" and "ACMEWIDGETS, LLC" both condense to "acmewidgets".
pub fn condense_name(name: &str) -> String {
    let stripped = NON_ALPHANUMERIC.replace_all(name, "").to_lowercase();
    stripped
        .split_whitespace()
        .filter(|token| !STOPWORD_SET.contains(*token))
        .collect::<Vec<_>>()
        .concat()
}

/// Similarity in [0, 100] between two names after `condense_name`.
pub fn similarity_score(name_a: &str, name_b: &str) -> u8 {
    indel_ratio(&condense_name(name_a), &condense_name(name_b))
}

/// `100 * (1 - indel_distance / (len_a + len_b))`, rounded half away from zero.
/// Indel distance is Levenshtein with substitutions costing two, which makes
/// the ratio `2 * lcs / (len_a + len_b)`.
pub fn indel_ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    let lcs = longest_common_subsequence(&a, &b);
    let ratio = (2 * lcs) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Side-by-side view of one name pair, used when inspecting borderline rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NameComparison {
    pub condensed_a: String,
    pub condensed_b: String,
    pub score: u8,
    pub jaro_winkler: f64,
    pub normalized_levenshtein: f64,
}

pub fn compare_names(name_a: &str, name_b: &str) -> NameComparison {
    let condensed_a = condense_name(name_a);
    let condensed_b = condense_name(name_b);
    NameComparison {
        score: indel_ratio(&condensed_a, &condensed_b),
        jaro_winkler: jaro_winkler(&condensed_a, &condensed_b),
        normalized_levenshtein: normalized_levenshtein(&condensed_a, &condensed_b),
        condensed_a,
        condensed_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condense_drops_symbols_and_stopwords() {
        assert_eq!(condense_name("ACME WIDGETS, LLC"), "acmewidgets");
        assert_eq!(condense_name("The Bank of A.B.C. Holdings"), "bankabc");
        assert_eq!(condense_name("Global Technology Group"), "");
    }

    #[test]
    fn test_identical_after_condensing_scores_100() {
        assert_eq!(similarity_score("ACME WIDGETS LLC", "ACME WIDGETS"), 100);
        assert_eq!(similarity_score("INC", "LLC"), 100);
    }

    #[test]
    fn test_one_empty_operand_scores_zero() {
        assert_eq!(similarity_score("GLOBAL GROUP", "MEGACORP"), 0);
    }

    #[test]
    fn test_known_ratios() {
        // lcs("kitten", "sitting") = 4 -> 8 / 13
        assert_eq!(indel_ratio("kitten", "sitting"), 62);
        assert_eq!(indel_ratio("abcd", "abce"), 75);
        assert_eq!(indel_ratio("ab", "cd"), 0);
        // 10 / 16 = 62.5 rounds up, not to even
        assert_eq!(indel_ratio("abcdefgh", "abcdexyz"), 63);
        // "johnsmith" vs "megacorp": one shared character
        assert_eq!(similarity_score("JOHN SMITH", "GLOBAL MEGACORP"), 12);
    }

    #[test]
    fn test_score_is_symmetric_and_bounded() {
        let names = [
            "JOHN SMITH",
            "SMITH JOHN & SONS INC",
            "ACME WIDGETS",
            "",
            "A",
            "BAILEY JEROME H",
            "BAILEY FINANCIAL SERVICES",
        ];
        for a in names {
            for b in names {
                let ab = similarity_score(a, b);
                assert_eq!(ab, similarity_score(b, a), "{} / {}", a, b);
                assert!(ab <= 100);
            }
        }
    }

    #[test]
    fn test_compare_names_reports_condensed_forms() {
        let cmp = compare_names("Bailey Jerome H", "Bailey Financial Services");
        assert_eq!(cmp.condensed_a, "baileyjeromeh");
        assert_eq!(cmp.condensed_b, "bailey");
        assert_eq!(cmp.score, indel_ratio("baileyjeromeh", "bailey"));
        assert!(cmp.jaro_winkler > 0.0 && cmp.jaro_winkler <= 1.0);
        assert!(cmp.normalized_levenshtein > 0.0 && cmp.normalized_levenshtein < 1.0);
    }
}
