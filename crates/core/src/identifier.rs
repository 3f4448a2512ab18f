use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of identifier a report row was queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryKind {
    Plate,
    NationalId,
    TaxId,
    Unknown,
}

impl QueryKind {
    pub const ALL: [QueryKind; 4] = [
        QueryKind::Plate,
        QueryKind::NationalId,
        QueryKind::TaxId,
        QueryKind::Unknown,
    ];

    /// Label written to the `Query Type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plate => "PLATE",
            Self::NationalId => "NATIONAL_ID",
            Self::TaxId => "TAX_ID",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw identifier by its shape.
///
/// Letters mixed with digits is a plate. All digits is a national id at
/// 10 characters and a tax id (RUC) at 13. Anything else is `Unknown`;
/// this never fails.
pub fn classify(identification: &str) -> QueryKind {
    let id = identification.trim();

    let has_alpha = id.chars().any(char::is_alphabetic);
    let has_digit = id.chars().any(|c| c.is_ascii_digit());
    if has_alpha && has_digit {
        return QueryKind::Plate;
    }

    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        return match id.len() {
            10 => QueryKind::NationalId,
            13 => QueryKind::TaxId,
            _ => QueryKind::Unknown,
        };
    }

    QueryKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn documented_examples() {
        assert_eq!(classify("ABC1234"), QueryKind::Plate);
        assert_eq!(classify("1234567890"), QueryKind::NationalId);
        assert_eq!(classify("1234567890123"), QueryKind::TaxId);
        assert_eq!(classify("12"), QueryKind::Unknown);
    }

    #[test]
    fn trims_before_classifying() {
        assert_eq!(classify("  0102030405 "), QueryKind::NationalId);
        assert_eq!(classify("\tPBA-1234\n"), QueryKind::Plate);
    }

    #[test]
    fn letters_only_or_empty_is_unknown() {
        assert_eq!(classify(""), QueryKind::Unknown);
        assert_eq!(classify("   "), QueryKind::Unknown);
        assert_eq!(classify("ABCDEF"), QueryKind::Unknown);
        assert_eq!(classify("12-34"), QueryKind::Unknown);
    }

    #[test]
    fn labels() {
        let labels: Vec<_> = QueryKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, ["PLATE", "NATIONAL_ID", "TAX_ID", "UNKNOWN"]);
    }

    proptest! {
        #[test]
        fn letter_and_digit_is_plate(
            letters in "[A-Z]{1,4}",
            digits in "[0-9]{1,4}",
            sep in prop::sample::select(vec!["", "-", " "]),
        ) {
            let id = format!("{letters}{sep}{digits}");
            prop_assert_eq!(classify(&id), QueryKind::Plate);
        }

        #[test]
        fn digit_strings_by_length(digits in "[0-9]{1,20}") {
            let expected = match digits.len() {
                10 => QueryKind::NationalId,
                13 => QueryKind::TaxId,
                _ => QueryKind::Unknown,
            };
            prop_assert_eq!(classify(&digits), expected);
        }

        #[test]
        fn never_panics(s in ".*") {
            let _ = classify(&s);
        }
    }
}
