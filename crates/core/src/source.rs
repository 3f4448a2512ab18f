use std::fmt;

use serde::{Deserialize, Serialize};

/// The four lookups the portal supports. Each has its own input sheet,
/// identifier label and report file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuerySource {
    /// License plate
    Plate,
    /// RUC (13 digits)
    TaxId,
    /// Cédula of an Ecuadorian citizen
    NationalId,
    /// Cédula of a foreign resident
    ForeignId,
}

impl QuerySource {
    pub const ALL: [QuerySource; 4] = [
        QuerySource::Plate,
        QuerySource::TaxId,
        QuerySource::NationalId,
        QuerySource::ForeignId,
    ];

    /// Sheet of the input workbook listing identifiers for this source.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Plate => "PLACA",
            Self::TaxId => "RUC",
            Self::NationalId => "CEDULA-IN",
            Self::ForeignId => "CEDULA-EX",
        }
    }

    /// Header of the identifier column inside `sheet_name()`.
    pub fn input_column(&self) -> &'static str {
        match self {
            Self::Plate => "PLACA",
            Self::TaxId => "RUC",
            Self::NationalId | Self::ForeignId => "CEDULA",
        }
    }

    /// First-column header of the report file.
    pub fn id_label(&self) -> &'static str {
        match self {
            Self::Plate => "Placas",
            Self::TaxId => "RUC",
            Self::NationalId | Self::ForeignId => "Cedula",
        }
    }

    /// `ps_tipo_identificacion` sent to the portal.
    pub fn id_type_code(&self) -> &'static str {
        match self {
            Self::Plate => "PLA",
            Self::TaxId => "RUC",
            Self::NationalId | Self::ForeignId => "CED",
        }
    }

    /// Zero-padded width of numeric identifiers (spreadsheets drop leading zeros).
    pub fn pad_width(&self) -> Option<usize> {
        match self {
            Self::Plate => None,
            Self::TaxId => Some(13),
            Self::NationalId | Self::ForeignId => Some(10),
        }
    }

    /// Cédula lookups need the portal's internal person id first.
    pub fn needs_person_lookup(&self) -> bool {
        matches!(self, Self::NationalId | Self::ForeignId)
    }

    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Plate => "PLA-CON-",
            Self::TaxId => "RUC-CON-",
            Self::NationalId => "in-ced-con-",
            Self::ForeignId => "ex-ced-con-",
        }
    }

    /// Trim and zero-pad an identifier as the portal expects it.
    pub fn normalize_identifier(&self, raw: &str) -> String {
        let id = raw.trim();
        match self.pad_width() {
            Some(width) if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) => {
                format!("{id:0>width$}")
            }
            _ => id.to_string(),
        }
    }

    /// Human noun used in "no results" messages.
    pub fn plural_noun(&self) -> &'static str {
        match self {
            Self::Plate => "plates",
            Self::TaxId => "RUCs",
            Self::NationalId => "national IDs",
            Self::ForeignId => "foreign-resident IDs",
        }
    }
}

impl fmt::Display for QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plate => write!(f, "plate"),
            Self::TaxId => write!(f, "tax-id"),
            Self::NationalId => write!(f, "national-id"),
            Self::ForeignId => write!(f, "foreign-id"),
        }
    }
}
