//! Column schema for citation reports.
//!
//! The portal answers every citation query with a fixed-width `cell` array.
//! `PortalColumn` names each position; five of them carry no business
//! meaning and are stripped before anything is persisted.
//!
//! Report files written by older versions of the tool label the identifier
//! and query-type columns differently. `canonical_header` maps those legacy
//! labels onto the names the unified report uses.

/// Canonical header of the identifier column in a unified report.
pub const IDENTIFICATION: &str = "Identification";

/// Canonical header of the derived identifier-kind column.
pub const QUERY_TYPE: &str = "Query Type";

/// Header of the deduplication key column.
pub const VIOLATION_CODE: &str = "# Infracción";

/// Per-source first-column labels that mean "the identifier that was queried".
/// Only honored in the first column, compared lowercase.
pub const SOURCE_ID_LABELS: &[&str] = &["placas", "placa", "cedula", "cédula", "ruc"];

/// Legacy label → canonical header. Honored in any column, compared lowercase.
pub const HEADER_ALIASES: &[(&str, &str)] = &[
    ("identificación", IDENTIFICATION),
    ("identificacion", IDENTIFICATION),
    ("identification", IDENTIFICATION),
    ("tipo de consulta", QUERY_TYPE),
    ("query type", QUERY_TYPE),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortalColumn {
    CitationNumber,
    ViolationCode,
    Entity,
    CitationRef,
    Plate,
    DocumentType,
    IssueDate,
    NotificationDate,
    PaymentDeadline,
    Points,
    ColL,
    ColM,
    ColN,
    Sanction,
    Fine,
    Waiver,
    TotalDue,
    Article,
    ColT,
    ColU,
}

/// Portal cell order. `PORTAL_COLUMNS[i]` describes `cell[i]`.
pub const PORTAL_COLUMNS: [PortalColumn; 20] = [
    PortalColumn::CitationNumber,
    PortalColumn::ViolationCode,
    PortalColumn::Entity,
    PortalColumn::CitationRef,
    PortalColumn::Plate,
    PortalColumn::DocumentType,
    PortalColumn::IssueDate,
    PortalColumn::NotificationDate,
    PortalColumn::PaymentDeadline,
    PortalColumn::Points,
    PortalColumn::ColL,
    PortalColumn::ColM,
    PortalColumn::ColN,
    PortalColumn::Sanction,
    PortalColumn::Fine,
    PortalColumn::Waiver,
    PortalColumn::TotalDue,
    PortalColumn::Article,
    PortalColumn::ColT,
    PortalColumn::ColU,
];

impl PortalColumn {
    pub fn header(&self) -> &'static str {
        match self {
            Self::CitationNumber => "N. Citación",
            Self::ViolationCode => VIOLATION_CODE,
            Self::Entity => "Entidad",
            Self::CitationRef => "# Citación",
            Self::Plate => "Placa",
            Self::DocumentType => "Doc.",
            Self::IssueDate => "Fecha de emisión",
            Self::NotificationDate => "Fecha de notificación",
            Self::PaymentDeadline => "Limite de Pago",
            Self::Points => "Puntaje",
            Self::ColL => "Col_L",
            Self::ColM => "Col_M",
            Self::ColN => "Col_N",
            Self::Sanction => "Sanción",
            Self::Fine => "Multa",
            Self::Waiver => "Remisión",
            Self::TotalDue => "Total a pagar",
            Self::Article => "Artículo/Literal",
            Self::ColT => "Col_T",
            Self::ColU => "Col_U",
        }
    }

    /// Position of this column in the portal's `cell` array.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::ColL | Self::ColM | Self::ColN | Self::ColT | Self::ColU)
    }
}

/// True for headers of the form `Col_X` where `X` is one uppercase ASCII letter.
pub fn is_placeholder_header(header: &str) -> bool {
    match header.strip_prefix("Col_") {
        Some(rest) => {
            let mut chars = rest.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
        }
        None => false,
    }
}

/// Map a header read from a report file to its canonical name.
///
/// `first` is true for the first column, where per-source identifier labels
/// ("Placas", "Cedula", "RUC") are also recognized. Unknown headers come
/// back unchanged.
pub fn canonical_header(header: &str, first: bool) -> &str {
    let lower = header.trim().to_lowercase();

    if first && SOURCE_ID_LABELS.contains(&lower.as_str()) {
        return IDENTIFICATION;
    }

    match HEADER_ALIASES.iter().find(|(alias, _)| *alias == lower) {
        Some(&(_, canonical)) => canonical,
        None => header,
    }
}
