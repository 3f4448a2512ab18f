use crate::schema::{PortalColumn, PORTAL_COLUMNS};

/// One citation as returned by the portal, tagged with the identifier
/// (plate, cédula, RUC) whose query produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationRecord {
    pub identifier: String,
    /// Portal cells in `PORTAL_COLUMNS` order. May be shorter or longer
    /// than the schema if the portal changes shape.
    pub cells: Vec<String>,
}

impl ViolationRecord {
    pub fn new(identifier: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            cells,
        }
    }

    /// Cell for `column`, or "" when the portal sent fewer cells.
    pub fn get(&self, column: PortalColumn) -> &str {
        self.cells.get(column.index()).map(String::as_str).unwrap_or("")
    }

    pub fn violation_code(&self) -> &str {
        self.get(PortalColumn::ViolationCode)
    }

    /// Cells beyond the known schema.
    pub fn extra_cells(&self) -> usize {
        self.cells.len().saturating_sub(PORTAL_COLUMNS.len())
    }
}
