use std::collections::HashSet;

/// A rectangular all-text table: one header row plus data rows.
///
/// Every cell is a `String`. Nothing is ever parsed as a number, so values
/// like `0102030405` keep their leading zeros end to end. Rows are always
/// exactly `headers.len()` wide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[idx].as_str())
    }

    /// Append a row, padding with "" or truncating to the table width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        self.rows[row][col] = value.into();
    }

    pub fn rename_column(&mut self, idx: usize, name: impl Into<String>) {
        self.headers[idx] = name.into();
    }

    /// Insert a column at `pos`. `values` must hold one entry per row.
    pub fn insert_column(&mut self, pos: usize, name: impl Into<String>, values: Vec<String>) {
        assert_eq!(values.len(), self.rows.len(), "column length must match row count");
        self.headers.insert(pos, name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(pos, value);
        }
    }

    /// Keep only columns whose header satisfies `keep`. Returns the removed headers.
    pub fn retain_columns(&mut self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        let keep_mask: Vec<bool> = self.headers.iter().map(|h| keep(h.as_str())).collect();
        if keep_mask.iter().all(|k| *k) {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let headers = std::mem::take(&mut self.headers);
        for (header, keep) in headers.into_iter().zip(&keep_mask) {
            if *keep {
                self.headers.push(header);
            } else {
                removed.push(header);
            }
        }

        for row in &mut self.rows {
            let mut i = 0;
            row.retain(|_| {
                let k = keep_mask[i];
                i += 1;
                k
            });
        }

        removed
    }

    pub fn retain_rows(&mut self, keep: impl FnMut(&Vec<String>) -> bool) {
        self.rows.retain(keep);
    }

    /// Append `other` below this table, aligning columns by header name.
    ///
    /// The n-th column named `h` in `other` lands in the n-th column named
    /// `h` here, so repeated headers (blank ones included) never collapse
    /// into one column. Columns only `other` has are added on the right in
    /// `other`'s order; cells a side does not have are filled with "".
    pub fn append(&mut self, other: Table) {
        let mut targets = Vec::with_capacity(other.headers.len());
        for (i, header) in other.headers.iter().enumerate() {
            let occurrence = other.headers[..i].iter().filter(|h| *h == header).count();
            let found = self
                .headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == header)
                .nth(occurrence)
                .map(|(idx, _)| idx);

            let target = match found {
                Some(idx) => idx,
                None => {
                    self.headers.push(header.clone());
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.headers.len() - 1
                }
            };
            targets.push(target);
        }

        let width = self.headers.len();
        for row in other.rows {
            let mut aligned = vec![String::new(); width];
            for (value, &target) in row.into_iter().zip(&targets) {
                aligned[target] = value;
            }
            self.rows.push(aligned);
        }
    }

    /// Move the named columns (those present) to the front, in the given
    /// order. Other columns keep their relative order.
    pub fn move_to_front(&mut self, names: &[&str]) {
        let mut order: Vec<usize> = names.iter().filter_map(|n| self.column_index(n)).collect();
        for idx in 0..self.headers.len() {
            if !order.contains(&idx) {
                order.push(idx);
            }
        }
        if order.iter().enumerate().all(|(i, &idx)| i == idx) {
            return;
        }

        self.headers = order.iter().map(|&i| self.headers[i].clone()).collect();
        for row in &mut self.rows {
            *row = order.iter().map(|&i| std::mem::take(&mut row[i])).collect();
        }
    }

    /// Drop rows whose value in column `idx` (trimmed) was already seen,
    /// keeping the first occurrence. A blank value is a key like any other.
    /// Returns the number of rows removed.
    pub fn dedup_by_column(&mut self, idx: usize) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<String> = HashSet::new();
        self.rows.retain(|row| seen.insert(row[idx].trim().to_string()));
        before - self.rows.len()
    }
}
