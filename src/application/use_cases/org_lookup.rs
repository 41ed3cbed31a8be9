// ============================================================
// ORGANIZATION LOOKUP
// ============================================================
// Read-only index over the all-organizations export

use std::collections::HashMap;

use tracing::debug;

use crate::domain::records::{AllOrgRow, ApprovedRow};
use crate::shared::text_format::normalize_key;

/// Index of export rows by corporate number and by normalized name.
///
/// Built once per run and never mutated afterwards. On duplicate keys the
/// later row wins.
#[derive(Debug, Default)]
pub struct OrgLookup {
    rows: Vec<AllOrgRow>,
    by_number: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl OrgLookup {
    pub fn from_rows(rows: Vec<AllOrgRow>) -> Self {
        let mut by_number = HashMap::new();
        let mut by_name = HashMap::new();

        for (idx, row) in rows.iter().enumerate() {
            let number = row.corporate_number.trim();
            if !number.is_empty() && by_number.insert(number.to_string(), idx).is_some() {
                debug!(corporate_number = %number, "Duplicate corporate number in export");
            }

            let name = normalize_key(&row.corporation_name);
            if !name.is_empty() && by_name.insert(name, idx).is_some() {
                debug!(name = %row.corporation_name, "Duplicate corporation name in export");
            }
        }

        Self {
            rows,
            by_number,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn by_corporate_number(&self, corporate_number: &str) -> Option<&AllOrgRow> {
        let number = corporate_number.trim();
        if number.is_empty() {
            return None;
        }
        self.by_number.get(number).map(|&idx| &self.rows[idx])
    }

    pub fn by_name(&self, name: &str) -> Option<&AllOrgRow> {
        let key = normalize_key(name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).map(|&idx| &self.rows[idx])
    }

    /// Corporate number first, normalized name as the fallback
    pub fn find(&self, approved: &ApprovedRow) -> Option<&AllOrgRow> {
        self.by_corporate_number(&approved.corporate_number)
            .or_else(|| self.by_name(&approved.corporation_name))
    }
}
