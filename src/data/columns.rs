//! Column role mapping: which columns hold the lot, the timestamp, the curve to cut
//! and the extra curves drawn on secondary axes.

use crate::data::table::Table;
use crate::error::{CurveCutError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub lot: String,
    pub date: String,
    pub target: String,
    pub overlay: Vec<String>,
}

impl ColumnRoles {
    pub fn new(lot: &str, date: &str, target: &str) -> Self {
        Self {
            lot: lot.to_string(),
            date: date.to_string(),
            target: target.to_string(),
            overlay: Vec::new(),
        }
    }

    /// Initial picker values for a freshly loaded table: lot, date and target default to
    /// the first three columns (reusing the last one when the table is narrower).
    pub fn guess(table: &Table) -> Option<Self> {
        let cols = table.columns();
        let first = cols.first()?;
        let pick = |i: usize| cols.get(i).unwrap_or(&cols[cols.len() - 1]).as_str();
        Some(Self::new(first, pick(1), pick(2)))
    }

    /// Columns that may be drawn as overlays: everything except the three main roles.
    pub fn overlay_candidates<'a>(&self, table: &'a Table) -> Vec<&'a str> {
        table
            .columns()
            .iter()
            .map(String::as_str)
            .filter(|c| *c != self.lot && *c != self.date && *c != self.target)
            .collect()
    }

    /// Check that every role names an existing column and that lot, date and target are distinct.
    ///
    /// Overlay columns that collide with a main role are dropped rather than rejected,
    /// since the overlay picker only offers the remaining columns.
    pub fn validate(&mut self, table: &Table) -> Result<()> {
        for name in [&self.lot, &self.date, &self.target] {
            if !table.has_column(name) {
                return Err(CurveCutError::UnknownColumn(name.clone()));
            }
        }
        let roles = [
            ("lot", &self.lot),
            ("date", &self.date),
            ("target", &self.target),
        ];
        for (i, (first, a)) in roles.iter().enumerate() {
            for (second, b) in &roles[i + 1..] {
                if a == b {
                    return Err(CurveCutError::RoleCollision {
                        column: (*a).clone(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        if let Some(missing) = self.overlay.iter().find(|c| !table.has_column(c)) {
            return Err(CurveCutError::UnknownColumn(missing.clone()));
        }
        let (lot, date, target) = (&self.lot, &self.date, &self.target);
        self.overlay
            .retain(|c| c != lot && c != date && c != target);
        let mut seen = Vec::new();
        self.overlay.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(c.clone());
                true
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cols: &[&str]) -> Table {
        Table::new(cols.iter().map(|c| c.to_string()).collect(), Vec::new()).unwrap()
    }

    #[test]
    fn guess_uses_leading_columns() {
        let roles = ColumnRoles::guess(&table(&["lot", "date", "temp", "ph"])).unwrap();
        assert_eq!(roles, ColumnRoles::new("lot", "date", "temp"));
        let narrow = ColumnRoles::guess(&table(&["only"])).unwrap();
        assert_eq!(narrow.date, "only");
        assert!(ColumnRoles::guess(&table(&[])).is_none());
    }

    #[test]
    fn collisions_are_rejected() {
        let t = table(&["lot", "date", "temp"]);
        let mut roles = ColumnRoles::new("lot", "date", "date");
        let err = roles.validate(&t).unwrap_err();
        assert!(matches!(
            err,
            CurveCutError::RoleCollision { first: "date", second: "target", .. }
        ));
    }

    #[test]
    fn overlay_excludes_main_roles() {
        let t = table(&["lot", "date", "temp", "ph", "o2"]);
        let mut roles = ColumnRoles::new("lot", "date", "temp");
        assert_eq!(roles.overlay_candidates(&t), vec!["ph", "o2"]);
        roles.overlay = vec!["ph".into(), "temp".into(), "ph".into()];
        roles.validate(&t).unwrap();
        assert_eq!(roles.overlay, vec!["ph".to_string()]);
    }
}
