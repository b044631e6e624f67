//! CSV bulk import for the item master.
//!
//! The caller confirms a mapping from item fields to CSV headers, then every
//! row is validated against the item schema. Valid rows become item drafts
//! (batch-written by the caller); invalid rows are skipped and reported with
//! their line number, never retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clinistock_core::{Money, Quantity};

use crate::item::ItemDraft;

/// User-confirmed mapping from item fields to CSV column headers.
///
/// `generic_name`, `category` and `unit` are mandatory columns; the rest are
/// optional and fall back to empty/zero defaults when unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub generic_name: String,
    pub category: String,
    pub unit: String,
    pub brand_name: Option<String>,
    pub strength: Option<String>,
    pub pack_size: Option<String>,
    pub reorder_level_dispensary: Option<String>,
    pub reorder_level_bulk: Option<String>,
    pub unit_cost: Option<String>,
    pub selling_price: Option<String>,
}

/// A skipped row and why it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub reason: String,
}

/// Outcome of an import pass: drafts ready for batch write + skipped rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub drafts: Vec<ItemDraft>,
    pub skipped: Vec<RowError>,
}

/// Import failed before any row could be processed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("mapped column not present in file: {0}")]
    MissingColumn(String),
}

/// Parse and validate an item-master CSV against a column mapping.
///
/// Row-level failures (missing required cell, unparsable number) do not fail
/// the import; they land in `ImportReport::skipped`.
pub fn parse_items_csv(data: &[u8], mapping: &ColumnMapping) -> Result<ImportReport, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndices::resolve(&headers, mapping)?;

    let mut drafts = Vec::new();
    let mut skipped = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        // Header occupies line 1.
        let line = idx + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                skipped.push(RowError {
                    line,
                    reason: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        match columns.row_to_draft(&record) {
            Ok(draft) => drafts.push(draft),
            Err(reason) => skipped.push(RowError { line, reason }),
        }
    }

    Ok(ImportReport { drafts, skipped })
}

/// Header positions resolved once per file.
struct ColumnIndices {
    generic_name: usize,
    category: usize,
    unit: usize,
    brand_name: Option<usize>,
    strength: Option<usize>,
    pack_size: Option<usize>,
    reorder_level_dispensary: Option<usize>,
    reorder_level_bulk: Option<usize>,
    unit_cost: Option<usize>,
    selling_price: Option<usize>,
}

impl ColumnIndices {
    fn resolve(
        headers: &csv::StringRecord,
        mapping: &ColumnMapping,
    ) -> Result<Self, ImportError> {
        let find = |name: &str| -> Result<usize, ImportError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
        };
        let find_opt = |name: &Option<String>| -> Result<Option<usize>, ImportError> {
            match name {
                Some(n) => find(n).map(Some),
                None => Ok(None),
            }
        };

        Ok(Self {
            generic_name: find(&mapping.generic_name)?,
            category: find(&mapping.category)?,
            unit: find(&mapping.unit)?,
            brand_name: find_opt(&mapping.brand_name)?,
            strength: find_opt(&mapping.strength)?,
            pack_size: find_opt(&mapping.pack_size)?,
            reorder_level_dispensary: find_opt(&mapping.reorder_level_dispensary)?,
            reorder_level_bulk: find_opt(&mapping.reorder_level_bulk)?,
            unit_cost: find_opt(&mapping.unit_cost)?,
            selling_price: find_opt(&mapping.selling_price)?,
        })
    }

    fn row_to_draft(&self, record: &csv::StringRecord) -> Result<ItemDraft, String> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();
        let opt_cell = |idx: Option<usize>| -> Option<String> {
            idx.map(cell).filter(|s| !s.is_empty())
        };

        let generic_name = cell(self.generic_name);
        if generic_name.is_empty() {
            return Err("generic name is empty".to_string());
        }
        let category = cell(self.category);
        let unit = cell(self.unit);
        if unit.is_empty() {
            return Err("unit of measure is empty".to_string());
        }

        let draft = ItemDraft {
            generic_name,
            brand_name: opt_cell(self.brand_name),
            strength: opt_cell(self.strength),
            pack_size: opt_cell(self.pack_size),
            category,
            unit,
            reorder_level_dispensary: parse_quantity(
                opt_cell(self.reorder_level_dispensary),
                "reorder_level_dispensary",
            )?,
            reorder_level_bulk: parse_quantity(
                opt_cell(self.reorder_level_bulk),
                "reorder_level_bulk",
            )?,
            unit_cost: parse_money(opt_cell(self.unit_cost), "unit_cost")?,
            selling_price: parse_money(opt_cell(self.selling_price), "selling_price")?,
        };

        if draft.reorder_level_dispensary < 0 || draft.reorder_level_bulk < 0 {
            return Err("reorder levels cannot be negative".to_string());
        }

        Ok(draft)
    }
}

fn parse_quantity(cell: Option<String>, field: &str) -> Result<Quantity, String> {
    match cell {
        None => Ok(0),
        Some(s) => s
            .parse::<Quantity>()
            .map_err(|_| format!("{field}: not a whole number: {s:?}")),
    }
}

fn parse_money(cell: Option<String>, field: &str) -> Result<Money, String> {
    match cell {
        None => Ok(0),
        Some(s) => s
            .parse::<Money>()
            .map_err(|_| format!("{field}: not a non-negative amount in cents: {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            generic_name: "name".to_string(),
            category: "category".to_string(),
            unit: "unit".to_string(),
            brand_name: Some("brand".to_string()),
            strength: None,
            pack_size: None,
            reorder_level_dispensary: Some("reorder_disp".to_string()),
            reorder_level_bulk: Some("reorder_bulk".to_string()),
            unit_cost: Some("cost".to_string()),
            selling_price: Some("price".to_string()),
        }
    }

    #[test]
    fn valid_rows_become_drafts_and_bad_rows_are_reported() {
        let csv = b"name,category,unit,brand,reorder_disp,reorder_bulk,cost,price\n\
            Paracetamol,analgesic,tablet,Panadol,100,500,5,10\n\
            ,analgesic,tablet,,100,500,5,10\n\
            Ibuprofen,analgesic,tablet,,abc,500,5,10\n\
            Amoxicillin,antibiotic,capsule,,50,200,20,35\n";

        let report = parse_items_csv(csv, &mapping()).unwrap();

        assert_eq!(report.drafts.len(), 2);
        assert_eq!(report.drafts[0].generic_name, "Paracetamol");
        assert_eq!(report.drafts[0].brand_name.as_deref(), Some("Panadol"));
        assert_eq!(report.drafts[1].generic_name, "Amoxicillin");

        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].line, 3);
        assert!(report.skipped[0].reason.contains("generic name"));
        assert_eq!(report.skipped[1].line, 4);
        assert!(report.skipped[1].reason.contains("reorder_level_dispensary"));
    }

    #[test]
    fn missing_mapped_column_fails_the_whole_import() {
        let csv = b"name,unit\nParacetamol,tablet\n";
        let err = parse_items_csv(csv, &mapping()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(c) if c == "category"));
    }

    #[test]
    fn unmapped_optional_columns_fall_back_to_defaults() {
        let csv = b"name,category,unit\nParacetamol,analgesic,tablet\n";
        let m = ColumnMapping {
            brand_name: None,
            reorder_level_dispensary: None,
            reorder_level_bulk: None,
            unit_cost: None,
            selling_price: None,
            ..mapping()
        };
        let report = parse_items_csv(csv, &m).unwrap();
        assert_eq!(report.drafts.len(), 1);
        assert_eq!(report.drafts[0].reorder_level_bulk, 0);
        assert_eq!(report.drafts[0].unit_cost, 0);
    }
}
