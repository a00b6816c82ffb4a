use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::Thresholds;
use crate::data::classify::{classify, Scores};
use crate::error::{GalMorphError, Result};

pub const COL_SNAPSHOT: &str = "Snapshot";
pub const COL_SUBHALO_ID: &str = "SubhaloID";
pub const COL_P_SPHEROID: &str = "P_Spheroid";
pub const COL_P_DISK: &str = "P_Disk";
pub const COL_P_IRR: &str = "P_Irr";

/// Columns every catalogue must carry, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_SNAPSHOT,
    COL_P_SPHEROID,
    COL_P_DISK,
    COL_P_IRR,
    COL_SUBHALO_ID,
];

/// One source row before it is turned into a [`Record`].
pub type RawRow = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null) || matches!(self, CellValue::Float(v) if v.is_nan())
    }

    /// Interpret the cell as an `f64` (integers widen).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the cell as an `i64`. Floats are accepted when integral,
    /// which is how Pandas stores integer columns that once held nulls.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// GalaxyType – the derived classification
// ---------------------------------------------------------------------------

/// Morphological class derived from the three probability scores.
///
/// Ordering is lexical on the label, which is the order type counts are
/// reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalaxyType {
    Elliptical,
    Spiral,
    Irregular,
    Unknown,
}

impl GalaxyType {
    pub const ALL: [GalaxyType; 4] = [
        GalaxyType::Elliptical,
        GalaxyType::Spiral,
        GalaxyType::Irregular,
        GalaxyType::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GalaxyType::Elliptical => "elliptical",
            GalaxyType::Spiral => "spiral",
            GalaxyType::Irregular => "irregular",
            GalaxyType::Unknown => "unknown",
        }
    }
}

impl PartialOrd for GalaxyType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GalaxyType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for GalaxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record – one galaxy
// ---------------------------------------------------------------------------

/// A single simulated galaxy (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub subhalo_id: i64,
    pub snapshot: i64,
    pub scores: Scores,
    /// Derived at load time from `scores`.
    pub galaxy_type: GalaxyType,
    /// Any non-required columns, kept as-is.
    pub extra: BTreeMap<String, CellValue>,
}

impl Record {
    /// Build a record from a raw row, classifying it on the way.
    /// `index` is the zero-based row number used in error messages.
    pub fn from_row(row: &RawRow, index: usize, thresholds: &Thresholds) -> Result<Self> {
        let scores = Scores::from_row(row, Some(index))?;
        let snapshot = required_i64(row, COL_SNAPSHOT, index)?;
        let subhalo_id = required_i64(row, COL_SUBHALO_ID, index)?;

        let extra = row
            .iter()
            .filter(|(col, _)| !REQUIRED_COLUMNS.contains(&col.as_str()))
            .map(|(col, val)| (col.clone(), val.clone()))
            .collect();

        Ok(Record {
            subhalo_id,
            snapshot,
            galaxy_type: classify(&scores, thresholds),
            scores,
            extra,
        })
    }
}

/// Fetch a required cell, mapping absence/null to `MissingField`.
pub(crate) fn required_cell<'a>(
    row: &'a RawRow,
    field: &str,
    index: Option<usize>,
) -> Result<&'a CellValue> {
    match row.get(field) {
        Some(cell) if !cell.is_null() => Ok(cell),
        _ => Err(GalMorphError::MissingField {
            field: field.to_string(),
            row: index,
        }),
    }
}

fn required_i64(row: &RawRow, field: &str, index: usize) -> Result<i64> {
    let cell = required_cell(row, field, Some(index))?;
    cell.as_i64().ok_or_else(|| GalMorphError::InvalidCell {
        field: field.to_string(),
        row: index,
        value: cell.to_string(),
    })
}

// ---------------------------------------------------------------------------
// GalaxyDataset – the complete loaded catalogue
// ---------------------------------------------------------------------------

/// The classified catalogue. Read-only once built.
#[derive(Debug, Clone)]
pub struct GalaxyDataset {
    records: Vec<Record>,
    /// Source column names, in file order.
    column_names: Vec<String>,
    snapshots: BTreeSet<i64>,
}

impl GalaxyDataset {
    /// Classify raw rows into a dataset. Columns must already have been
    /// checked with [`check_columns`].
    pub fn from_rows(
        column_names: Vec<String>,
        rows: &[RawRow],
        thresholds: &Thresholds,
    ) -> Result<Self> {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Record::from_row(row, i, thresholds))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_records(column_names, records))
    }

    pub fn from_records(column_names: Vec<String>, records: Vec<Record>) -> Self {
        let snapshots = records.iter().map(|r| r.snapshot).collect();
        GalaxyDataset {
            records,
            column_names,
            snapshots,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Sorted, de-duplicated snapshot values.
    pub fn snapshots(&self) -> &BTreeSet<i64> {
        &self.snapshots
    }

    /// `preferred` if the catalogue has it, otherwise the latest snapshot.
    pub fn snapshot_or_latest(&self, preferred: i64) -> Option<i64> {
        if self.snapshots.contains(&preferred) {
            return Some(preferred);
        }
        let latest = self.snapshots.last().copied();
        if let Some(latest) = latest {
            log::warn!("Snapshot {preferred} not in catalogue, falling back to {latest}");
        }
        latest
    }

    /// Number of galaxies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fail with `MissingColumn` for the first required column not in `columns`.
pub fn check_columns<S: AsRef<str>>(columns: &[S]) -> Result<()> {
    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c.as_ref() == required) {
            return Err(GalMorphError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::row;

    #[test]
    fn galaxy_types_sort_lexically() {
        let mut types = GalaxyType::ALL.to_vec();
        types.sort();
        let labels: Vec<_> = types.iter().map(|t| t.as_str()).collect();
        assert_eq!(labels, ["elliptical", "irregular", "spiral", "unknown"]);
    }

    #[test]
    fn record_is_classified_and_keeps_extra_columns() {
        let mut raw = row(25, 101, (0.8, 0.1, 0.1));
        raw.insert("Mass".into(), CellValue::Float(1.5e10));
        let rec = Record::from_row(&raw, 0, &Thresholds::default()).unwrap();
        assert_eq!(rec.snapshot, 25);
        assert_eq!(rec.subhalo_id, 101);
        assert_eq!(rec.galaxy_type, GalaxyType::Elliptical);
        assert_eq!(rec.extra.len(), 1);
        assert_eq!(rec.extra.get("Mass"), Some(&CellValue::Float(1.5e10)));
    }

    #[test]
    fn null_score_is_missing_field_with_row() {
        let mut raw = row(25, 1, (0.1, 0.2, 0.3));
        raw.insert(COL_P_DISK.into(), CellValue::Null);
        let err = Record::from_row(&raw, 4, &Thresholds::default()).unwrap_err();
        match err {
            GalMorphError::MissingField { field, row } => {
                assert_eq!(field, COL_P_DISK);
                assert_eq!(row, Some(4));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn integral_float_snapshot_is_accepted() {
        let mut raw = row(0, 1, (0.1, 0.2, 0.3));
        raw.insert(COL_SNAPSHOT.into(), CellValue::Float(33.0));
        let rec = Record::from_row(&raw, 0, &Thresholds::default()).unwrap();
        assert_eq!(rec.snapshot, 33);

        raw.insert(COL_SNAPSHOT.into(), CellValue::String("late".into()));
        assert!(matches!(
            Record::from_row(&raw, 0, &Thresholds::default()),
            Err(GalMorphError::InvalidCell { .. })
        ));
    }

    #[test]
    fn check_columns_names_first_missing() {
        let cols = ["SubhaloID", "Snapshot", "P_Spheroid", "P_Disk"];
        match check_columns(&cols) {
            Err(GalMorphError::MissingColumn(c)) => assert_eq!(c, "P_Irr"),
            other => panic!("unexpected result: {other:?}"),
        }
        let all = ["SubhaloID", "Snapshot", "P_Spheroid", "P_Disk", "P_Irr", "Mass"];
        assert!(check_columns(&all).is_ok());
    }

    #[test]
    fn dataset_collects_sorted_snapshots() {
        let rows = vec![
            row(40, 1, (0.8, 0.1, 0.1)),
            row(25, 2, (0.1, 0.8, 0.1)),
            row(40, 3, (0.3, 0.3, 0.3)),
        ];
        let cols = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let ds = GalaxyDataset::from_rows(cols, &rows, &Thresholds::default()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.snapshots().iter().copied().collect::<Vec<_>>(), [25, 40]);
        assert_eq!(ds.records()[1].galaxy_type, GalaxyType::Spiral);

        assert_eq!(ds.snapshot_or_latest(25), Some(25));
        assert_eq!(ds.snapshot_or_latest(99), Some(40));
    }
}
