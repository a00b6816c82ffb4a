/// Data layer: core types, loading, classification and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw rows, check required columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  P_Spheroid / P_Disk / P_Irr → GalaxyType
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ GalaxyDataset │  Vec<Record>, snapshot index
///   └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  counts per snapshot / per type
///   └───────────┘
/// ```

pub mod aggregate;
pub mod classify;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod test_support {
    use super::model::{
        CellValue, GalaxyDataset, RawRow, COL_P_DISK, COL_P_IRR, COL_P_SPHEROID, COL_SNAPSHOT,
        COL_SUBHALO_ID, REQUIRED_COLUMNS,
    };
    use crate::config::Thresholds;

    pub fn row(snapshot: i64, id: i64, p: (f64, f64, f64)) -> RawRow {
        let mut r = RawRow::new();
        r.insert(COL_SNAPSHOT.into(), CellValue::Integer(snapshot));
        r.insert(COL_SUBHALO_ID.into(), CellValue::Integer(id));
        r.insert(COL_P_SPHEROID.into(), CellValue::Float(p.0));
        r.insert(COL_P_DISK.into(), CellValue::Float(p.1));
        r.insert(COL_P_IRR.into(), CellValue::Float(p.2));
        r
    }

    /// Classified dataset from `(snapshot, scores)` pairs; ids are row numbers.
    pub fn dataset(rows: &[(i64, (f64, f64, f64))]) -> GalaxyDataset {
        let raw: Vec<RawRow> = rows
            .iter()
            .enumerate()
            .map(|(i, (snap, p))| row(*snap, i as i64, *p))
            .collect();
        let cols = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        GalaxyDataset::from_rows(cols, &raw, &Thresholds::default())
            .expect("fixture rows are valid")
    }
}
