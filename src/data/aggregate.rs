use std::collections::BTreeMap;

use super::model::{GalaxyDataset, GalaxyType};
use crate::error::{GalMorphError, Result};

/// Galaxy count per snapshot, ascending by snapshot.
pub fn count_by_snapshot(dataset: &GalaxyDataset) -> Vec<(i64, usize)> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for rec in dataset.records() {
        *counts.entry(rec.snapshot).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Galaxy count per type within one snapshot, keyed in lexical label order.
/// Only types that actually occur in the snapshot appear.
pub fn count_by_type_for_snapshot(
    dataset: &GalaxyDataset,
    snapshot: i64,
) -> Result<BTreeMap<GalaxyType, usize>> {
    if !dataset.snapshots().contains(&snapshot) {
        return Err(GalMorphError::SnapshotNotFound {
            requested: snapshot,
            available: dataset.snapshots().iter().copied().collect(),
        });
    }

    let mut counts: BTreeMap<GalaxyType, usize> = BTreeMap::new();
    for rec in dataset.records().iter().filter(|r| r.snapshot == snapshot) {
        *counts.entry(rec.galaxy_type).or_default() += 1;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::dataset;

    #[test]
    fn counts_sorted_and_sum_to_total() {
        let ds = dataset(&[
            (40, (0.8, 0.1, 0.1)),
            (25, (0.1, 0.8, 0.1)),
            (33, (0.1, 0.1, 0.8)),
            (25, (0.3, 0.3, 0.3)),
            (40, (0.9, 0.0, 0.0)),
            (25, (0.1, 0.7, 0.2)),
        ]);
        let counts = count_by_snapshot(&ds);
        assert_eq!(counts, vec![(25, 3), (33, 1), (40, 2)]);
        assert!(counts.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), ds.len());
    }

    #[test]
    fn empty_dataset_has_no_counts() {
        let ds = dataset(&[]);
        assert!(count_by_snapshot(&ds).is_empty());
    }

    #[test]
    fn type_counts_for_one_snapshot() {
        let ds = dataset(&[
            (25, (0.8, 0.1, 0.1)),
            (25, (0.1, 0.8, 0.1)),
            (25, (0.1, 0.9, 0.1)),
            (25, (0.3, 0.3, 0.3)),
            (40, (0.1, 0.1, 0.9)),
        ]);
        let counts = count_by_type_for_snapshot(&ds, 25).unwrap();
        let got: Vec<(&str, usize)> = counts.iter().map(|(t, n)| (t.as_str(), *n)).collect();
        assert_eq!(got, vec![("elliptical", 1), ("spiral", 2), ("unknown", 1)]);
        assert!(!counts.contains_key(&GalaxyType::Irregular));
    }

    #[test]
    fn missing_snapshot_lists_available() {
        let ds = dataset(&[(33, (0.8, 0.1, 0.1)), (25, (0.8, 0.1, 0.1))]);
        match count_by_type_for_snapshot(&ds, 99) {
            Err(GalMorphError::SnapshotNotFound {
                requested,
                available,
            }) => {
                assert_eq!(requested, 99);
                assert_eq!(available, vec![25, 33]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
