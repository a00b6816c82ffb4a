use crate::config::Thresholds;
use crate::data::model::{
    required_cell, GalaxyType, RawRow, COL_P_DISK, COL_P_IRR, COL_P_SPHEROID,
};
use crate::error::{GalMorphError, Result};

/// Order in which scored categories are visited when picking the maximum.
/// On equal scores the earliest entry wins.
pub const TIE_BREAK_ORDER: [GalaxyType; 3] = [
    GalaxyType::Elliptical,
    GalaxyType::Spiral,
    GalaxyType::Irregular,
];

/// The three morphology probabilities of one galaxy. They need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub spheroid: f64,
    pub disk: f64,
    pub irregular: f64,
}

impl Scores {
    pub fn new(spheroid: f64, disk: f64, irregular: f64) -> Self {
        Self {
            spheroid,
            disk,
            irregular,
        }
    }

    /// Score backing a scored category (`Unknown` has none).
    pub fn for_type(&self, galaxy_type: GalaxyType) -> Option<f64> {
        match galaxy_type {
            GalaxyType::Elliptical => Some(self.spheroid),
            GalaxyType::Spiral => Some(self.disk),
            GalaxyType::Irregular => Some(self.irregular),
            GalaxyType::Unknown => None,
        }
    }

    /// Pull `P_Spheroid`, `P_Disk` and `P_Irr` out of a raw row.
    pub fn from_row(row: &RawRow, index: Option<usize>) -> Result<Self> {
        let field = |name: &str| -> Result<f64> {
            let cell = required_cell(row, name, index)?;
            cell.as_f64().ok_or_else(|| GalMorphError::InvalidCell {
                field: name.to_string(),
                row: index.unwrap_or_default(),
                value: cell.to_string(),
            })
        };
        Ok(Scores {
            spheroid: field(COL_P_SPHEROID)?,
            disk: field(COL_P_DISK)?,
            irregular: field(COL_P_IRR)?,
        })
    }

    /// Highest-scoring category, resolving ties by [`TIE_BREAK_ORDER`].
    /// `NaN` scores never win; `None` if all three are `NaN`.
    pub fn dominant(&self) -> Option<(GalaxyType, f64)> {
        let mut best: Option<(GalaxyType, f64)> = None;
        for galaxy_type in TIE_BREAK_ORDER {
            let Some(score) = self.for_type(galaxy_type) else {
                continue;
            };
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((galaxy_type, score)),
            }
        }
        best
    }
}

/// Assign a galaxy type: the dominant category if its score reaches that
/// category's threshold, `Unknown` otherwise.
pub fn classify(scores: &Scores, thresholds: &Thresholds) -> GalaxyType {
    match scores.dominant() {
        Some((galaxy_type, score)) if score >= thresholds.for_type(galaxy_type) => galaxy_type,
        _ => GalaxyType::Unknown,
    }
}

/// Classify a raw row; a missing score column is reported by name.
pub fn classify_row(row: &RawRow, thresholds: &Thresholds) -> Result<GalaxyType> {
    let scores = Scores::from_row(row, None)?;
    Ok(classify(&scores, thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn classify_default(s: f64, d: f64, i: f64) -> GalaxyType {
        classify(&Scores::new(s, d, i), &Thresholds::default())
    }

    #[test]
    fn reference_cases() {
        assert_eq!(classify_default(0.8, 0.1, 0.1), GalaxyType::Elliptical);
        assert_eq!(classify_default(0.65, 0.68, 0.1), GalaxyType::Spiral);
        assert_eq!(classify_default(0.3, 0.3, 0.3), GalaxyType::Unknown);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(classify_default(0.7, 0.1, 0.1), GalaxyType::Elliptical);
        assert_eq!(classify_default(0.1, 0.6, 0.1), GalaxyType::Spiral);
        assert_eq!(classify_default(0.1, 0.1, 0.5), GalaxyType::Irregular);
        assert_eq!(classify_default(0.1, 0.1, 0.49), GalaxyType::Unknown);
    }

    #[test]
    fn dominant_below_own_threshold_is_unknown() {
        // Spheroid wins but misses 0.7 even though it would pass spiral's 0.6.
        assert_eq!(classify_default(0.65, 0.2, 0.1), GalaxyType::Unknown);
    }

    #[test]
    fn ties_follow_enumeration_order() {
        assert_eq!(classify_default(0.9, 0.9, 0.9), GalaxyType::Elliptical);
        assert_eq!(classify_default(0.1, 0.8, 0.8), GalaxyType::Spiral);
        // Tie picks elliptical, which then misses its threshold.
        assert_eq!(classify_default(0.65, 0.65, 0.1), GalaxyType::Unknown);
    }

    #[test]
    fn all_below_thresholds_is_always_unknown() {
        let steps = [0.0, 0.1, 0.25, 0.4, 0.49];
        for &s in &steps {
            for &d in &steps {
                for &i in &steps {
                    assert_eq!(classify_default(s, d, i), GalaxyType::Unknown);
                }
            }
        }
    }

    #[test]
    fn result_is_always_one_of_four_labels() {
        let grid: Vec<f64> = (0..=10).map(|k| k as f64 / 10.0).collect();
        for &s in &grid {
            for &d in &grid {
                for &i in &grid {
                    let label = classify_default(s, d, i);
                    assert!(GalaxyType::ALL.contains(&label));
                }
            }
        }
    }

    #[test]
    fn nan_scores_never_win() {
        assert_eq!(classify_default(f64::NAN, 0.9, 0.1), GalaxyType::Spiral);
        assert_eq!(
            classify_default(f64::NAN, f64::NAN, f64::NAN),
            GalaxyType::Unknown
        );
    }

    #[test]
    fn custom_thresholds_apply() {
        let t = Thresholds {
            elliptical: 0.5,
            spiral: 0.9,
            irregular: 0.5,
        };
        assert_eq!(classify(&Scores::new(0.6, 0.1, 0.1), &t), GalaxyType::Elliptical);
        assert_eq!(classify(&Scores::new(0.1, 0.8, 0.1), &t), GalaxyType::Unknown);
    }

    #[test]
    fn classify_row_names_missing_field() {
        let mut row = RawRow::new();
        row.insert(COL_P_SPHEROID.into(), CellValue::Float(0.8));
        row.insert(COL_P_IRR.into(), CellValue::Float(0.1));
        match classify_row(&row, &Thresholds::default()) {
            Err(GalMorphError::MissingField { field, row }) => {
                assert_eq!(field, "P_Disk");
                assert_eq!(row, None);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        row.insert(COL_P_DISK.into(), CellValue::Integer(0));
        assert_eq!(
            classify_row(&row, &Thresholds::default()).unwrap(),
            GalaxyType::Elliptical
        );
    }
}
