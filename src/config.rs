use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::GalaxyType;
use crate::error::{GalMorphError, Result};

/// File picked up from the working directory when present.
pub const CONFIG_FILE_NAME: &str = "galmorph.json";

// ---------------------------------------------------------------------------
// Classification thresholds
// ---------------------------------------------------------------------------

/// Minimum winning score required for each category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub elliptical: f64,
    pub spiral: f64,
    pub irregular: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            elliptical: 0.7,
            spiral: 0.6,
            irregular: 0.5,
        }
    }
}

impl Thresholds {
    /// Threshold for a scored category. `Unknown` has none and always passes.
    pub fn for_type(&self, galaxy_type: GalaxyType) -> f64 {
        match galaxy_type {
            GalaxyType::Elliptical => self.elliptical,
            GalaxyType::Spiral => self.spiral,
            GalaxyType::Irregular => self.irregular,
            GalaxyType::Unknown => 0.0,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("elliptical", self.elliptical),
            ("spiral", self.spiral),
            ("irregular", self.irregular),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GalMorphError::Config(format!(
                    "threshold '{name}' must lie in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Everything tunable about classification and chart output.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides:
///
/// ```json
/// { "thresholds": { "spiral": 0.55 }, "palette": ["#1f77b4", "#ff7f0e"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalMorphConfig {
    pub thresholds: Thresholds,
    /// Bar colours as `#rrggbb`, cycled across galaxy types. Empty means
    /// "generate evenly spaced hues".
    pub palette: Vec<String>,
    /// The bar chart's y axis tops out at `max count * bar_headroom`.
    pub bar_headroom: f64,
    pub count_chart_size: (u32, u32),
    pub bar_chart_size: (u32, u32),
    pub count_chart_file: String,
    /// Snapshot charted by the headless run when none is given.
    pub default_snapshot: i64,
}

impl Default for GalMorphConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            // matplotlib's red, green, blue, purple
            palette: vec![
                "#ff0000".into(),
                "#008000".into(),
                "#0000ff".into(),
                "#800080".into(),
            ],
            bar_headroom: 2.0,
            count_chart_size: (780, 650),
            bar_chart_size: (1280, 960),
            count_chart_file: "galaxy_count.png".into(),
            default_snapshot: 25,
        }
    }
}

impl GalMorphConfig {
    /// Parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GalMorphError::Config(format!("reading {}: {e}", path.display()))
        })?;
        let config: GalMorphConfig = serde_json::from_str(&text).map_err(|e| {
            GalMorphError::Config(format!("parsing {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `galmorph.json` from `dir` if it exists, defaults otherwise.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::info!("Using configuration from {}", path.display());
            Self::load(&path)
        } else {
            log::debug!("No {CONFIG_FILE_NAME} in {}, using defaults", dir.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if !self.bar_headroom.is_finite() || self.bar_headroom < 1.0 {
            return Err(GalMorphError::Config(format!(
                "bar_headroom must be >= 1, got {}",
                self.bar_headroom
            )));
        }
        for (name, (w, h)) in [
            ("count_chart_size", self.count_chart_size),
            ("bar_chart_size", self.bar_chart_size),
        ] {
            if w == 0 || h == 0 {
                return Err(GalMorphError::Config(format!(
                    "{name} must be non-zero, got {w}x{h}"
                )));
            }
        }
        // Surface bad hex strings at load time rather than at first render.
        crate::color::parse_palette(&self.palette)?;
        Ok(())
    }

    /// Output name for the type-count chart of one snapshot.
    pub fn bar_chart_file(&self, snapshot: i64) -> String {
        format!("galaxy_types_snap_{snapshot}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_thresholds() {
        let cfg = GalMorphConfig::default();
        assert_eq!(cfg.thresholds.for_type(GalaxyType::Elliptical), 0.7);
        assert_eq!(cfg.thresholds.for_type(GalaxyType::Spiral), 0.6);
        assert_eq!(cfg.thresholds.for_type(GalaxyType::Irregular), 0.5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg: GalMorphConfig =
            serde_json::from_str(r#"{ "thresholds": { "spiral": 0.55 }, "bar_headroom": 3.0 }"#)
                .unwrap();
        assert_eq!(cfg.thresholds.spiral, 0.55);
        assert_eq!(cfg.thresholds.elliptical, 0.7);
        assert_eq!(cfg.bar_headroom, 3.0);
        assert_eq!(cfg.palette.len(), 4);
        assert_eq!(cfg.default_snapshot, 25);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut cfg = GalMorphConfig::default();
        cfg.thresholds.irregular = 1.5;
        assert!(matches!(cfg.validate(), Err(GalMorphError::Config(_))));
    }

    #[test]
    fn rejects_bad_palette_entry() {
        let mut cfg = GalMorphConfig::default();
        cfg.palette = vec!["#12345".into()];
        assert!(matches!(cfg.validate(), Err(GalMorphError::Config(_))));
    }

    #[test]
    fn load_or_default_reads_file_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            GalMorphConfig::load_or_default(dir.path()).unwrap(),
            GalMorphConfig::default()
        );

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "default_snapshot": 33, "palette": [] }"#,
        )
        .unwrap();
        let cfg = GalMorphConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(cfg.default_snapshot, 33);
        assert!(cfg.palette.is_empty());
    }

    #[test]
    fn bar_chart_file_includes_snapshot() {
        let cfg = GalMorphConfig::default();
        assert_eq!(cfg.bar_chart_file(25), "galaxy_types_snap_25.png");
    }
}
