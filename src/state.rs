use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::chart::{plot_galaxy_count, plot_galaxy_types};
use crate::color::TypePalette;
use crate::config::GalMorphConfig;
use crate::data::aggregate::{count_by_snapshot, count_by_type_for_snapshot};
use crate::data::loader::load_file;
use crate::data::model::{GalaxyDataset, GalaxyType};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Counts,
    Types,
}

/// The full viewer state, independent of rendering.
pub struct AppState {
    pub config: GalMorphConfig,
    pub palette: TypePalette,

    /// Loaded catalogue (None until user loads a file).
    pub dataset: Option<GalaxyDataset>,

    /// File the catalogue came from.
    pub source: Option<PathBuf>,

    /// Galaxy count per snapshot (cached).
    pub snapshot_counts: Vec<(i64, usize)>,

    /// Snapshot whose type counts are shown.
    pub selected_snapshot: Option<i64>,

    /// Type counts of `selected_snapshot` (cached).
    pub type_counts: BTreeMap<GalaxyType, usize>,

    pub view: ChartView,

    /// Last PNG written from the viewer, shown as a preview.
    pub last_export: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: GalMorphConfig, palette: TypePalette) -> Self {
        Self {
            config,
            palette,
            dataset: None,
            source: None,
            snapshot_counts: Vec::new(),
            selected_snapshot: None,
            type_counts: BTreeMap::new(),
            view: ChartView::Counts,
            last_export: None,
            status_message: None,
        }
    }

    /// Load a catalogue from disk, reporting failures in the status line.
    pub fn load(&mut self, path: &Path) {
        match load_file(path, &self.config.thresholds) {
            Ok(dataset) => self.set_dataset(dataset, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and select its default snapshot.
    pub fn set_dataset(&mut self, dataset: GalaxyDataset, source: PathBuf) {
        self.snapshot_counts = count_by_snapshot(&dataset);
        let snapshot = dataset.snapshot_or_latest(self.config.default_snapshot);

        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
        self.selected_snapshot = None;
        self.type_counts.clear();

        if let Some(snap) = snapshot {
            self.select_snapshot(snap);
        }
    }

    /// Switch the type chart to another snapshot.
    pub fn select_snapshot(&mut self, snapshot: i64) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match count_by_type_for_snapshot(ds, snapshot) {
            Ok(counts) => {
                self.type_counts = counts;
                self.selected_snapshot = Some(snapshot);
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// File name the export dialog proposes for the current view.
    pub fn default_export_name(&self) -> String {
        match (self.view, self.selected_snapshot) {
            (ChartView::Types, Some(snap)) => self.config.bar_chart_file(snap),
            _ => self.config.count_chart_file.clone(),
        }
    }

    /// Render the current view to `path`. Save failures end up in the
    /// status line; the chart itself is still rendered.
    pub fn export_current(&mut self, path: &Path) {
        let Some(ds) = &self.dataset else {
            self.status_message = Some("Nothing to export: no dataset loaded".into());
            return;
        };

        let result = match (self.view, self.selected_snapshot) {
            (ChartView::Types, Some(snap)) => plot_galaxy_types(ds, &self.config, snap, Some(path)),
            _ => plot_galaxy_count(ds, &self.config, Some(path)),
        };

        match result {
            Ok(chart) => match chart.save_error {
                None => {
                    self.last_export = Some(chart.path);
                    self.status_message = None;
                }
                Some(e) => self.status_message = Some(format!("Error: {e}")),
            },
            Err(e) => {
                log::error!("Failed to render chart: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
