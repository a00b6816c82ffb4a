use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use eframe::egui;

use galmorph::app::GalMorphApp;
use galmorph::chart::{plot_galaxy_count, plot_galaxy_types};
use galmorph::color::TypePalette;
use galmorph::config::GalMorphConfig;
use galmorph::data::aggregate::{count_by_snapshot, count_by_type_for_snapshot};
use galmorph::data::loader::load_file;
use galmorph::state::AppState;

const USAGE: &str = "usage: galmorph [<data-file> [snapshot]] | galmorph view [<data-file>]";

fn main() -> Result<()> {
    env_logger::init();

    let config = GalMorphConfig::load_or_default(Path::new("."))
        .context("loading configuration")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => run_viewer(config, None),
        [cmd] if cmd == "view" => run_viewer(config, None),
        [cmd, file] if cmd == "view" => run_viewer(config, Some(PathBuf::from(file))),
        [file] => run_headless(&config, Path::new(file), None),
        [file, snapshot] => {
            let snapshot: i64 = snapshot
                .parse()
                .with_context(|| format!("snapshot must be an integer, got '{snapshot}'"))?;
            run_headless(&config, Path::new(file), Some(snapshot))
        }
        _ => bail!(USAGE),
    }
}

/// Load, classify, print a summary and write both charts.
///
/// An explicitly requested snapshot must exist; the configured default
/// falls back to the latest snapshot in the file.
fn run_headless(config: &GalMorphConfig, path: &Path, snapshot: Option<i64>) -> Result<()> {
    let dataset = load_file(path, &config.thresholds)
        .with_context(|| format!("loading {}", path.display()))?;

    println!("{} galaxies in {}", dataset.len(), path.display());
    for (snap, n) in count_by_snapshot(&dataset) {
        println!("  snapshot {snap:>4}: {n}");
    }

    let snapshot = match snapshot {
        Some(s) => s,
        None => dataset
            .snapshot_or_latest(config.default_snapshot)
            .context("catalogue has no snapshots")?,
    };

    let type_counts = count_by_type_for_snapshot(&dataset, snapshot)?;
    println!("Galaxy types in snapshot {snapshot}:");
    for (galaxy_type, n) in &type_counts {
        println!("  {galaxy_type:<10} {n}");
    }

    let charts = [
        plot_galaxy_count(&dataset, config, None)?,
        plot_galaxy_types(&dataset, config, snapshot, None)?,
    ];
    for chart in &charts {
        match &chart.save_error {
            None => println!("Wrote {}", chart.path.display()),
            Some(e) => eprintln!("Chart rendered but not saved: {e}"),
        }
    }
    Ok(())
}

/// Open the interactive viewer, optionally with a catalogue preloaded.
fn run_viewer(config: GalMorphConfig, file: Option<PathBuf>) -> Result<()> {
    let palette = TypePalette::from_config(&config)?;
    let mut state = AppState::new(config, palette);
    if let Some(path) = &file {
        state.load(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GalMorph – Galaxy Morphology Viewer",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can preview exported PNGs.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(GalMorphApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
