use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::TypePalette;
use crate::config::GalMorphConfig;
use crate::data::aggregate::{count_by_snapshot, count_by_type_for_snapshot};
use crate::data::model::{GalaxyDataset, GalaxyType};
use crate::error::{GalMorphError, Result};

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// RenderedChart – an in-memory chart plus where it was (or wasn't) saved
// ---------------------------------------------------------------------------

/// A rendered chart. The image is always present; `save_error` records a
/// failed write.
#[derive(Debug)]
pub struct RenderedChart {
    pub image: RgbImage,
    pub path: PathBuf,
    pub save_error: Option<GalMorphError>,
}

impl RenderedChart {
    pub fn saved(&self) -> bool {
        self.save_error.is_none()
    }
}

// ---------------------------------------------------------------------------
// Dataset → PNG
// ---------------------------------------------------------------------------

/// Galaxy count vs. snapshot. Saved to `file_name`, or to the configured
/// count chart name in the working directory.
pub fn plot_galaxy_count(
    dataset: &GalaxyDataset,
    config: &GalMorphConfig,
    file_name: Option<&Path>,
) -> Result<RenderedChart> {
    let counts = count_by_snapshot(dataset);
    let image = render_count_chart(&counts, config.count_chart_size)?;
    let path = file_name
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.count_chart_file));
    Ok(finish(image, path))
}

/// Log-scale bar chart of type counts for one snapshot. Saved to
/// `file_name`, or to `galaxy_types_snap_<N>.png`.
pub fn plot_galaxy_types(
    dataset: &GalaxyDataset,
    config: &GalMorphConfig,
    snapshot: i64,
    file_name: Option<&Path>,
) -> Result<RenderedChart> {
    let counts = count_by_type_for_snapshot(dataset, snapshot)?;
    let palette = TypePalette::from_config(config)?;
    let image = render_type_chart(
        snapshot,
        &counts,
        &palette,
        config.bar_headroom,
        config.bar_chart_size,
    )?;
    let path = file_name
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(config.bar_chart_file(snapshot)));
    Ok(finish(image, path))
}

/// Save `image` to `path`, logging instead of failing on I/O errors.
pub fn finish(image: RgbImage, path: PathBuf) -> RenderedChart {
    let save_error = match save_png(&image, &path) {
        Ok(()) => {
            log::info!("Saved chart to {}", path.display());
            None
        }
        Err(e) => {
            log::error!("{e}");
            Some(e)
        }
    };
    RenderedChart {
        image,
        path,
        save_error,
    }
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| GalMorphError::Save {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Y range of the type chart: floor 1, top `max * headroom` but at least
/// one decade.
pub fn bar_y_range(max_count: usize, headroom: f64) -> (f64, f64) {
    let top = (max_count as f64 * headroom).max(10.0);
    (1.0, top)
}

/// X range of the count chart, padded so the end markers are not clipped.
pub fn count_x_range(counts: &[(i64, usize)]) -> (f64, f64) {
    let (Some(first), Some(last)) = (counts.first(), counts.last()) else {
        return (0.0, 1.0);
    };
    let (lo, hi) = (first.0 as f64, last.0 as f64);
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad, hi + pad)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw into a white RGB buffer of `size` pixels.
fn draw_into<F>(size: (u32, u32), draw: F) -> Result<RgbImage>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> DrawResult,
{
    let (w, h) = size;
    let mut buf = vec![255u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
        draw(&root).map_err(|e| GalMorphError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| GalMorphError::Render(e.to_string()))?;
    }
    RgbImage::from_raw(w, h, buf)
        .ok_or_else(|| GalMorphError::Render("pixel buffer size mismatch".into()))
}

/// Line through the counts with a red marker on each snapshot.
pub fn render_count_chart(counts: &[(i64, usize)], size: (u32, u32)) -> Result<RgbImage> {
    let (x0, x1) = count_x_range(counts);
    let y_max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0) as f64;
    let y_top = (y_max * 1.1).max(1.0);
    let points: Vec<(f64, f64)> = counts
        .iter()
        .map(|(snap, n)| (*snap as f64, *n as f64))
        .collect();

    draw_into(size, |root| {
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(root)
            .caption("Galaxy Count per Snapshot", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d(x0..x1, 0f64..y_top)?;

        chart
            .configure_mesh()
            .x_desc("Snapshot")
            .y_desc("Galaxy Count")
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, 4, RED.filled())),
        )?;
        Ok(())
    })
}

/// One bar per type present, log y axis, count printed above each bar.
pub fn render_type_chart(
    snapshot: i64,
    counts: &BTreeMap<GalaxyType, usize>,
    palette: &TypePalette,
    headroom: f64,
    size: (u32, u32),
) -> Result<RgbImage> {
    let labels: Vec<&'static str> = counts.keys().map(|t| t.as_str()).collect();
    let n = labels.len().max(1);
    let max_count = counts.values().copied().max().unwrap_or(0);
    let (y_lo, y_hi) = bar_y_range(max_count, headroom);

    draw_into(size, |root| {
        root.fill(&WHITE)?;
        // Bar i sits on x = i; the axis spans half a slot either side.
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Galaxy Type Count of Snapshot {snapshot}"),
                ("sans-serif", 26),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), (y_lo..y_hi).log_scale())?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_desc("Galaxy Type")
            .y_desc("Number")
            .x_label_formatter(&|x| slot_label(&labels, *x))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()?;

        let label_style = TextStyle::from(("sans-serif", 18).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));

        for (i, (_, &count)) in counts.iter().enumerate() {
            let c = palette.color_at(i);
            let fill = RGBColor(c.red, c.green, c.blue);
            let x = i as f64;

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - BAR_HALF_WIDTH, y_lo), (x + BAR_HALF_WIDTH, count as f64)],
                fill.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                count.to_string(),
                (x, count as f64 * 1.05),
                label_style.clone(),
            )))?;
        }
        Ok(())
    })
}

/// Bars take half of their unit-wide slot.
const BAR_HALF_WIDTH: f64 = 0.25;

/// Tick label for an x position: the type name at integral slots only.
fn slot_label(labels: &[&str], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels
        .get(slot as usize)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
