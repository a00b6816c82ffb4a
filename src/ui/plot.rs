use eframe::egui::{Align2, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::to_color32;
use crate::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart in the central panel.
pub fn chart_panel(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalogue to view morphologies  (File → Open…)");
        });
        return;
    }

    match state.view {
        ChartView::Counts => count_plot(ui, &state.snapshot_counts),
        ChartView::Types => type_plot(ui, state),
    }
}

/// Galaxy count per snapshot: dashed line plus red markers.
fn count_plot(ui: &mut Ui, counts: &[(i64, usize)]) {
    let points: Vec<[f64; 2]> = counts
        .iter()
        .map(|(snap, n)| [*snap as f64, *n as f64])
        .collect();

    Plot::new("count_plot")
        .legend(Legend::default())
        .x_axis_label("Snapshot")
        .y_axis_label("Galaxy Count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("galaxies")
                    .color(Color32::LIGHT_BLUE)
                    .style(LineStyle::dashed_dense())
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points.clone()))
                    .name("galaxies")
                    .color(Color32::RED)
                    .radius(4.0),
            );
        });
}

/// Type counts of the selected snapshot. egui_plot has no log axis, so bar
/// heights are `log10(count)` and the y labels are mapped back.
fn type_plot(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = state.selected_snapshot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select a snapshot");
        });
        return;
    };

    let assigned = state.palette.assign(state.type_counts.keys().copied());
    let labels: Vec<String> = assigned.iter().map(|(t, _)| t.to_string()).collect();

    let bars: Vec<Bar> = assigned
        .iter()
        .enumerate()
        .map(|(i, (galaxy_type, color))| {
            let count = state.type_counts[galaxy_type];
            Bar::new(i as f64, (count as f64).log10())
                .name(galaxy_type.as_str())
                .fill(to_color32(*color))
                .width(0.5)
        })
        .collect();

    let chart = BarChart::new(bars).element_formatter(Box::new(|bar, _chart| {
        format!("{}: {:.0}", bar.name, 10f64.powf(bar.value))
    }));

    ui.heading(format!("Galaxy Type Count of Snapshot {snapshot}"));

    let max_count = state.type_counts.values().copied().max().unwrap_or(1);
    let y_top = (max_count as f64 * state.config.bar_headroom).max(10.0).log10();

    Plot::new("type_plot")
        .x_axis_label("Galaxy Type")
        .y_axis_label("Number")
        .include_y(0.0)
        .include_y(y_top)
        .x_axis_formatter(move |mark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .y_axis_formatter(|mark, _range| {
            if mark.value.fract().abs() > 1e-6 {
                return String::new();
            }
            format!("{:.0}", 10f64.powf(mark.value))
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            for (i, (galaxy_type, _)) in assigned.iter().enumerate() {
                let count = state.type_counts[galaxy_type];
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(i as f64, (count as f64).log10()),
                        count.to_string(),
                    )
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}
