use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::to_color32;
use crate::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Left side panel – snapshot picker and type summary
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Snapshots");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No catalogue loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let snapshot_counts = state.snapshot_counts.clone();

    ScrollArea::vertical()
        .id_salt("snapshot_list")
        .max_height(ui.available_height() * 0.5)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for (snap, n) in &snapshot_counts {
                let selected = state.selected_snapshot == Some(*snap);
                if ui
                    .selectable_label(selected, format!("{snap}  ({n} galaxies)"))
                    .clicked()
                {
                    state.select_snapshot(*snap);
                    state.view = ChartView::Types;
                }
            }
        });

    ui.separator();

    // ---- Type summary with bar colours ----
    if let Some(snap) = state.selected_snapshot {
        ui.strong(format!("Types in snapshot {snap}"));
        for (galaxy_type, color) in state.palette.assign(state.type_counts.keys().copied()) {
            let count = state.type_counts[&galaxy_type];
            ui.label(RichText::new(format!("{galaxy_type}: {count}")).color(to_color32(color)));
        }
        ui.separator();
    }

    // ---- Preview of the last exported PNG ----
    if let Some(path) = &state.last_export {
        ui.strong("Last export");
        ui.label(path.display().to_string());
        ui.add(
            egui::Image::new(format!("file://{}", path.display()))
                .max_width(ui.available_width()),
        );
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export chart as PNG…"))
                .clicked()
            {
                export_dialog(ui.ctx(), state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} galaxies in {} snapshots",
                ds.len(),
                ds.snapshots().len()
            ));
            ui.separator();
        }

        if ui
            .selectable_label(state.view == ChartView::Counts, "Count per snapshot")
            .clicked()
        {
            state.view = ChartView::Counts;
        }
        if ui
            .selectable_label(state.view == ChartView::Types, "Types per snapshot")
            .clicked()
        {
            state.view = ChartView::Types;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open morphology catalogue")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .set_file_name(state.default_export_name())
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        state.export_current(&path);
        // Same path may be re-exported; drop the cached texture.
        if let Some(saved) = &state.last_export {
            ctx.forget_image(&format!("file://{}", saved.display()));
        }
    }
}
