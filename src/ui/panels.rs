use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::SelectionPolicy;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🧰 Filters");
    ui.separator();

    let (Some(ds), Some(filters)) = (&state.dataset, &state.filters) else {
        ui.label("No events loaded.");
        return;
    };
    let Some((min_year, max_year)) = ds.year_bounds else {
        return;
    };

    // ---- Year range ----
    ui.strong("Select Year Range");
    let mut start = filters.year_range.start;
    let mut end = filters.year_range.end;
    // Each handle stops at the other one.
    let bounds = (min_year, max_year);
    let start_range = filters.year_range.start_choices(bounds);
    let end_range = filters.year_range.end_choices(bounds);
    let changed_start = ui
        .add(egui::Slider::new(&mut start, start_range).text("from"))
        .changed();
    let changed_end = ui
        .add(egui::Slider::new(&mut end, end_range).text("to"))
        .changed();
    if changed_start || changed_end {
        state.set_year_range(start, end);
    }

    // ---- Selection policy ----
    let mut policy = state.policy;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("On range change:");
        ui.radio_value(&mut policy, SelectionPolicy::Sticky, "keep");
        ui.radio_value(&mut policy, SelectionPolicy::ResetOnRangeChange, "select all");
    });
    if policy != state.policy {
        state.set_policy(policy);
    }
    ui.separator();

    // ---- Countries ----
    let options = state.country_options.clone();
    let n_selected = options.iter().filter(|c| state.is_selected(c)).count();
    ui.strong(format!("Select Countries  ({n_selected}/{})", options.len()));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_countries();
        }
        if ui.small_button("None").clicked() {
            state.select_no_countries();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for country in &options {
                let mut checked = state.is_selected(country);
                let mut text = RichText::new(country);
                if let Some(c) = state.country_colors.get(country) {
                    text = text.color(*c);
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_country(country);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar and the tab selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let source = ds
                .source
                .as_deref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{} events loaded from {source}, {} visible",
                ds.len(),
                state.view.indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open earthquake data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Opened {} with {} countries",
                    path.display(),
                    dataset.countries.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
