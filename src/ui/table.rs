use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::ui::no_data;

const HEADERS: [&str; 7] = ["date", "Year", "mag", "depth", "latitude", "longitude", "country"];

/// Raw rows of the visible events, inside a collapsible section.
pub fn event_table(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        no_data(ui);
        return;
    };
    if state.view.is_empty() {
        no_data(ui);
        return;
    }

    let indices = &state.view.indices;

    ui.heading("📋 Explore Earthquake Data");
    egui::CollapsingHeader::new("Click to view filtered data table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(40.0))
                .columns(Column::auto().at_least(70.0), HEADERS.len())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for h in HEADERS {
                        header.col(|ui| {
                            ui.strong(h);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, indices.len(), |mut row| {
                        let n = row.index();
                        let r = &ds.records[indices[n]];
                        let cells = [
                            r.timestamp.to_string(),
                            r.year.to_string(),
                            format!("{:.2}", r.magnitude),
                            format!("{:.2}", r.depth),
                            format!("{:.4}", r.latitude),
                            format!("{:.4}", r.longitude),
                            r.country.clone(),
                        ];
                        row.col(|ui| {
                            ui.label(n.to_string());
                        });
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}
