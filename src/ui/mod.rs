pub mod map;
pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::Ui;

/// Placeholder drawn by every view when the filters leave nothing to show.
pub fn no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("No data for the current filters");
    });
}
