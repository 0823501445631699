use eframe::egui;

use crate::data::model::Dataset;
use crate::state::{AppState, Tab};
use crate::ui::map::{self, MapValue};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QuakeExplorerApp {
    pub state: AppState,
}

impl QuakeExplorerApp {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for QuakeExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            Tab::DepthMap => map::event_map(ui, &self.state, MapValue::Depth),
            Tab::MagnitudeMap => map::event_map(ui, &self.state, MapValue::Magnitude),
            Tab::LineCharts => plot::yearly_totals(ui, &self.state),
            Tab::BarChart => plot::country_counts(ui, &self.state),
            Tab::DataTable => table::event_table(ui, &self.state),
            Tab::AnimatedMap => map::animated_map(ui, &mut self.state),
        });
    }
}
