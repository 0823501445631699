use std::time::Duration;

use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::ValueScale;
use crate::data::aggregate::frames_by_year;
use crate::data::model::{Dataset, EventRecord};
use crate::state::AppState;
use crate::ui::no_data;

/// Number of colour/size classes on the maps.
const MAP_BINS: usize = 8;

/// Seconds each year stays on screen while the animation plays.
const FRAME_SECONDS: f64 = 0.8;

/// Which event field drives marker colour and size.
#[derive(Debug, Clone, Copy)]
pub enum MapValue {
    Depth,
    Magnitude,
}

impl MapValue {
    fn of(self, r: &EventRecord) -> f64 {
        match self {
            MapValue::Depth => r.depth,
            MapValue::Magnitude => r.magnitude,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MapValue::Depth => "depth",
            MapValue::Magnitude => "mag",
        }
    }
}

// ---------------------------------------------------------------------------
// Static maps
// ---------------------------------------------------------------------------

/// Scatter of all visible events on a longitude/latitude plane.
pub fn event_map(ui: &mut Ui, state: &AppState, value: MapValue) {
    let Some(ds) = &state.dataset else {
        no_data(ui);
        return;
    };
    let indices = &state.view.indices;
    let Some(scale) = ValueScale::from_values(indices.iter().map(|&i| value.of(&ds.records[i])), MAP_BINS)
    else {
        no_data(ui);
        return;
    };

    let title = match value {
        MapValue::Depth => "🗺 Earthquake Locations by Depth",
        MapValue::Magnitude => "🗺 Earthquake Locations by Magnitude",
    };
    ui.heading(title);
    geo_scatter(ui, ("event_map", value.label()), ds, indices, value, &scale);
}

fn geo_scatter(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    ds: &Dataset,
    indices: &[usize],
    value: MapValue,
    scale: &ValueScale,
) {
    let mut binned: Vec<Vec<[f64; 2]>> = vec![Vec::new(); scale.bins];
    for &i in indices {
        let r = &ds.records[i];
        // Infinite coordinates are kept in the data but cannot be placed.
        if r.longitude.is_finite() && r.latitude.is_finite() {
            binned[scale.bin(value.of(r))].push([r.longitude, r.latitude]);
        }
    }

    Plot::new(id)
        .legend(Legend::default())
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(vec![
                    [-180.0, -90.0],
                    [180.0, -90.0],
                    [180.0, 90.0],
                    [-180.0, 90.0],
                    [-180.0, -90.0],
                ]))
                .color(Color32::GRAY)
                .width(1.0),
            );
            for (bin, points) in binned.into_iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let (lo, hi) = scale.bin_range(bin);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(format!("{} {lo:.1}–{hi:.1}", value.label()))
                        .color(scale.color(bin))
                        .radius(scale.radius(bin))
                        .filled(true),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Animated map
// ---------------------------------------------------------------------------

/// Magnitude map stepping through the visible years.
pub fn animated_map(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = state.dataset.clone() else {
        no_data(ui);
        return;
    };
    let indices = &state.view.indices;
    let value = MapValue::Magnitude;
    // One scale over all frames so colours are comparable between years.
    let Some(scale) = ValueScale::from_values(indices.iter().map(|&i| value.of(&ds.records[i])), MAP_BINS)
    else {
        no_data(ui);
        return;
    };
    let frames = frames_by_year(&ds, indices);
    let years: Vec<i32> = frames.keys().copied().collect();

    ui.heading("🎞 Animated Earthquake Map by Magnitude");

    let anim = &mut state.animation;
    ui.horizontal(|ui: &mut Ui| {
        let label = if anim.playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(label).clicked() {
            anim.playing = !anim.playing;
            anim.last_step = ui.input(|i| i.time);
        }
        if ui.button("⏮").clicked() {
            anim.playing = false;
            anim.step_back(&years);
        }
        if ui.button("⏭").clicked() {
            anim.playing = false;
            anim.step_forward(&years);
        }
        if let (Some(first), Some(last), Some(mut year)) =
            (years.first().copied(), years.last().copied(), anim.year)
        {
            if ui
                .add(egui::Slider::new(&mut year, first..=last).text("Year"))
                .changed()
            {
                anim.playing = false;
                anim.year = Some(year);
                anim.sync(&years);
            }
        }
    });

    if anim.playing {
        let now = ui.input(|i| i.time);
        if now - anim.last_step >= FRAME_SECONDS {
            anim.step_forward(&years);
            anim.last_step = now;
        }
        ui.ctx()
            .request_repaint_after(Duration::from_secs_f64(FRAME_SECONDS));
    }

    let Some(year) = anim.year else {
        no_data(ui);
        return;
    };
    let frame = frames.get(&year).map(Vec::as_slice).unwrap_or_default();
    ui.label(format!("{year}: {} events", frame.len()));
    geo_scatter(ui, "animated_map", &ds, frame, value, &scale);
}
