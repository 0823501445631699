use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::state::AppState;
use crate::ui::no_data;

const MAGNITUDE_COLOR: Color32 = Color32::from_rgb(0xEF, 0x55, 0x3B);
const DEPTH_COLOR: Color32 = Color32::from_rgb(0x63, 0x6E, 0xFA);

// ---------------------------------------------------------------------------
// Line charts: yearly totals
// ---------------------------------------------------------------------------

/// Magnitude and depth totals per year, side by side.
pub fn yearly_totals(ui: &mut Ui, state: &AppState) {
    let agg = &state.view.aggregates;
    if agg.is_empty() {
        no_data(ui);
        return;
    }

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].heading("📉 Total Earthquake Magnitudes by Year");
        year_line(&mut cols[0], "magnitude_by_year", "mag", &agg.magnitude_by_year, MAGNITUDE_COLOR);
        cols[1].heading("📉 Total Earthquake Depth by Year");
        year_line(&mut cols[1], "depth_by_year", "depth", &agg.depth_by_year, DEPTH_COLOR);
    });
}

fn year_line(ui: &mut Ui, id: &str, y_label: &str, series: &BTreeMap<i32, f64>, color: Color32) {
    let points: Vec<[f64; 2]> = series
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(&y, &v)| [y as f64, v])
        .collect();

    Plot::new(id)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .x_axis_formatter(|mark: GridMark, _range| year_label(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(y_label)
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(3.5));
        });
}

/// Axis labels only on whole years.
fn year_label(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        String::new()
    }
}

// ---------------------------------------------------------------------------
// Bar chart: events per country
// ---------------------------------------------------------------------------

/// Horizontal bar per country, ascending by count from the bottom up.
pub fn country_counts(ui: &mut Ui, state: &AppState) {
    let counts = state.view.aggregates.counts_ascending();
    if counts.is_empty() {
        no_data(ui);
        return;
    }

    ui.heading("📊 Number of Earthquakes per Country");

    let labels: Vec<String> = counts.iter().map(|(c, _)| c.to_string()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (country, n))| {
            let fill = state
                .country_colors
                .get(*country)
                .copied()
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new(i as f64, *n as f64)
                .name(*country)
                .fill(fill)
                .width(0.8)
        })
        .collect();

    Plot::new("quake_counts")
        .x_axis_label("Earthquake Count")
        .y_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-9 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Earthquake Count"));
        });
}

#[cfg(test)]
mod tests {
    use super::year_label;

    #[test]
    fn year_labels_skip_fractions() {
        assert_eq!(year_label(2010.0), "2010");
        assert_eq!(year_label(2010.5), "");
    }
}
