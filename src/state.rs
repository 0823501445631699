use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use eframe::egui::Color32;

use crate::color::country_colors;
use crate::data::filter::{FilterState, SelectionPolicy, country_options};
use crate::data::model::Dataset;
use crate::data::view::FilteredView;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    DepthMap,
    MagnitudeMap,
    LineCharts,
    BarChart,
    DataTable,
    AnimatedMap,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::DepthMap,
        Tab::MagnitudeMap,
        Tab::LineCharts,
        Tab::BarChart,
        Tab::DataTable,
        Tab::AnimatedMap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::DepthMap => "🌐 Map by Depth",
            Tab::MagnitudeMap => "🌐 Map by Magnitude",
            Tab::LineCharts => "📈 Line Charts",
            Tab::BarChart => "📊 Bar Chart",
            Tab::DataTable => "📋 Data Table",
            Tab::AnimatedMap => "🎞 Animated Map",
        }
    }
}

// ---------------------------------------------------------------------------
// Animated map playback
// ---------------------------------------------------------------------------

/// Playback position of the animated map.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    /// Year currently shown; `None` until a frame exists.
    pub year: Option<i32>,
    pub playing: bool,
    /// UI time (seconds) of the last frame advance.
    pub last_step: f64,
}

impl Animation {
    /// Move to the next frame year after the current one, wrapping around.
    pub fn step_forward(&mut self, years: &[i32]) {
        self.year = match self.year {
            Some(y) => years.iter().copied().find(|&f| f > y).or(years.first().copied()),
            None => years.first().copied(),
        };
    }

    pub fn step_back(&mut self, years: &[i32]) {
        self.year = match self.year {
            Some(y) => years.iter().rev().copied().find(|&f| f < y).or(years.last().copied()),
            None => years.last().copied(),
        };
    }

    /// Keep `year` on an existing frame after the filters changed.
    pub fn sync(&mut self, years: &[i32]) {
        match self.year {
            Some(y) if years.contains(&y) => {}
            Some(y) => self.year = years.iter().copied().find(|&f| f >= y).or(years.first().copied()),
            None => self.year = years.first().copied(),
        }
        if years.is_empty() {
            self.playing = false;
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset, shared read-only.
    pub dataset: Option<Arc<Dataset>>,

    /// Year range and country selection; `None` for an empty dataset.
    pub filters: Option<FilterState>,

    /// How the country selection reacts to year range changes.
    pub policy: SelectionPolicy,

    /// Countries present in the current year range (cached).
    pub country_options: BTreeSet<String>,

    /// Filtered indices and aggregates for the current filters (cached).
    pub view: FilteredView,

    /// Stable colour per country for the bar chart.
    pub country_colors: BTreeMap<String, Color32>,

    pub active_tab: Tab,

    pub animation: Animation,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        let mut state = Self::default();
        state.set_dataset(dataset);
        state
    }

    /// Ingest a newly loaded dataset and initialise filters.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = FilterState::init(&dataset);
        self.country_colors = country_colors(&dataset.countries);
        self.dataset = Some(Arc::new(dataset));
        self.animation = Animation::default();
        self.status_message = None;
        self.refilter();
    }

    /// Recompute options and the filtered view after a filter change.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(filters)) = (&self.dataset, &self.filters) else {
            self.country_options.clear();
            self.view = FilteredView::default();
            return;
        };
        self.country_options = country_options(ds, filters.year_range);
        self.view = FilteredView::compute(ds, filters);
        log::debug!(
            "Filter {:?}, {} countries selected: {} events visible",
            filters.year_range,
            filters.selected_countries.len(),
            self.view.indices.len()
        );
        let years = self.frame_years();
        self.animation.sync(&years);
    }

    /// Years that have at least one visible event, ascending.
    pub fn frame_years(&self) -> Vec<i32> {
        self.view.aggregates.magnitude_by_year.keys().copied().collect()
    }

    pub fn set_year_range(&mut self, start: i32, end: i32) {
        let (Some(ds), Some(filters)) = (&self.dataset, &mut self.filters) else {
            return;
        };
        if filters.set_year_range(ds, start, end, self.policy) {
            self.refilter();
        }
    }

    pub fn set_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if let Some(filters) = &mut self.filters {
            if !filters.selected_countries.remove(country) {
                filters.selected_countries.insert(country.to_string());
            }
            self.refilter();
        }
    }

    /// Select every country offered for the current year range.
    pub fn select_all_countries(&mut self) {
        if let Some(filters) = &mut self.filters {
            filters.selected_countries = self.country_options.clone();
            self.refilter();
        }
    }

    pub fn select_no_countries(&mut self) {
        if let Some(filters) = &mut self.filters {
            filters.selected_countries.clear();
            self.refilter();
        }
    }

    pub fn is_selected(&self, country: &str) -> bool {
        self.filters
            .as_ref()
            .is_some_and(|f| f.selected_countries.contains(country))
    }
}
