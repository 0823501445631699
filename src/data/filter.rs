use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// YearRange – closed interval of years
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Build a range from two ends, ordered and clamped to `bounds`.
    pub fn clamped(a: i32, b: i32, bounds: (i32, i32)) -> Self {
        let (lo, hi) = bounds;
        let a = a.clamp(lo, hi);
        let b = b.clamp(lo, hi);
        YearRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Years the start handle may take: it cannot pass the end handle.
    pub fn start_choices(&self, bounds: (i32, i32)) -> RangeInclusive<i32> {
        bounds.0..=self.end.clamp(bounds.0, bounds.1)
    }

    /// Years the end handle may take: it cannot pass the start handle.
    pub fn end_choices(&self, bounds: (i32, i32)) -> RangeInclusive<i32> {
        self.start.clamp(bounds.0, bounds.1)..=bounds.1
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: year interval + selected countries
// ---------------------------------------------------------------------------

/// What happens to the country selection when the year range moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Keep the selection as it is; deselected countries stay deselected.
    #[default]
    Sticky,
    /// Reselect every country present in the new range.
    ResetOnRangeChange,
}

/// Session filter: one year interval and a set of selected countries.
/// An empty country set selects nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub year_range: YearRange,
    pub selected_countries: BTreeSet<String>,
}

impl FilterState {
    /// Full year span with every country selected (i.e., show everything).
    /// `None` for an empty dataset, which has no year span.
    pub fn init(dataset: &Dataset) -> Option<Self> {
        let (lo, hi) = dataset.year_bounds?;
        let year_range = YearRange { start: lo, end: hi };
        Some(FilterState {
            year_range,
            selected_countries: country_options(dataset, year_range),
        })
    }

    /// Move the year range, applying `policy` to the country selection.
    /// Returns whether the range actually changed.
    pub fn set_year_range(
        &mut self,
        dataset: &Dataset,
        start: i32,
        end: i32,
        policy: SelectionPolicy,
    ) -> bool {
        let Some(bounds) = dataset.year_bounds else {
            return false;
        };
        let range = YearRange::clamped(start, end, bounds);
        if range == self.year_range {
            return false;
        }
        self.year_range = range;
        if policy == SelectionPolicy::ResetOnRangeChange {
            self.selected_countries = country_options(dataset, range);
        }
        true
    }
}

/// Return indices of events whose year lies inside `range`.
pub fn year_indices(dataset: &Dataset, range: YearRange) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| range.contains(r.year))
        .map(|(i, _)| i)
        .collect()
}

/// Countries offered for selection: those present in the year-filtered set.
pub fn country_options(dataset: &Dataset, range: YearRange) -> BTreeSet<String> {
    dataset
        .records
        .iter()
        .filter(|r| range.contains(r.year))
        .map(|r| r.country.clone())
        .collect()
}

/// Return indices of events that pass both the year and country filters.
///
/// An event passes when:
/// * its year lies in the closed `year_range`, and
/// * its country is in `selected_countries` (empty set → nothing passes).
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    if filters.selected_countries.is_empty() {
        return Vec::new();
    }
    year_indices(dataset, filters.year_range)
        .into_iter()
        .filter(|&i| filters.selected_countries.contains(&dataset.records[i].country))
        .collect()
}
