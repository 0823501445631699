use super::aggregate::Aggregates;
use super::filter::{FilterState, filtered_indices};
use super::model::Dataset;

/// Everything the dashboard draws for one filter state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    /// Indices into `Dataset::records`, in file order.
    pub indices: Vec<usize>,
    pub aggregates: Aggregates,
}

impl FilteredView {
    /// Filter then aggregate. Pure: the dataset is only read.
    pub fn compute(dataset: &Dataset, filters: &FilterState) -> Self {
        let indices = filtered_indices(dataset, filters);
        let aggregates = Aggregates::from_indices(dataset, &indices);
        FilteredView { indices, aggregates }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::data::filter::YearRange;
    use crate::data::filter::tests::{event, sample};

    #[test]
    fn chile_2010_scenario() {
        let ds = Dataset::from_records(vec![
            event(2010, "Chile", 6.0, 35.0),
            event(2010, "Chile", 5.0, 10.0),
            event(2012, "Japan", 7.0, 20.0),
        ]);
        let filters = FilterState {
            year_range: YearRange { start: 2010, end: 2010 },
            selected_countries: BTreeSet::from(["Chile".to_string()]),
        };
        let view = FilteredView::compute(&ds, &filters);
        assert_eq!(view.aggregates.magnitude_by_year, BTreeMap::from([(2010, 11.0)]));
        assert_eq!(view.aggregates.depth_by_year, BTreeMap::from([(2010, 45.0)]));
        assert_eq!(
            view.aggregates.quake_counts,
            BTreeMap::from([("Chile".to_string(), 2)])
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let ds = sample();
        let before = ds.records.clone();
        let filters = FilterState::init(&ds).unwrap();
        let a = FilteredView::compute(&ds, &filters);
        let b = FilteredView::compute(&ds, &filters);
        assert_eq!(a, b);
        assert_eq!(ds.records, before);
    }

    #[test]
    fn empty_selection_gives_empty_aggregates() {
        let ds = sample();
        let mut filters = FilterState::init(&ds).unwrap();
        filters.selected_countries.clear();
        let view = FilteredView::compute(&ds, &filters);
        assert!(view.is_empty());
        assert_eq!(view.aggregates, Aggregates::default());
    }
}
