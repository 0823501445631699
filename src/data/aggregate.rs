use std::collections::BTreeMap;

use super::model::Dataset;

/// Per-year sums and per-country counts over a filtered set of events.
///
/// Years and countries without matching events are absent, not zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub magnitude_by_year: BTreeMap<i32, f64>,
    pub depth_by_year: BTreeMap<i32, f64>,
    pub quake_counts: BTreeMap<String, usize>,
}

impl Aggregates {
    /// Aggregate the events at `indices`.
    pub fn from_indices(dataset: &Dataset, indices: &[usize]) -> Self {
        let mut agg = Aggregates::default();
        for &i in indices {
            let r = &dataset.records[i];
            *agg.magnitude_by_year.entry(r.year).or_default() += r.magnitude;
            *agg.depth_by_year.entry(r.year).or_default() += r.depth;
            *agg.quake_counts.entry(r.country.clone()).or_default() += 1;
        }
        agg
    }

    pub fn is_empty(&self) -> bool {
        self.quake_counts.is_empty()
    }

    /// Country counts ordered ascending by count, ties by name.
    pub fn counts_ascending(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .quake_counts
            .iter()
            .map(|(c, n)| (c.as_str(), *n))
            .collect();
        counts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        counts
    }
}

/// Group `indices` by event year, ascending. One entry per animation frame.
pub fn frames_by_year(dataset: &Dataset, indices: &[usize]) -> BTreeMap<i32, Vec<usize>> {
    let mut frames: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for &i in indices {
        frames.entry(dataset.records[i].year).or_default().push(i);
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::tests::sample;

    #[test]
    fn sums_and_counts() {
        let ds = sample();
        let agg = Aggregates::from_indices(&ds, &[0, 1, 2]);
        assert_eq!(agg.magnitude_by_year, BTreeMap::from([(2010, 11.0), (2012, 7.0)]));
        assert_eq!(agg.depth_by_year, BTreeMap::from([(2010, 45.0), (2012, 20.0)]));
        assert_eq!(agg.quake_counts.get("Chile"), Some(&2));
        assert_eq!(agg.quake_counts.get("Japan"), Some(&1));
    }

    #[test]
    fn no_zero_fill_for_missing_years() {
        let ds = sample();
        // 2010 and 2012 only; 2011 is absent rather than 0.
        let agg = Aggregates::from_indices(&ds, &[0, 2]);
        assert!(!agg.magnitude_by_year.contains_key(&2011));
        assert_eq!(agg.magnitude_by_year.len(), 2);
    }

    #[test]
    fn empty_input() {
        let ds = sample();
        let agg = Aggregates::from_indices(&ds, &[]);
        assert!(agg.is_empty());
        assert!(agg.magnitude_by_year.is_empty());
        assert!(agg.depth_by_year.is_empty());
    }

    #[test]
    fn ascending_counts_break_ties_by_name() {
        let ds = sample();
        let all: Vec<usize> = (0..ds.len()).collect();
        let agg = Aggregates::from_indices(&ds, &all);
        assert_eq!(
            agg.counts_ascending(),
            vec![("Japan", 1), ("Peru", 1), ("Chile", 3)]
        );
    }

    #[test]
    fn frames_group_by_year() {
        let ds = sample();
        let all: Vec<usize> = (0..ds.len()).collect();
        let frames = frames_by_year(&ds, &all);
        assert_eq!(frames.keys().copied().collect::<Vec<_>>(), vec![2010, 2011, 2012]);
        assert_eq!(frames[&2012], vec![2, 4]);
    }
}
