// Month-by-month series with zero-filled gaps
use std::collections::BTreeMap;

use shared::models::{MonthCount, MonthKey, MonthValue};

#[derive(Debug, Default, Clone, Copy)]
struct MonthTally {
    count: usize,
    value: f64,
}

#[derive(Debug, Default)]
pub struct MonthlyAccumulator {
    months: BTreeMap<MonthKey, MonthTally>,
    earliest_added: Option<MonthKey>,
}

impl MonthlyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Books a priced record into its effective month.
    pub fn add(&mut self, month: MonthKey, price: f64) {
        let tally = self.months.entry(month).or_default();
        tally.count += 1;
        tally.value += price;
    }

    /// Notes the month a priced record was added; the earliest one anchors the
    /// start of the series.
    pub fn note_added(&mut self, month: MonthKey) {
        self.earliest_added = Some(match self.earliest_added {
            Some(current) => current.min(month),
            None => month,
        });
    }

    pub fn start_month(&self) -> Option<MonthKey> {
        self.earliest_added
            .or_else(|| self.months.keys().next().copied())
    }

    pub fn end_month(&self) -> Option<MonthKey> {
        self.months.keys().next_back().copied()
    }

    /// Contiguous count and value series from the start month to the end month
    /// inclusive. Both are empty when either bound is unknown or the start falls
    /// after the end.
    pub fn series(&self) -> (Vec<MonthCount>, Vec<MonthValue>) {
        let mut counts = Vec::new();
        let mut values = Vec::new();
        let (Some(start), Some(end)) = (self.start_month(), self.end_month()) else {
            return (counts, values);
        };

        let mut cursor = start;
        while cursor <= end {
            let tally = self.months.get(&cursor).copied().unwrap_or_default();
            counts.push(MonthCount {
                month: cursor,
                count: tally.count,
            });
            values.push(MonthValue {
                month: cursor,
                value: tally.value,
            });
            cursor = cursor.succ();
        }
        (counts, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn months(counts: &[MonthCount]) -> Vec<String> {
        counts.iter().map(|c| c.month.to_string()).collect()
    }

    #[test]
    fn fills_gaps_with_zero() {
        let mut acc = MonthlyAccumulator::new();
        acc.add(key(2023, 1), 100.0);
        acc.add(key(2023, 4), 50.0);
        acc.add(key(2023, 4), 25.0);
        let (counts, values) = acc.series();
        assert_eq!(months(&counts), vec!["2023-01", "2023-02", "2023-03", "2023-04"]);
        assert_eq!(
            counts.iter().map(|c| c.count).collect::<Vec<_>>(),
            vec![1, 0, 0, 2]
        );
        assert_eq!(
            values.iter().map(|v| v.value).collect::<Vec<_>>(),
            vec![100.0, 0.0, 0.0, 75.0]
        );
    }

    #[test]
    fn crosses_year_boundary() {
        let mut acc = MonthlyAccumulator::new();
        acc.add(key(2022, 11), 1.0);
        acc.add(key(2023, 2), 1.0);
        let (counts, _) = acc.series();
        assert_eq!(
            months(&counts),
            vec!["2022-11", "2022-12", "2023-01", "2023-02"]
        );
    }

    #[test]
    fn earliest_added_month_anchors_start() {
        let mut acc = MonthlyAccumulator::new();
        acc.note_added(key(2022, 12));
        acc.note_added(key(2023, 3));
        acc.add(key(2023, 2), 10.0);
        let (counts, _) = acc.series();
        assert_eq!(months(&counts), vec!["2022-12", "2023-01", "2023-02"]);
    }

    #[test]
    fn buckets_before_start_are_cut_off() {
        let mut acc = MonthlyAccumulator::new();
        acc.note_added(key(2023, 3));
        acc.add(key(2023, 1), 10.0);
        acc.add(key(2023, 4), 20.0);
        let (counts, values) = acc.series();
        assert_eq!(months(&counts), vec!["2023-03", "2023-04"]);
        assert_eq!(values[1].value, 20.0);
    }

    #[test]
    fn start_after_end_yields_empty_series() {
        let mut acc = MonthlyAccumulator::new();
        acc.note_added(key(2024, 5));
        acc.add(key(2023, 1), 10.0);
        let (counts, values) = acc.series();
        assert!(counts.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn no_buckets_yields_empty_series() {
        let mut acc = MonthlyAccumulator::new();
        acc.note_added(key(2023, 1));
        assert_eq!(acc.end_month(), None);
        let (counts, values) = acc.series();
        assert!(counts.is_empty() && values.is_empty());
    }
}
