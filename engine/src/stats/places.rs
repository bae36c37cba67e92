// Per-place breakdowns over priced records
use std::collections::HashMap;

use shared::models::{PlaceCount, PlaceValue};

#[derive(Debug, Default)]
struct PlaceTally {
    place: String,
    count: usize,
    value: f64,
}

/// Accumulates count and price sum per place, remembering first-occurrence order.
#[derive(Debug, Default)]
pub struct PlaceAggregate {
    index: HashMap<String, usize>,
    tallies: Vec<PlaceTally>,
}

impl PlaceAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, place: &str, price: f64) {
        let slot = match self.index.get(place) {
            Some(&i) => i,
            None => {
                self.tallies.push(PlaceTally {
                    place: place.to_string(),
                    ..PlaceTally::default()
                });
                self.index.insert(place.to_string(), self.tallies.len() - 1);
                self.tallies.len() - 1
            }
        };
        let tally = &mut self.tallies[slot];
        tally.count += 1;
        tally.value += price;
    }

    /// Places by descending count; equal counts keep first-occurrence order.
    pub fn books_by_place(&self) -> Vec<PlaceCount> {
        let mut out: Vec<PlaceCount> = self
            .tallies
            .iter()
            .map(|t| PlaceCount {
                place: t.place.clone(),
                count: t.count,
            })
            .collect();
        // sort_by is stable, so ties stay in insertion order.
        out.sort_by(|a, b| b.count.cmp(&a.count));
        out
    }

    /// Places by descending price sum; equal sums keep first-occurrence order.
    pub fn value_by_place(&self) -> Vec<PlaceValue> {
        let mut out: Vec<PlaceValue> = self
            .tallies
            .iter()
            .map(|t| PlaceValue {
                place: t.place.clone(),
                value: t.value,
            })
            .collect();
        out.sort_by(|a, b| b.value.total_cmp(&a.value));
        out
    }
}
