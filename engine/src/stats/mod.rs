//! Aggregation of canonical records into the report summary.
//!
//! Only records with a price feed the place breakdowns and the monthly series;
//! the total record count covers every row.

pub mod monthly;
pub mod places;

use shared::models::{BookRecord, MonthKey, StatsSummary};

pub use monthly::MonthlyAccumulator;
pub use places::PlaceAggregate;

pub fn aggregate(records: &[BookRecord]) -> StatsSummary {
    let mut places = PlaceAggregate::new();
    let mut monthly = MonthlyAccumulator::new();
    let mut priced = 0usize;
    let mut total_value = 0.0;

    for record in records {
        let Some(price) = record.price else {
            continue;
        };
        priced += 1;
        total_value += price;
        places.add(&record.place, price);

        if let Some(date) = record.effective_date() {
            monthly.add(MonthKey::from_date(date), price);
        }
        if let Some(added) = record.date_added {
            monthly.note_added(MonthKey::from_date(added));
        }
    }

    let (purchases_per_month, value_per_month) = monthly.series();
    StatsSummary {
        total_record_count: records.len(),
        records_with_price_count: priced,
        total_value,
        books_by_place: places.books_by_place(),
        value_by_place: places.value_by_place(),
        purchases_per_month,
        value_per_month,
    }
}
