//! Core data structures for the monthly sales series.

mod series;

pub use series::{month_start, MonthlySeries, RawRecord};
