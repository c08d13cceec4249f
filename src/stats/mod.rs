//! Stats module - aggregations behind the charts

mod calculator;

pub use calculator::{Kde, StatsCalculator};
