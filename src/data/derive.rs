//! Derived Columns
//! The two transient columns some charts compute: a price bucket label and
//! the month of the last review.

use crate::data::{ListingTable, LoaderError};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Left-closed bucket edges; the last bucket is open-ended.
pub const PRICE_BUCKET_EDGES: [f64; 6] = [0.0, 100.0, 200.0, 300.0, 400.0, 500.0];

pub const PRICE_BUCKET_LABELS: [&str; 6] =
    ["0-100", "100-200", "200-300", "300-400", "400-500", "500+"];

/// Bucket label for a price. Negative or NaN prices have none.
pub fn price_bucket(price: f64) -> Option<&'static str> {
    if price.is_nan() || price < PRICE_BUCKET_EDGES[0] {
        return None;
    }
    let idx = PRICE_BUCKET_EDGES
        .iter()
        .rposition(|&edge| price >= edge)
        .unwrap_or(0);
    Some(PRICE_BUCKET_LABELS[idx])
}

/// Index of a label in [`PRICE_BUCKET_LABELS`].
pub fn price_bucket_index(label: &str) -> Option<usize> {
    PRICE_BUCKET_LABELS.iter().position(|&l| l == label)
}

/// Parse a review date and truncate it to the first day of its month.
pub fn review_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()?;
    date.with_day(1)
}

/// Month as a fractional year, so months sit evenly on a numeric axis.
pub fn decimal_year(month: NaiveDate) -> f64 {
    month.year() as f64 + month.month0() as f64 / 12.0
}

/// A listing point on the map with its price bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub bucket: &'static str,
}

/// Price buckets for every listing with coordinates and a bucketable price.
pub fn bucketed_coordinates(table: &ListingTable) -> Result<Vec<BucketedPoint>, LoaderError> {
    let prices = table.f64_values("price")?;
    let longitudes = table.f64_values("longitude")?;
    let latitudes = table.f64_values("latitude")?;

    Ok(prices
        .into_iter()
        .zip(longitudes)
        .zip(latitudes)
        .filter_map(|((price, lon), lat)| {
            Some(BucketedPoint {
                longitude: lon?,
                latitude: lat?,
                bucket: price_bucket(price?)?,
            })
        })
        .collect())
}

/// `(room_type, review month, price)` for rows whose review date parses.
pub fn priced_review_months(
    table: &ListingTable,
) -> Result<Vec<(String, NaiveDate, f64)>, LoaderError> {
    let room_types = table.str_values("room_type")?;
    let reviews = table.str_values("last_review")?;
    let prices = table.f64_values("price")?;

    Ok(room_types
        .into_iter()
        .zip(reviews)
        .zip(prices)
        .filter_map(|((room, review), price)| {
            let month = review_month(review.as_deref()?)?;
            Some((room?, month, price?))
        })
        .collect())
}
