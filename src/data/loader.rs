//! Listing Table Module
//! Loads the listings CSV once with Polars and exposes the column reads and
//! group-by aggregations the chart routines need.

use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Columns every chart routine relies on.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "id",
    "neighbourhood_group",
    "neighbourhood",
    "room_type",
    "price",
    "latitude",
    "longitude",
    "last_review",
];

/// Required columns the charts read as numbers.
const NUMERIC_REQUIRED: [&str; 4] = ["id", "price", "latitude", "longitude"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file not found: {0}")]
    MissingFile(PathBuf),
    #[error("CSV is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Read-only listing table, loaded once at startup.
pub struct ListingTable {
    df: DataFrame,
    source: PathBuf,
}

impl ListingTable {
    /// Load and check a listings CSV.
    pub fn load_csv(file_path: &Path) -> Result<Self, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::MissingFile(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::from_dataframe(df, file_path.to_path_buf())
    }

    /// Wrap an existing DataFrame, rejecting it when required columns are absent.
    pub fn from_dataframe(df: DataFrame, source: PathBuf) -> Result<Self, LoaderError> {
        Self::check_columns(&df)?;
        let table = Self { df, source };
        for name in table.non_numeric_required() {
            log::warn!(
                "Column '{}' in {} is not numeric; unparsable cells are treated as missing",
                name,
                table.source.display()
            );
        }
        Ok(table)
    }

    fn check_columns(df: &DataFrame) -> Result<(), LoaderError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !present.iter().any(|p| p == *name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoaderError::MissingColumns(missing))
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Names of numeric columns, in file order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Required numeric columns that were inferred with another type.
    pub fn non_numeric_required(&self) -> Vec<String> {
        let numeric = self.numeric_columns();
        NUMERIC_REQUIRED
            .iter()
            .filter(|name| !numeric.iter().any(|n| n == *name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Column values as floats; nulls and NaN become `None`.
    pub fn f64_values(&self, column: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let values = self.df.column(column)?.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        Ok(ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Column values as strings; nulls and empty cells become `None`.
    pub fn str_values(&self, column: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let values = self.df.column(column)?.cast(&DataType::String)?;
        let ca = values.str()?;
        Ok(ca
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect())
    }

    /// Distinct non-null values of a column in order of first appearance.
    pub fn categories_in_order(&self, column: &str) -> Result<Vec<String>, LoaderError> {
        let mut seen: Vec<String> = Vec::new();
        for value in self.str_values(column)?.into_iter().flatten() {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    /// Values of `value` split by category of `key`, categories in order of
    /// first appearance. Rows with a missing key or value are dropped.
    pub fn grouped_values(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<(String, Vec<f64>)>, LoaderError> {
        let keys = self.str_values(key)?;
        let values = self.f64_values(value)?;
        Ok(group_in_order(keys.into_iter().zip(values)))
    }

    /// Row positions split by category of `key`, in order of first appearance.
    pub fn grouped_row_index(&self, key: &str) -> Result<Vec<(String, Vec<f64>)>, LoaderError> {
        let keys = self.str_values(key)?;
        Ok(group_in_order(
            keys.into_iter()
                .enumerate()
                .map(|(i, k)| (k, Some(i as f64))),
        ))
    }

    /// `sum(value)` per category of `key`, keys sorted.
    pub fn group_sum(&self, key: &str, value: &str) -> Result<Vec<(String, f64)>, LoaderError> {
        let summed = self
            .df
            .clone()
            .lazy()
            .filter(col(key).is_not_null())
            .group_by([col(key)])
            .agg([col(value).cast(DataType::Float64).sum().alias("total")])
            .collect()?;

        let keys = summed.column(key)?.cast(&DataType::String)?;
        let totals = summed.column("total")?.cast(&DataType::Float64)?;

        let mut out: Vec<(String, f64)> = keys
            .str()?
            .into_iter()
            .zip(totals.f64()?.into_iter())
            .filter_map(|(k, v)| Some((k?.to_string(), v.unwrap_or(0.0))))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    /// Row count per category of `column`, most frequent first.
    pub fn value_counts(&self, column: &str) -> Result<Vec<(String, usize)>, LoaderError> {
        let counted = self
            .df
            .clone()
            .lazy()
            .filter(col(column).is_not_null())
            .group_by([col(column)])
            .agg([len().alias("count")])
            .collect()?;

        let keys = counted.column(column)?.cast(&DataType::String)?;
        let counts = counted.column("count")?.cast(&DataType::UInt64)?;

        let mut out: Vec<(String, usize)> = keys
            .str()?
            .into_iter()
            .zip(counts.u64()?.into_iter())
            .filter_map(|(k, n)| Some((k?.to_string(), n? as usize)))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(out)
    }
}

fn group_in_order<I>(rows: I) -> Vec<(String, Vec<f64>)>
where
    I: IntoIterator<Item = (Option<String>, Option<f64>)>,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();

    for (key, value) in rows {
        let (Some(key), Some(value)) = (key, value) else {
            continue;
        };
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(value);
    }

    order
        .into_iter()
        .map(|key| {
            let values = groups.remove(&key).unwrap_or_default();
            (key, values)
        })
        .collect()
}
