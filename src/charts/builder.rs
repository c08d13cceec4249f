//! Figure Builder
//! One canned routine per chart selection, turning the listing table into a
//! `Figure`.

use crate::charts::figure::{
    contrast_text, format_significant, heat_color, series_color, Axis, BarSpec, Figure, Mark, Orientation, COOLWARM,
    PALETTE,
};
use crate::charts::ChartKind;
use crate::data::derive::{
    bucketed_coordinates, decimal_year, price_bucket_index, priced_review_months,
    PRICE_BUCKET_LABELS,
};
use crate::data::{ListingTable, LoaderError};
use crate::stats::{Kde, StatsCalculator};
use chrono::NaiveDate;
use egui::Color32;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;
use thiserror::Error;

/// Upper view limit on price axes.
pub const PRICE_VIEW_LIMIT: f64 = 600.0;

const BAR_WIDTH: f64 = 0.8;
const ERROR_BAR_COLOR: Color32 = Color32::from_rgb(60, 60, 60);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Data(#[from] LoaderError),
    #[error("Nothing to plot for \"{0}\"")]
    Empty(&'static str),
}

/// Builds figures from the listing table.
pub struct FigureBuilder;

impl FigureBuilder {
    pub fn build(kind: ChartKind, table: &ListingTable) -> Result<Figure, ChartError> {
        let figure = match kind {
            ChartKind::CorrelationMatrix => Self::correlation_matrix(table)?,
            ChartKind::RoomTypePricePie => Self::room_type_price_pie(table)?,
            ChartKind::AveragePriceByGroup => Self::average_price_by_group(table)?,
            ChartKind::RoomTypeCounts => Self::room_type_counts(table)?,
            ChartKind::GroupCounts => Self::group_counts(table)?,
            ChartKind::GroupDensity => Self::group_density(table)?,
            ChartKind::GroupPriceByRoomType => Self::group_price_by_room_type(table)?,
            ChartKind::PriceViolinByRoomType => Self::price_violin(table)?,
            ChartKind::PriceScatterByGroup => Self::price_scatter_by_group(table)?,
            ChartKind::PriceByCoordinates => Self::price_by_coordinates(table)?,
            ChartKind::PriceTrendByRoomType => Self::price_trend(table)?,
            ChartKind::PriceHistogram => Self::price_histogram(table)?,
            ChartKind::PriceDensity => Self::price_density(table)?,
        };

        if figure.is_empty() {
            return Err(ChartError::Empty(kind.label()));
        }
        Ok(figure)
    }

    /// Annotated heatmap of pairwise correlations between numeric columns.
    fn correlation_matrix(table: &ListingTable) -> Result<Figure, ChartError> {
        let names = table.numeric_columns();
        let columns = names
            .iter()
            .map(|name| table.f64_values(name))
            .collect::<Result<Vec<_>, _>>()?;
        let matrix = StatsCalculator::correlation_matrix(&columns);

        let finite = matrix.iter().flatten().copied().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let span = if hi > lo { hi - lo } else { 1.0 };

        // First row drawn at the top.
        let k = names.len();
        let mut y_names = names.clone();
        y_names.reverse();

        let mut figure = Figure::new("")
            .x_axis(Axis::Categories(names))
            .y_axis(Axis::Categories(y_names))
            .equal_aspect();

        for (i, row) in matrix.iter().enumerate() {
            let y = (k - 1 - i) as f64;
            for (j, &r) in row.iter().enumerate() {
                let x = j as f64;
                let fill = if r.is_finite() {
                    heat_color((r - lo) / span)
                } else {
                    Color32::from_gray(220)
                };
                figure.push(Mark::Area {
                    name: None,
                    fill,
                    stroke: fill,
                    outline: vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ],
                });
                if r.is_finite() {
                    figure.push(Mark::Label {
                        position: [x, y],
                        text: format_significant(r, 2),
                        color: contrast_text(fill),
                    });
                }
            }
        }

        Ok(figure)
    }

    /// Share of the summed price per room type.
    fn room_type_price_pie(table: &ListingTable) -> Result<Figure, ChartError> {
        let sums = table.group_sum("room_type", "price")?;
        let total: f64 = sums.iter().map(|(_, v)| v.max(0.0)).sum();

        let mut figure = Figure::new("Room Type - Price")
            .x_axis(Axis::Hidden)
            .y_axis(Axis::Hidden)
            .equal_aspect();
        if total <= 0.0 {
            return Ok(figure);
        }

        let mut start = 0.0;
        for (i, (room_type, value)) in sums.iter().enumerate() {
            let share = value.max(0.0) / total;
            if share <= 0.0 {
                continue;
            }
            let sweep = share * TAU;
            let color = series_color(i);

            for (n, outline) in Self::wedge_pieces(start, sweep).into_iter().enumerate() {
                figure.push(Mark::Area {
                    name: (n == 0).then(|| room_type.clone()),
                    fill: color,
                    stroke: Color32::WHITE,
                    outline,
                });
            }

            let mid = start + sweep / 2.0;
            figure.push(Mark::Label {
                position: [0.6 * mid.cos(), 0.6 * mid.sin()],
                text: format!("{:.2}%", share * 100.0),
                color: Color32::BLACK,
            });
            figure.push(Mark::Label {
                position: [1.15 * mid.cos(), 1.15 * mid.sin()],
                text: room_type.clone(),
                color: Color32::BLACK,
            });

            start += sweep;
        }

        Ok(figure)
    }

    /// Unit-circle wedge split into pieces of at most a quarter turn, so
    /// every piece is convex.
    fn wedge_pieces(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
        const STEPS_PER_TURN: f64 = 128.0;
        let pieces = (sweep / (TAU / 4.0)).ceil().max(1.0) as usize;
        let piece_sweep = sweep / pieces as f64;

        (0..pieces)
            .map(|p| {
                let a0 = start + p as f64 * piece_sweep;
                let steps = ((piece_sweep / TAU) * STEPS_PER_TURN).ceil().max(2.0) as usize;
                let mut outline = vec![[0.0, 0.0]];
                outline.extend((0..=steps).map(|s| {
                    let a = a0 + piece_sweep * s as f64 / steps as f64;
                    [a.cos(), a.sin()]
                }));
                outline
            })
            .collect()
    }

    /// Bars at each group mean with confidence interval whiskers.
    fn mean_bars(figure: &mut Figure, groups: &[(String, Vec<f64>)]) {
        let mut bars = Vec::new();
        let mut whiskers = Vec::new();

        for (i, (_, values)) in groups.iter().enumerate() {
            let Some(est) = StatsCalculator::mean_with_ci(values) else {
                continue;
            };
            let x = i as f64;
            bars.push(BarSpec {
                position: x,
                value: est.mean,
                width: BAR_WIDTH,
                color: series_color(i),
            });
            if est.count > 1 {
                whiskers.push([[x, est.ci_low], [x, est.ci_high]]);
            }
        }

        if !bars.is_empty() {
            figure.push(Mark::Bars {
                name: None,
                orientation: Orientation::Vertical,
                bars,
            });
        }
        if !whiskers.is_empty() {
            figure.push(Mark::Segments {
                color: ERROR_BAR_COLOR,
                width: 2.0,
                segments: whiskers,
            });
        }
    }

    fn average_price_by_group(table: &ListingTable) -> Result<Figure, ChartError> {
        let mut groups = table.grouped_values("neighbourhood_group", "price")?;
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        let mut figure = Figure::new("Average prices by neighbourhood")
            .labels("Neighbourhood", "Price")
            .x_axis(Axis::Categories(Self::names(&groups)));
        Self::mean_bars(&mut figure, &groups);
        Ok(figure)
    }

    /// Bars of category frequencies, most frequent first.
    fn count_bars(
        title: &str,
        counts: Vec<(String, usize)>,
        orientation: Orientation,
    ) -> Figure {
        let names: Vec<String> = counts.iter().map(|(name, _)| name.clone()).collect();
        let bars: Vec<BarSpec> = counts
            .iter()
            .enumerate()
            .map(|(i, (_, count))| BarSpec {
                position: i as f64,
                value: *count as f64,
                width: 0.5,
                color: PALETTE[0],
            })
            .collect();

        let mut figure = Figure::new(title);
        figure = match orientation {
            Orientation::Vertical => figure.x_axis(Axis::Categories(names)),
            Orientation::Horizontal => figure.y_axis(Axis::Categories(names)),
        };
        if !bars.is_empty() {
            figure.push(Mark::Bars {
                name: None,
                orientation,
                bars,
            });
        }
        figure
    }

    fn room_type_counts(table: &ListingTable) -> Result<Figure, ChartError> {
        let counts = table.value_counts("room_type")?;
        Ok(Self::count_bars(
            "Amount of Room Types",
            counts,
            Orientation::Horizontal,
        ))
    }

    fn group_counts(table: &ListingTable) -> Result<Figure, ChartError> {
        let counts = table.value_counts("neighbourhood_group")?;
        Ok(Self::count_bars(
            "Neighbourhood Groups",
            counts,
            Orientation::Vertical,
        ))
    }

    /// Mean row position per neighbourhood group.
    fn group_density(table: &ListingTable) -> Result<Figure, ChartError> {
        let groups = table.grouped_row_index("neighbourhood_group")?;

        let mut figure = Figure::new("Neighbourhood Density")
            .labels("Neighbourhood Groups", "")
            .x_axis(Axis::Categories(Self::names(&groups)));
        Self::mean_bars(&mut figure, &groups);
        Ok(figure)
    }

    /// Mean price per neighbourhood group, one bar per room type.
    fn group_price_by_room_type(table: &ListingTable) -> Result<Figure, ChartError> {
        let groups = table.categories_in_order("neighbourhood_group")?;
        let room_types = table.categories_in_order("room_type")?;
        let group_col = table.str_values("neighbourhood_group")?;
        let room_col = table.str_values("room_type")?;
        let prices = table.f64_values("price")?;

        let mut cells: HashMap<(usize, usize), Vec<f64>> = HashMap::new();
        for ((group, room), price) in group_col.iter().zip(&room_col).zip(&prices) {
            let (Some(group), Some(room), Some(price)) = (group, room, price) else {
                continue;
            };
            let gi = groups.iter().position(|g| g == group);
            let ri = room_types.iter().position(|r| r == room);
            if let (Some(gi), Some(ri)) = (gi, ri) {
                cells.entry((gi, ri)).or_default().push(*price);
            }
        }

        let mut figure = Figure::new("N-GROUP - PRICE - ROOM-TYPE")
            .labels("Neighbourhood Groups", "Price")
            .x_axis(Axis::Categories(groups.clone()));

        let width = BAR_WIDTH / room_types.len().max(1) as f64;
        let mut whiskers = Vec::new();

        for (ri, room) in room_types.iter().enumerate() {
            let offset = -BAR_WIDTH / 2.0 + width * (ri as f64 + 0.5);
            let mut bars = Vec::new();

            for gi in 0..groups.len() {
                let Some(est) = cells
                    .get(&(gi, ri))
                    .and_then(|values| StatsCalculator::mean_with_ci(values))
                else {
                    continue;
                };
                let x = gi as f64 + offset;
                bars.push(BarSpec {
                    position: x,
                    value: est.mean,
                    width,
                    color: series_color(ri),
                });
                if est.count > 1 {
                    whiskers.push([[x, est.ci_low], [x, est.ci_high]]);
                }
            }

            if !bars.is_empty() {
                figure.push(Mark::Bars {
                    name: Some(room.clone()),
                    orientation: Orientation::Vertical,
                    bars,
                });
            }
        }

        if !whiskers.is_empty() {
            figure.push(Mark::Segments {
                color: ERROR_BAR_COLOR,
                width: 2.0,
                segments: whiskers,
            });
        }

        Ok(figure)
    }

    /// Mirrored price densities per room type with an inner quartile box.
    fn price_violin(table: &ListingTable) -> Result<Figure, ChartError> {
        const HALF_WIDTH: f64 = 0.4;
        const CUT: f64 = 2.0;
        const GRIDSIZE: usize = 100;

        let groups = table.grouped_values("room_type", "price")?;
        let curves: Vec<Option<Vec<[f64; 2]>>> = groups
            .iter()
            .map(|(_, values)| Kde::new(values).map(|kde| kde.curve(CUT, GRIDSIZE)))
            .collect();
        let peak = curves
            .iter()
            .flatten()
            .flatten()
            .map(|p| p[1])
            .fold(0.0, f64::max);

        let mut figure = Figure::new("Distribution of Prices by Room Type")
            .labels("Room Type", "Price")
            .x_axis(Axis::Categories(Self::names(&groups)))
            .y_limits(0.0, PRICE_VIEW_LIMIT);

        let mut boxes = Vec::new();
        let mut whiskers = Vec::new();
        let mut medians = Vec::new();

        for (i, ((_, values), curve)) in groups.iter().zip(&curves).enumerate() {
            let x = i as f64;
            if let (Some(curve), true) = (curve, peak > 0.0) {
                let color = series_color(i);
                figure.push(Mark::Band {
                    name: None,
                    fill: color,
                    stroke: color,
                    orientation: Orientation::Horizontal,
                    samples: curve
                        .iter()
                        .map(|&[y, d]| {
                            let half = HALF_WIDTH * d / peak;
                            [y, x - half, x + half]
                        })
                        .collect(),
                });
            }

            if let Some([q1, median, q3]) = StatsCalculator::quartiles(values) {
                let reach = 1.5 * (q3 - q1);
                let low = values
                    .iter()
                    .copied()
                    .filter(|&v| v >= q1 - reach)
                    .fold(f64::INFINITY, f64::min);
                let high = values
                    .iter()
                    .copied()
                    .filter(|&v| v <= q3 + reach)
                    .fold(f64::NEG_INFINITY, f64::max);
                whiskers.push([[x, low], [x, high]]);
                boxes.push([[x, q1], [x, q3]]);
                medians.push([x, median]);
            }
        }

        if !whiskers.is_empty() {
            figure.push(Mark::Segments {
                color: ERROR_BAR_COLOR,
                width: 1.5,
                segments: whiskers,
            });
            figure.push(Mark::Segments {
                color: ERROR_BAR_COLOR,
                width: 6.0,
                segments: boxes,
            });
            figure.push(Mark::Points {
                name: None,
                color: Color32::WHITE,
                radius: 3.0,
                points: medians,
            });
        }

        Ok(figure)
    }

    /// Every price at its neighbourhood group's category position.
    fn price_scatter_by_group(table: &ListingTable) -> Result<Figure, ChartError> {
        let groups = table.grouped_values("neighbourhood_group", "price")?;

        let points: Vec<[f64; 2]> = groups
            .iter()
            .enumerate()
            .flat_map(|(i, (_, values))| values.iter().map(move |&v| [i as f64, v]))
            .collect();

        let mut figure = Figure::new("Price distribution by Neighborhood Group")
            .labels("Neighbourhood Groups", "Price")
            .x_axis(Axis::Categories(Self::names(&groups)));
        if !points.is_empty() {
            figure.push(Mark::Points {
                name: None,
                color: PALETTE[0],
                radius: 2.5,
                points,
            });
        }
        Ok(figure)
    }

    /// Listing locations colored by price bucket.
    fn price_by_coordinates(table: &ListingTable) -> Result<Figure, ChartError> {
        let mut by_bucket: Vec<Vec<[f64; 2]>> = vec![Vec::new(); PRICE_BUCKET_LABELS.len()];
        for point in bucketed_coordinates(table)? {
            if let Some(idx) = price_bucket_index(point.bucket) {
                by_bucket[idx].push([point.longitude, point.latitude]);
            }
        }

        let mut figure = Figure::new("Prices by coordinates").labels("Longitude", "Latitude");
        for (idx, points) in by_bucket.into_iter().enumerate() {
            if points.is_empty() {
                continue;
            }
            figure.push(Mark::Points {
                name: Some(PRICE_BUCKET_LABELS[idx].to_string()),
                color: COOLWARM[idx],
                radius: 1.5,
                points,
            });
        }
        Ok(figure)
    }

    /// Monthly mean price per room type over the review dates.
    fn price_trend(table: &ListingTable) -> Result<Figure, ChartError> {
        let mut monthly: BTreeMap<String, BTreeMap<NaiveDate, (f64, usize)>> = BTreeMap::new();
        for (room, month, price) in priced_review_months(table)? {
            let cell = monthly.entry(room).or_default().entry(month).or_insert((0.0, 0));
            cell.0 += price;
            cell.1 += 1;
        }

        let mut figure = Figure::new("Change of prices over the years according to room type")
            .labels("Year", "Price")
            .x_axis(Axis::Years);

        for (i, (room, months)) in monthly.into_iter().enumerate() {
            let points: Vec<[f64; 2]> = months
                .into_iter()
                .map(|(month, (sum, n))| [decimal_year(month), sum / n as f64])
                .collect();
            figure.push(Mark::Line {
                name: Some(room),
                color: series_color(i),
                width: 2.0,
                points,
            });
        }

        Ok(figure)
    }

    fn prices(table: &ListingTable) -> Result<Vec<f64>, ChartError> {
        Ok(table.f64_values("price")?.into_iter().flatten().collect())
    }

    /// Price histogram with a density curve scaled to counts.
    fn price_histogram(table: &ListingTable) -> Result<Figure, ChartError> {
        let prices = Self::prices(table)?;
        let edges = StatsCalculator::auto_bin_edges(&prices);
        let counts = StatsCalculator::histogram_counts(&prices, &edges);

        let mut figure = Figure::new("")
            .labels("Price", "Count")
            .x_limits(0.0, PRICE_VIEW_LIMIT);

        let bars: Vec<BarSpec> = edges
            .windows(2)
            .zip(&counts)
            .map(|(edge, &count)| BarSpec {
                position: (edge[0] + edge[1]) / 2.0,
                value: count as f64,
                width: edge[1] - edge[0],
                color: PALETTE[0],
            })
            .collect();
        if bars.is_empty() {
            return Ok(figure);
        }
        let bin_width = bars[0].width;
        figure.push(Mark::Bars {
            name: None,
            orientation: Orientation::Vertical,
            bars,
        });

        if let Some(kde) = Kde::new(&prices) {
            let scale = prices.len() as f64 * bin_width;
            figure.push(Mark::Line {
                name: None,
                color: PALETTE[0],
                width: 2.0,
                points: kde
                    .curve(0.0, 200)
                    .into_iter()
                    .map(|[x, d]| [x, d * scale])
                    .collect(),
            });
        }

        Ok(figure)
    }

    /// Filled price density estimate.
    fn price_density(table: &ListingTable) -> Result<Figure, ChartError> {
        let prices = Self::prices(table)?;

        let mut figure = Figure::new("")
            .labels("Price", "Density")
            .x_limits(0.0, PRICE_VIEW_LIMIT);

        if let Some(kde) = Kde::new(&prices) {
            let color = PALETTE[0];
            figure.push(Mark::Band {
                name: None,
                fill: color.gamma_multiply(0.3),
                stroke: color,
                orientation: Orientation::Vertical,
                samples: kde
                    .curve(3.0, 200)
                    .into_iter()
                    .map(|[x, d]| [x, 0.0, d])
                    .collect(),
            });
        }

        Ok(figure)
    }

    fn names(groups: &[(String, Vec<f64>)]) -> Vec<String> {
        groups.iter().map(|(name, _)| name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_table;

    fn build(kind: ChartKind) -> Figure {
        FigureBuilder::build(kind, &sample_table()).unwrap()
    }

    #[test]
    fn test_every_selection_builds() {
        let table = sample_table();
        for kind in ChartKind::ALL {
            let figure = FigureBuilder::build(kind, &table)
                .unwrap_or_else(|e| panic!("{kind} failed: {e}"));
            assert!(!figure.is_empty(), "{kind} produced no marks");
        }
    }

    #[test]
    fn test_correlation_matrix_is_square() {
        let figure = build(ChartKind::CorrelationMatrix);
        let Axis::Categories(names) = &figure.x_axis else {
            panic!("expected categorical x axis");
        };
        assert_eq!(names.len(), 10);
        let cells = figure
            .marks
            .iter()
            .filter(|m| matches!(m, Mark::Area { .. }))
            .count();
        assert_eq!(cells, 100);

        // The diagonal is annotated with 1.
        let ones = figure
            .marks
            .iter()
            .filter(|m| matches!(m, Mark::Label { text, .. } if text == "1"))
            .count();
        assert!(ones >= 10);
    }

    #[test]
    fn test_pie_shares_add_up() {
        let figure = build(ChartKind::RoomTypePricePie);
        let shares: f64 = figure
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Label { text, .. } => text.strip_suffix('%')?.parse::<f64>().ok(),
                _ => None,
            })
            .sum();
        assert!((shares - 100.0).abs() < 0.05);

        let legend: Vec<&str> = figure.marks.iter().filter_map(Mark::name).collect();
        assert_eq!(legend, ["Entire home/apt", "Private room", "Shared room"]);
    }

    #[test]
    fn test_wedge_pieces_are_quarter_turns_at_most() {
        let pieces = FigureBuilder::wedge_pieces(0.0, TAU * 0.6);
        assert_eq!(pieces.len(), 3);
        for piece in &pieces {
            assert_eq!(piece[0], [0.0, 0.0]);
        }
    }

    #[test]
    fn test_average_price_bars_sorted_by_group() {
        let figure = build(ChartKind::AveragePriceByGroup);
        assert_eq!(
            figure.x_axis,
            Axis::Categories(vec![
                "Bronx".into(),
                "Brooklyn".into(),
                "Manhattan".into(),
                "Queens".into(),
                "Staten Island".into(),
            ])
        );
        let Some(Mark::Bars { bars, .. }) = figure.marks.first() else {
            panic!("expected bars first");
        };
        // Bronx: 45 and 99.
        assert_eq!(bars[0].value, 72.0);
        // Staten Island: single listing.
        assert_eq!(bars[4].value, 450.0);
    }

    #[test]
    fn test_room_type_counts_horizontal_descending() {
        let figure = build(ChartKind::RoomTypeCounts);
        let Some(Mark::Bars {
            orientation, bars, ..
        }) = figure.marks.first()
        else {
            panic!("expected bars");
        };
        assert_eq!(*orientation, Orientation::Horizontal);
        let values: Vec<f64> = bars.iter().map(|b| b.value).collect();
        assert_eq!(values, [21.0, 16.0, 3.0]);
    }

    #[test]
    fn test_group_counts_order() {
        let figure = build(ChartKind::GroupCounts);
        assert_eq!(
            figure.x_axis,
            Axis::Categories(vec![
                "Manhattan".into(),
                "Brooklyn".into(),
                "Queens".into(),
                "Bronx".into(),
                "Staten Island".into(),
            ])
        );
    }

    #[test]
    fn test_grouped_bars_one_series_per_room_type() {
        let figure = build(ChartKind::GroupPriceByRoomType);
        let series: Vec<&str> = figure
            .marks
            .iter()
            .filter(|m| matches!(m, Mark::Bars { .. }))
            .filter_map(Mark::name)
            .collect();
        assert_eq!(series, ["Private room", "Entire home/apt", "Shared room"]);
    }

    #[test]
    fn test_price_views_are_limited() {
        assert_eq!(
            build(ChartKind::PriceViolinByRoomType).y_limits,
            Some((0.0, PRICE_VIEW_LIMIT))
        );
        assert_eq!(
            build(ChartKind::PriceHistogram).x_limits,
            Some((0.0, PRICE_VIEW_LIMIT))
        );
        assert_eq!(
            build(ChartKind::PriceDensity).x_limits,
            Some((0.0, PRICE_VIEW_LIMIT))
        );
    }

    #[test]
    fn test_coordinates_legend_follows_bucket_order() {
        let figure = build(ChartKind::PriceByCoordinates);
        let legend: Vec<&str> = figure.marks.iter().filter_map(Mark::name).collect();
        assert_eq!(legend, ["0-100", "100-200", "200-300", "400-500", "500+"]);
    }

    #[test]
    fn test_trend_lines_sorted_by_room_type() {
        let figure = build(ChartKind::PriceTrendByRoomType);
        assert_eq!(figure.x_axis, Axis::Years);
        let legend: Vec<&str> = figure.marks.iter().filter_map(Mark::name).collect();
        assert_eq!(legend, ["Entire home/apt", "Private room", "Shared room"]);

        for mark in &figure.marks {
            if let Mark::Line { points, .. } = mark {
                assert!(points.windows(2).all(|w| w[0][0] < w[1][0]));
            }
        }
    }

    #[test]
    fn test_histogram_counts_every_price() {
        let figure = build(ChartKind::PriceHistogram);
        let Some(Mark::Bars { bars, .. }) = figure.marks.first() else {
            panic!("expected histogram bars");
        };
        let total: f64 = bars.iter().map(|b| b.value).sum();
        assert_eq!(total, 40.0);
    }

    fn segments_of_width(figure: &Figure, wanted: f32) -> Vec<[[f64; 2]; 2]> {
        figure
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Segments {
                    width, segments, ..
                } if *width == wanted => Some(segments.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_single_listing_group_has_no_whisker() {
        let figure = build(ChartKind::AveragePriceByGroup);
        // Staten Island has one listing.
        let whiskers = segments_of_width(&figure, 2.0);
        assert_eq!(whiskers.len(), 4);
        assert!(whiskers.iter().all(|[a, _]| a[0] != 4.0));
    }

    #[test]
    fn test_group_density_is_mean_row_index() {
        let figure = build(ChartKind::GroupDensity);
        let Some(Mark::Bars { bars, .. }) = figure.marks.first() else {
            panic!("expected bars first");
        };
        // Bronx rows 34 and 35, Staten Island row 39.
        assert_eq!(bars[3].value, 34.5);
        assert_eq!(bars[4].value, 39.0);
    }

    #[test]
    fn test_violin_box_and_whiskers() {
        let figure = build(ChartKind::PriceViolinByRoomType);
        let whiskers = segments_of_width(&figure, 1.5);
        let boxes = segments_of_width(&figure, 6.0);
        assert_eq!(whiskers.len(), 3);
        assert_eq!(boxes.len(), 3);

        // Entire home/apt: quartiles 114.75 / 192.5, the 675 outlier is past
        // 1.5 IQR so the whisker stops at 225.
        assert!((boxes[1][0][1] - 114.75).abs() < 1e-9);
        assert!((boxes[1][1][1] - 192.5).abs() < 1e-9);
        assert_eq!(whiskers[1], [[1.0, 80.0], [1.0, 225.0]]);

        // Shared room: prices 40, 40, 110.
        assert_eq!(boxes[2], [[2.0, 40.0], [2.0, 75.0]]);
        assert_eq!(whiskers[2], [[2.0, 40.0], [2.0, 110.0]]);

        let medians = figure
            .marks
            .iter()
            .find_map(|m| match m {
                Mark::Points { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(medians[1], [1.0, 145.0]);
        assert_eq!(medians[2], [2.0, 40.0]);
    }

    #[test]
    fn test_trend_monthly_means() {
        let figure = build(ChartKind::PriceTrendByRoomType);
        let shared = figure
            .marks
            .iter()
            .find_map(|m| match m {
                Mark::Line {
                    name: Some(name),
                    points,
                    ..
                } if name == "Shared room" => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        // January 2019: 40; July 2019: 110 and 40.
        let means: Vec<f64> = shared.iter().map(|p| p[1]).collect();
        assert_eq!(means, [40.0, 75.0]);
        assert!(shared[0][0] >= 2019.0 && shared[1][0] < 2020.0);
    }

    #[test]
    fn test_histogram_density_stays_in_data_range() {
        let figure = build(ChartKind::PriceHistogram);
        let curve = figure
            .marks
            .iter()
            .find_map(|m| match m {
                Mark::Line { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert!((curve[0][0] - 40.0).abs() < 1e-9);
        assert!((curve[curve.len() - 1][0] - 675.0).abs() < 1e-6);
    }
}
