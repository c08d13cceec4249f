//! Chart Plotter Module
//! Draws a `Figure` interactively using egui_plot. Drag pans, scroll and
//! box-drag zoom, double-click resets the view.

use crate::charts::figure::{format_tick, Axis, Figure, Mark, Orientation};
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, GridInput, GridMark, Legend, Line, Plot, PlotBounds, PlotPoint, PlotPoints,
    PlotUi, Points, Polygon, Text,
};

/// Draws figures with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw `figure` filling the available space.
    ///
    /// `plot_id` should change whenever a new figure is drawn so the plot
    /// starts from a fresh view. With `apply_limits`, fixed axis limits are
    /// pushed into the view on this frame.
    pub fn draw_figure(
        ui: &mut egui::Ui,
        figure: &Figure,
        plot_id: impl std::hash::Hash,
        apply_limits: bool,
    ) {
        let x_axis = figure.x_axis.clone();
        let y_axis = figure.y_axis.clone();
        let show_x = x_axis != Axis::Hidden;
        let show_y = y_axis != Axis::Hidden;

        let mut plot = Plot::new(plot_id)
            .x_axis_label(figure.x_label.clone())
            .y_axis_label(figure.y_label.clone())
            .show_axes([show_x, show_y])
            .show_grid([show_x, show_y])
            .show_x(show_x)
            .show_y(show_y)
            .x_axis_formatter(move |mark, _range| format_tick(&x_axis, mark.value))
            .y_axis_formatter(move |mark, _range| format_tick(&y_axis, mark.value));

        if let Axis::Categories(names) = &figure.x_axis {
            let n = names.len();
            plot = plot.x_grid_spacer(move |input| Self::category_marks(n, input));
        }
        if let Axis::Categories(names) = &figure.y_axis {
            let n = names.len();
            plot = plot.y_grid_spacer(move |input| Self::category_marks(n, input));
        }
        if figure.equal_aspect {
            plot = plot.data_aspect(1.0);
        }
        if figure.has_legend() {
            plot = plot.legend(Legend::default());
        }

        let fixed_view = figure.x_limits.is_some() || figure.y_limits.is_some();

        plot.show(ui, |plot_ui| {
            if apply_limits && fixed_view {
                let bounds = figure.bounds();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(bounds.min, bounds.max));
            }
            for mark in &figure.marks {
                Self::draw_mark(plot_ui, mark);
            }
        });
    }

    /// One grid mark per category position inside the visible range.
    fn category_marks(count: usize, input: GridInput) -> Vec<GridMark> {
        let (lo, hi) = input.bounds;
        (0..count)
            .map(|i| i as f64)
            .filter(|&v| v >= lo.floor() && v <= hi.ceil())
            .map(|value| GridMark {
                value,
                step_size: 1.0,
            })
            .collect()
    }

    /// Single-pass conversion into the plot's point type.
    fn plot_points(points: &[[f64; 2]]) -> PlotPoints {
        PlotPoints::Owned(points.iter().map(|p| PlotPoint::new(p[0], p[1])).collect())
    }

    fn draw_mark(plot_ui: &mut PlotUi, mark: &Mark) {
        match mark {
            Mark::Bars {
                name,
                orientation,
                bars,
            } => {
                let elems: Vec<Bar> = bars
                    .iter()
                    .map(|b| {
                        Bar::new(b.position, b.value)
                            .width(b.width)
                            .fill(b.color)
                            .stroke(Stroke::new(1.0, b.color.gamma_multiply(0.8)))
                    })
                    .collect();
                let mut chart = BarChart::new(elems).color(mark.color());
                if *orientation == Orientation::Horizontal {
                    chart = chart.horizontal();
                }
                if let Some(name) = name {
                    chart = chart.name(name);
                }
                plot_ui.bar_chart(chart);
            }
            Mark::Segments {
                color,
                width,
                segments,
            } => {
                for segment in segments {
                    plot_ui.line(
                        Line::new(Self::plot_points(segment))
                            .color(*color)
                            .width(*width),
                    );
                }
            }
            Mark::Line {
                name,
                color,
                width,
                points,
            } => {
                let mut line = Line::new(Self::plot_points(points))
                    .color(*color)
                    .width(*width);
                if let Some(name) = name {
                    line = line.name(name);
                }
                plot_ui.line(line);
            }
            Mark::Points {
                name,
                color,
                radius,
                points,
            } => {
                let mut series = Points::new(Self::plot_points(points))
                    .radius(*radius)
                    .color(*color);
                if let Some(name) = name {
                    series = series.name(name);
                }
                plot_ui.points(series);
            }
            Mark::Area {
                name,
                fill,
                stroke,
                outline,
            } => {
                let mut polygon = Polygon::new(Self::plot_points(outline))
                    .fill_color(*fill)
                    .stroke(Stroke::new(1.0, *stroke));
                if let Some(name) = name {
                    polygon = polygon.name(name);
                }
                plot_ui.polygon(polygon);
            }
            Mark::Band {
                name,
                fill,
                stroke,
                orientation,
                samples,
            } => Self::draw_band(plot_ui, name.as_deref(), *fill, *stroke, *orientation, samples),
            Mark::Label {
                position,
                text,
                color,
            } => {
                plot_ui.text(Text::new(
                    PlotPoint::new(position[0], position[1]),
                    RichText::new(text).color(*color),
                ));
            }
        }
    }

    /// egui only fills convex polygons, so a band is drawn as a strip of
    /// trapezoids with its two curves stroked on top.
    fn draw_band(
        plot_ui: &mut PlotUi,
        name: Option<&str>,
        fill: Color32,
        stroke: Color32,
        orientation: Orientation,
        samples: &[[f64; 3]],
    ) {
        let place = |pos: f64, v: f64| match orientation {
            Orientation::Vertical => [pos, v],
            Orientation::Horizontal => [v, pos],
        };

        for pair in samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let quad = vec![
                place(a[0], a[1]),
                place(b[0], b[1]),
                place(b[0], b[2]),
                place(a[0], a[2]),
            ];
            let mut polygon = Polygon::new(PlotPoints::from(quad))
                .fill_color(fill)
                .stroke(Stroke::NONE);
            if let Some(name) = name {
                polygon = polygon.name(name);
            }
            plot_ui.polygon(polygon);
        }

        let upper: Vec<[f64; 2]> = samples.iter().map(|s| place(s[0], s[2])).collect();
        let lower: Vec<[f64; 2]> = samples.iter().map(|s| place(s[0], s[1])).collect();
        plot_ui.line(Line::new(PlotPoints::from(upper)).color(stroke).width(1.5));
        plot_ui.line(Line::new(PlotPoints::from(lower)).color(stroke).width(1.5));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, FigureBuilder};
    use crate::data::sample_table;

    #[test]
    fn test_every_selection_draws_headless() {
        let table = sample_table();
        let ctx = egui::Context::default();

        for (generation, kind) in ChartKind::ALL.into_iter().enumerate() {
            let figure = FigureBuilder::build(kind, &table).unwrap();
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ChartPlotter::draw_figure(ui, &figure, ("chart", generation), true);
                });
            });
        }
    }

    #[test]
    fn test_plot_points_keep_order() {
        let converted = ChartPlotter::plot_points(&[[1.0, 2.0], [3.0, 4.0]]);
        let xy: Vec<[f64; 2]> = converted.points().iter().map(|p| [p.x, p.y]).collect();
        assert_eq!(xy, [[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_category_marks_inside_range() {
        let input = GridInput {
            bounds: (-0.5, 2.5),
            base_step_size: 0.1,
        };
        let values: Vec<f64> = ChartPlotter::category_marks(5, input)
            .iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(values, [0.0, 1.0, 2.0, 3.0]);
    }
}
