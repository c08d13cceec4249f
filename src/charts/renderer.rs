//! Static Chart Renderer
//! Exports a `Figure` to PNG with plotters, for the "Save figure" action.

use crate::charts::figure::{format_tick, Axis, Figure, Mark, Orientation};
use egui::Color32;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

const MARGIN: u32 = 20;
const LABEL_AREA: u32 = 70;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgba(color: Color32) -> RGBAColor {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    RGBAColor(r, g, b, a as f64 / 255.0)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `figure` to a PNG file.
    pub fn render_png(
        figure: &Figure,
        path: &Path,
        width: u32,
        height: u32,
        font_size: f32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        Self::draw(&root, figure, font_size)?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Render `figure` into an RGB pixel buffer.
    #[cfg(test)]
    fn render_rgb(
        figure: &Figure,
        width: u32,
        height: u32,
        font_size: f32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, figure, font_size)?;
            root.present().map_err(draw_err)?;
        }
        Ok(buffer)
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &Figure,
        font_size: f32,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_err)?;

        let font = FontDesc::new(FontFamily::SansSerif, font_size as f64, FontStyle::Normal);
        let small = FontDesc::new(
            FontFamily::SansSerif,
            (font_size * 0.7) as f64,
            FontStyle::Normal,
        );
        let show_axes = figure.x_axis != Axis::Hidden || figure.y_axis != Axis::Hidden;
        let has_title = !figure.title.is_empty();

        let full = figure.bounds();
        let mut bounds = (full.min, full.max);
        if figure.equal_aspect {
            let (w, h) = root.dim_in_pixel();
            let label_area = if show_axes { LABEL_AREA } else { 0 };
            let caption = if has_title { font_size as u32 * 2 } else { 0 };
            let plot_w = w.saturating_sub(2 * MARGIN + label_area).max(1) as f64;
            let plot_h = h.saturating_sub(2 * MARGIN + label_area + caption).max(1) as f64;
            bounds = Self::equalize(bounds.0, bounds.1, plot_w / plot_h);
        }

        let mut builder = ChartBuilder::on(root);
        builder.margin(MARGIN);
        if has_title {
            builder.caption(&figure.title, font.clone());
        }
        if show_axes {
            builder
                .x_label_area_size(LABEL_AREA)
                .y_label_area_size(LABEL_AREA);
        }
        let mut chart = builder
            .build_cartesian_2d(bounds.0[0]..bounds.1[0], bounds.0[1]..bounds.1[1])
            .map_err(draw_err)?;

        if show_axes {
            let x_fmt = |v: &f64| format_tick(&figure.x_axis, *v);
            let y_fmt = |v: &f64| format_tick(&figure.y_axis, *v);
            let mut mesh = chart.configure_mesh();
            mesh.x_desc(figure.x_label.as_str())
                .y_desc(figure.y_label.as_str())
                .x_label_formatter(&x_fmt)
                .y_label_formatter(&y_fmt)
                .label_style(small.clone())
                .axis_desc_style(small.clone());
            if let Axis::Categories(names) = &figure.x_axis {
                mesh.x_labels(names.len() + 2).disable_x_mesh();
            }
            if let Axis::Categories(names) = &figure.y_axis {
                mesh.y_labels(names.len() + 2).disable_y_mesh();
            }
            mesh.draw().map_err(draw_err)?;
        }

        for mark in &figure.marks {
            match mark {
                Mark::Bars {
                    name,
                    orientation,
                    bars,
                } => {
                    let orientation = *orientation;
                    let anno = chart
                        .draw_series(bars.iter().map(|b| {
                            let lo = b.position - b.width / 2.0;
                            let hi = b.position + b.width / 2.0;
                            let corners = match orientation {
                                Orientation::Vertical => [(lo, 0.0), (hi, b.value)],
                                Orientation::Horizontal => [(0.0, lo), (b.value, hi)],
                            };
                            Rectangle::new(corners, rgba(b.color).filled())
                        }))
                        .map_err(draw_err)?;
                    if let Some(name) = name {
                        let color = rgba(mark.color());
                        anno.label(name.as_str()).legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                        });
                    }
                }
                Mark::Segments {
                    color,
                    width,
                    segments,
                } => {
                    let style = rgba(*color).stroke_width(width.round().max(1.0) as u32);
                    chart
                        .draw_series(segments.iter().map(|[a, b]| {
                            PathElement::new(vec![(a[0], a[1]), (b[0], b[1])], style)
                        }))
                        .map_err(draw_err)?;
                }
                Mark::Line {
                    name,
                    color,
                    width,
                    points,
                } => {
                    let color = rgba(*color);
                    let anno = chart
                        .draw_series(LineSeries::new(
                            points.iter().map(|p| (p[0], p[1])),
                            color.stroke_width(width.round().max(1.0) as u32),
                        ))
                        .map_err(draw_err)?;
                    if let Some(name) = name {
                        anno.label(name.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                    }
                }
                Mark::Points {
                    name,
                    color,
                    radius,
                    points,
                } => {
                    let color = rgba(*color);
                    let size = radius.round().max(1.0) as i32;
                    let anno = chart
                        .draw_series(
                            points
                                .iter()
                                .map(|p| Circle::new((p[0], p[1]), size, color.filled())),
                        )
                        .map_err(draw_err)?;
                    if let Some(name) = name {
                        anno.label(name.as_str())
                            .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
                    }
                }
                Mark::Area {
                    name,
                    fill,
                    stroke,
                    outline,
                } => {
                    let outline: Vec<(f64, f64)> = outline.iter().map(|p| (p[0], p[1])).collect();
                    Self::draw_polygon(&mut chart, name.as_deref(), *fill, *stroke, outline)?;
                }
                Mark::Band {
                    name,
                    fill,
                    stroke,
                    orientation,
                    samples,
                } => {
                    let outline: Vec<(f64, f64)> = Mark::band_outline(*orientation, samples)
                        .into_iter()
                        .map(|p| (p[0], p[1]))
                        .collect();
                    Self::draw_polygon(&mut chart, name.as_deref(), *fill, *stroke, outline)?;
                }
                Mark::Label {
                    position,
                    text,
                    color,
                } => {
                    let style = small
                        .color(&rgba(*color))
                        .pos(Pos::new(HPos::Center, VPos::Center));
                    chart
                        .draw_series(std::iter::once(Text::new(
                            text.clone(),
                            (position[0], position[1]),
                            style,
                        )))
                        .map_err(draw_err)?;
                }
            }
        }

        if figure.has_legend() {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(small.clone())
                .draw()
                .map_err(draw_err)?;
        }

        Ok(())
    }

    fn draw_polygon<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        name: Option<&str>,
        fill: Color32,
        stroke: Color32,
        outline: Vec<(f64, f64)>,
    ) -> Result<(), RenderError> {
        let fill = rgba(fill);
        let mut closed = outline.clone();
        if let Some(first) = outline.first() {
            closed.push(*first);
        }

        let anno = chart
            .draw_series(std::iter::once(Polygon::new(outline, fill.filled())))
            .map_err(draw_err)?;
        if let Some(name) = name {
            anno.label(name).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled())
            });
        }

        chart
            .draw_series(std::iter::once(PathElement::new(
                closed,
                rgba(stroke).stroke_width(1),
            )))
            .map_err(draw_err)?;
        Ok(())
    }

    /// Grow the shorter side of a data range so one unit spans the same
    /// number of pixels on both axes.
    fn equalize(min: [f64; 2], max: [f64; 2], pixel_aspect: f64) -> ([f64; 2], [f64; 2]) {
        let (w, h) = (max[0] - min[0], max[1] - min[1]);
        let (cx, cy) = ((min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0);
        let (w, h) = if w / h < pixel_aspect {
            (h * pixel_aspect, h)
        } else {
            (w, w / pixel_aspect)
        };
        ([cx - w / 2.0, cy - h / 2.0], [cx + w / 2.0, cy + h / 2.0])
    }
}
