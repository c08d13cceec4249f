//! Figure Model
//! Backend-neutral description of one chart. The builder produces it, the
//! egui plotter draws it interactively and the static renderer exports it.

use egui::Color32;

/// Categorical palette (seaborn "deep").
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(76, 114, 176),  // Blue
    Color32::from_rgb(221, 132, 82),  // Orange
    Color32::from_rgb(85, 168, 104),  // Green
    Color32::from_rgb(196, 78, 82),   // Red
    Color32::from_rgb(129, 114, 179), // Purple
    Color32::from_rgb(147, 120, 96),  // Brown
    Color32::from_rgb(218, 139, 195), // Pink
    Color32::from_rgb(140, 140, 140), // Grey
    Color32::from_rgb(204, 185, 116), // Olive
    Color32::from_rgb(100, 181, 205), // Cyan
];

/// Six-step diverging palette for the price buckets.
pub const COOLWARM: [Color32; 6] = [
    Color32::from_rgb(90, 120, 226),
    Color32::from_rgb(144, 178, 254),
    Color32::from_rgb(196, 213, 243),
    Color32::from_rgb(242, 203, 183),
    Color32::from_rgb(246, 152, 120),
    Color32::from_rgb(218, 88, 71),
];

/// Stops of the sequential heatmap colormap, dark to light.
const HEAT_STOPS: [(u8, u8, u8); 6] = [
    (3, 5, 26),
    (76, 29, 75),
    (161, 26, 91),
    (232, 63, 63),
    (246, 164, 126),
    (250, 235, 221),
];

/// Palette color for the i-th series.
pub fn series_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Sample the heatmap colormap at `t` in [0, 1].
pub fn heat_color(t: f64) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (HEAT_STOPS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(HEAT_STOPS.len() - 2);
    let frac = scaled - lo as f64;
    let (a, b) = (HEAT_STOPS[lo], HEAT_STOPS[lo + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    Color32::from_rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Readable text color on top of `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luminance = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luminance > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// How an axis labels its ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    Numeric,
    /// Category names placed at integer positions 0, 1, 2, ...
    Categories(Vec<String>),
    /// Fractional years, labelled `2019` or `2019-07`.
    Years,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One bar: `position` on the category axis, `value` along the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpec {
    pub position: f64,
    pub value: f64,
    pub width: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Bars {
        name: Option<String>,
        orientation: Orientation,
        bars: Vec<BarSpec>,
    },
    /// Independent line segments, used for error bars.
    Segments {
        color: Color32,
        width: f32,
        segments: Vec<[[f64; 2]; 2]>,
    },
    Line {
        name: Option<String>,
        color: Color32,
        width: f32,
        points: Vec<[f64; 2]>,
    },
    Points {
        name: Option<String>,
        color: Color32,
        radius: f32,
        points: Vec<[f64; 2]>,
    },
    /// Closed convex outline, filled.
    Area {
        name: Option<String>,
        fill: Color32,
        stroke: Color32,
        outline: Vec<[f64; 2]>,
    },
    /// Filled region between two curves sampled at the same positions.
    /// Each sample is `[position, low, high]`; with `Vertical` the position
    /// runs along x, with `Horizontal` along y.
    Band {
        name: Option<String>,
        fill: Color32,
        stroke: Color32,
        orientation: Orientation,
        samples: Vec<[f64; 3]>,
    },
    Label {
        position: [f64; 2],
        text: String,
        color: Color32,
    },
}

impl Mark {
    /// Legend entry, if the mark has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Mark::Bars { name, .. }
            | Mark::Line { name, .. }
            | Mark::Points { name, .. }
            | Mark::Area { name, .. }
            | Mark::Band { name, .. } => name.as_deref(),
            Mark::Segments { .. } | Mark::Label { .. } => None,
        }
    }

    /// Representative color, used for legend swatches.
    pub fn color(&self) -> Color32 {
        match self {
            Mark::Bars { bars, .. } => bars.first().map(|b| b.color).unwrap_or(PALETTE[0]),
            Mark::Segments { color, .. }
            | Mark::Line { color, .. }
            | Mark::Points { color, .. }
            | Mark::Label { color, .. } => *color,
            Mark::Area { fill, .. } | Mark::Band { fill, .. } => *fill,
        }
    }

    /// Data-space points the mark occupies.
    fn extent_points(&self) -> Vec<[f64; 2]> {
        match self {
            Mark::Bars {
                orientation, bars, ..
            } => bars
                .iter()
                .flat_map(|b| {
                    let lo = b.position - b.width / 2.0;
                    let hi = b.position + b.width / 2.0;
                    match orientation {
                        Orientation::Vertical => [[lo, 0.0], [hi, b.value]],
                        Orientation::Horizontal => [[0.0, lo], [b.value, hi]],
                    }
                })
                .collect(),
            Mark::Segments { segments, .. } => segments.iter().flatten().copied().collect(),
            Mark::Line { points, .. } | Mark::Points { points, .. } => points.clone(),
            Mark::Area { outline, .. } => outline.clone(),
            Mark::Band {
                orientation,
                samples,
                ..
            } => Self::band_outline(*orientation, samples),
            Mark::Label { position, .. } => vec![*position],
        }
    }

    /// Upper curve followed by the reversed lower curve, in data space.
    pub fn band_outline(orientation: Orientation, samples: &[[f64; 3]]) -> Vec<[f64; 2]> {
        let place = |pos: f64, v: f64| match orientation {
            Orientation::Vertical => [pos, v],
            Orientation::Horizontal => [v, pos],
        };
        samples
            .iter()
            .map(|s| place(s[0], s[2]))
            .chain(samples.iter().rev().map(|s| place(s[0], s[1])))
            .collect()
    }
}

/// Axis-aligned data range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Fixed x view range.
    pub x_limits: Option<(f64, f64)>,
    /// Fixed y view range.
    pub y_limits: Option<(f64, f64)>,
    pub equal_aspect: bool,
    pub marks: Vec<Mark>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            x_axis: Axis::Numeric,
            y_axis: Axis::Numeric,
            x_limits: None,
            y_limits: None,
            equal_aspect: false,
            marks: Vec::new(),
        }
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn x_axis(mut self, axis: Axis) -> Self {
        self.x_axis = axis;
        self
    }

    pub fn y_axis(mut self, axis: Axis) -> Self {
        self.y_axis = axis;
        self
    }

    pub fn x_limits(mut self, lo: f64, hi: f64) -> Self {
        self.x_limits = Some((lo, hi));
        self
    }

    pub fn y_limits(mut self, lo: f64, hi: f64) -> Self {
        self.y_limits = Some((lo, hi));
        self
    }

    pub fn equal_aspect(mut self) -> Self {
        self.equal_aspect = true;
        self
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn has_legend(&self) -> bool {
        self.marks.iter().any(|m| m.name().is_some())
    }

    /// Range covered by the marks, overridden by fixed limits and padded
    /// by 5% on free axes.
    pub fn bounds(&self) -> Bounds {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];

        for point in self.marks.iter().flat_map(Mark::extent_points) {
            for axis in 0..2 {
                if point[axis].is_finite() {
                    min[axis] = min[axis].min(point[axis]);
                    max[axis] = max[axis].max(point[axis]);
                }
            }
        }

        for axis in 0..2 {
            if !min[axis].is_finite() {
                min[axis] = 0.0;
                max[axis] = 1.0;
            } else if min[axis] == max[axis] {
                min[axis] -= 0.5;
                max[axis] += 0.5;
            } else {
                let pad = (max[axis] - min[axis]) * 0.05;
                min[axis] -= pad;
                max[axis] += pad;
            }
        }

        if let Some((lo, hi)) = self.x_limits {
            min[0] = lo;
            max[0] = hi;
        }
        if let Some((lo, hi)) = self.y_limits {
            min[1] = lo;
            max[1] = hi;
        }

        Bounds { min, max }
    }
}

/// Tick label for `value` on `axis`.
pub fn format_tick(axis: &Axis, value: f64) -> String {
    match axis {
        Axis::Numeric => {
            if value.fract().abs() < 1e-9 {
                format!("{value:.0}")
            } else {
                let s = format!("{value:.3}");
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            }
        }
        Axis::Categories(names) => {
            let idx = value.round();
            if (value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        }
        Axis::Years => {
            let year = value.floor();
            let month = ((value - year) * 12.0).round() as u32;
            if month == 0 || month == 12 {
                format!("{:.0}", value.round())
            } else {
                format!("{:.0}-{:02}", year, month + 1)
            }
        }
        Axis::Hidden => String::new(),
    }
}

/// Format with `digits` significant digits and no trailing zeros, switching
/// to exponent notation for very small or large magnitudes.
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let sci = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ticks_only_on_integers() {
        let axis = Axis::Categories(vec!["Bronx".into(), "Queens".into()]);
        assert_eq!(format_tick(&axis, 0.0), "Bronx");
        assert_eq!(format_tick(&axis, 1.0), "Queens");
        assert_eq!(format_tick(&axis, 0.5), "");
        assert_eq!(format_tick(&axis, 2.0), "");
        assert_eq!(format_tick(&axis, -1.0), "");
    }

    #[test]
    fn test_year_ticks() {
        assert_eq!(format_tick(&Axis::Years, 2019.0), "2019");
        assert_eq!(format_tick(&Axis::Years, 2019.5), "2019-07");
        assert_eq!(format_tick(&Axis::Numeric, 0.25), "0.25");
        assert_eq!(format_tick(&Axis::Numeric, 600.0), "600");
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(1.0, 2), "1");
        assert_eq!(format_significant(0.999, 2), "1");
        assert_eq!(format_significant(0.5, 2), "0.5");
        assert_eq!(format_significant(0.0123, 2), "0.012");
        assert_eq!(format_significant(-0.456, 2), "-0.46");
        assert_eq!(format_significant(0.00001234, 2), "1.2e-05");
        assert_eq!(format_significant(150.0, 2), "1.5e+02");
        assert_eq!(format_significant(0.0, 2), "0");
    }

    #[test]
    fn test_bounds_respect_limits() {
        let mut fig = Figure::new("t").x_limits(0.0, 600.0);
        fig.push(Mark::Points {
            name: None,
            color: PALETTE[0],
            radius: 2.0,
            points: vec![[10.0, 1.0], [2000.0, 3.0]],
        });

        let b = fig.bounds();
        assert_eq!((b.min[0], b.max[0]), (0.0, 600.0));
        assert!(b.min[1] < 1.0 && b.max[1] > 3.0);
    }

    #[test]
    fn test_bar_bounds_include_baseline() {
        let mut fig = Figure::new("bars");
        fig.push(Mark::Bars {
            name: None,
            orientation: Orientation::Horizontal,
            bars: vec![BarSpec {
                position: 0.0,
                value: 10.0,
                width: 0.8,
                color: PALETTE[0],
            }],
        });
        let b = fig.bounds();
        assert!(b.min[0] <= 0.0 && b.max[0] >= 10.0);
        assert!(b.min[1] <= -0.4 && b.max[1] >= 0.4);
    }

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), Color32::from_rgb(3, 5, 26));
        assert_eq!(heat_color(1.0), Color32::from_rgb(250, 235, 221));
        assert_eq!(contrast_text(heat_color(0.0)), Color32::WHITE);
        assert_eq!(contrast_text(heat_color(1.0)), Color32::BLACK);
    }
}
