//! Chart Viewer Widget
//! Central drawing surface holding at most one figure.

use crate::charts::{ChartKind, ChartPlotter, Figure};
use egui::RichText;

/// The drawing surface. Each new figure gets a fresh plot id so the view
/// starts from the figure's own bounds rather than the previous zoom.
#[derive(Default)]
pub struct ChartViewer {
    figure: Option<(ChartKind, Figure)>,
    generation: u64,
    limits_pending: bool,
    font_size: f32,
}

impl ChartViewer {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    /// Clear the surface
    pub fn clear(&mut self) {
        self.figure = None;
    }

    pub fn set_figure(&mut self, kind: ChartKind, figure: Figure) {
        self.figure = Some((kind, figure));
        self.generation += 1;
        self.limits_pending = true;
    }

    pub fn current(&self) -> Option<(ChartKind, &Figure)> {
        self.figure.as_ref().map(|(kind, figure)| (*kind, figure))
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some((kind, figure)) = &self.figure else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        let heading = if figure.title.is_empty() {
            kind.label()
        } else {
            figure.title.as_str()
        };
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(heading).size(self.font_size).strong());
        });
        ui.add_space(6.0);

        ChartPlotter::draw_figure(
            ui,
            figure,
            ("listing_chart", self.generation),
            self.limits_pending,
        );
        self.limits_pending = false;
    }
}
