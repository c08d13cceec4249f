//! Control Panel Widget
//! Left side panel with the chart selector, action buttons and status line.

use crate::charts::ChartKind;
use egui::{Color32, ComboBox, RichText};

/// Left side control panel with chart selection and drawing controls.
pub struct ControlPanel {
    pub selection: ChartKind,
    pub status: String,
    pub row_count: usize,
    /// Set once a figure is on the surface.
    pub can_save: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: ChartKind::default(),
            status: "Ready".to_string(),
            row_count: 0,
            can_save: false,
        }
    }
}

impl ControlPanel {
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            status: format!("Loaded {} listings", row_count),
            ..Self::default()
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🗽 Listing Charts")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new(format!("{} rows", self.row_count))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Chart Selection =====
        ui.label(RichText::new("📊 Chart").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("chart_selection")
            .width(ui.available_width())
            .selected_text(self.selection.label())
            .show_ui(ui, |ui| {
                for kind in ChartKind::ALL {
                    ui.selectable_value(&mut self.selection, kind, kind.label());
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("▶ Show the graph").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ShowGraph;
            }

            ui.add_space(8.0);

            ui.add_enabled_ui(self.can_save, |ui| {
                let save_button = egui::Button::new(RichText::new("💾 Save figure").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(save_button).clicked() {
                    action = ControlPanelAction::SaveFigure;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(
            RichText::new(&self.status)
                .size(11.0)
                .color(Self::status_color(&self.status)),
        );

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    fn status_color(status: &str) -> Color32 {
        if status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if status.starts_with("Saved") || status.starts_with("Drew") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        }
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    ShowGraph,
    SaveFigure,
}
