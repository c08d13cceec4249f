//! Listing Charts Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartError, ChartKind, FigureBuilder, StaticChartRenderer};
use crate::config::AppConfig;
use crate::data::ListingTable;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;

/// Main application window.
pub struct ListingChartsApp {
    table: ListingTable,
    config: AppConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl ListingChartsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, table: ListingTable, config: AppConfig) -> Self {
        Self::with_table(table, config)
    }

    fn with_table(table: ListingTable, config: AppConfig) -> Self {
        let mut control_panel = ControlPanel::new(table.row_count());
        if let Some(label) = &config.initial_chart {
            match ChartKind::from_label(label) {
                Some(kind) => control_panel.selection = kind,
                None => log::warn!("Unknown initial chart {:?}, keeping default", label),
            }
        }

        Self {
            chart_viewer: ChartViewer::new(config.font_size),
            table,
            config,
            control_panel,
        }
    }

    /// Clear the surface and draw the selected chart
    fn handle_show_graph(&mut self) {
        let kind = self.control_panel.selection;
        self.chart_viewer.clear();
        self.control_panel.can_save = false;

        match FigureBuilder::build(kind, &self.table) {
            Ok(figure) => {
                log::info!("Drew {:?} with {} marks", kind, figure.marks.len());
                self.chart_viewer.set_figure(kind, figure);
                self.control_panel.can_save = true;
                self.control_panel.set_status(&format!("Drew {}", kind.label()));
            }
            Err(e @ ChartError::Empty(_)) => {
                log::warn!("{}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
            Err(e) => {
                log::error!("Failed to draw {:?}: {}", kind, e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Export the current figure as PNG
    fn handle_save_figure(&mut self) {
        let Some((kind, figure)) = self.chart_viewer.current() else {
            self.control_panel.set_status("No figure to save");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(format!("{}.png", kind.file_stem()))
            .save_file()
        {
            Some(path) => path,
            None => return,
        };

        let result = StaticChartRenderer::render_png(
            figure,
            &output_path,
            self.config.export_width,
            self.config.export_height,
            self.config.font_size,
        );
        match result {
            Ok(()) => {
                log::info!("Saved {} to {}", kind.label(), output_path.display());
                self.control_panel
                    .set_status(&format!("Saved {}", output_path.display()));
            }
            Err(e) => {
                log::error!("Failed to save {}: {}", output_path.display(), e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for ListingChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::ShowGraph => self.handle_show_graph(),
                        ControlPanelAction::SaveFigure => self.handle_save_figure(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
