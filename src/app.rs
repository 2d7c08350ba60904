use eframe::egui::{self, Ui};

use crate::config::DashboardConfig;
use crate::state::DashboardState;
use crate::ui::{panels, plot};

const CHART_HEIGHT: f32 = 360.0;
const PIE_HEIGHT: f32 = 160.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct NoShowDashboardApp {
    pub state: DashboardState,
}

impl NoShowDashboardApp {
    /// Open the configured dataset, if any, before the first frame.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut app = Self::default();
        if let Some(path) = &config.dataset_path {
            // Errors end up in the status line.
            let _ = app.state.open(path);
        }
        app
    }
}

impl eframe::App for NoShowDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters + covariate charts ----
        egui::SidePanel::left("filter_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &DashboardState) {
    let Some(bundle) = &state.bundle else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view appointments  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading("Medical Appointment Analysis");
        });
        ui.add_space(8.0);

        panels::kpi_row(ui, state);
        ui.add_space(12.0);

        ui.columns(2, |columns: &mut [Ui]| {
            plot::neighbourhood_chart(&mut columns[0], &bundle.neighbourhood_distribution, CHART_HEIGHT);
            plot::days_bin_chart(&mut columns[1], &bundle.days_bin_distribution, CHART_HEIGHT);
        });
        ui.add_space(12.0);

        ui.columns(panels::MAIN_COVARIATES.len(), |columns: &mut [Ui]| {
            for (col, covariate) in columns.iter_mut().zip(panels::MAIN_COVARIATES) {
                if let Some(dist) = bundle.attribute(covariate) {
                    plot::outcome_chart(col, covariate.column_name(), covariate.title(), dist, PIE_HEIGHT);
                }
            }
        });
        ui.add_space(12.0);

        egui::CollapsingHeader::new("Neighborhood details")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                plot::neighbourhood_table(ui, &bundle.neighbourhood_distribution);
            });
    });
}
