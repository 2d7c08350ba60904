use eframe::egui::{self, Color32, RichText, Ui};

use noshow_dash::stats::kpi::{format_days, format_rate};
use noshow_dash::{Covariate, GenderFilter};

use crate::state::DashboardState;
use crate::ui::plot;

/// Covariate charts stacked under the filters.
pub const SIDE_COVARIATES: [Covariate; 3] =
    [Covariate::Scholarship, Covariate::SmsReceived, Covariate::Handcap];

/// Covariate charts in the bottom row of the main area.
pub const MAIN_COVARIATES: [Covariate; 3] =
    [Covariate::Hipertension, Covariate::Diabetes, Covariate::Alcoholism];

const ALL_NEIGHBOURHOODS: &str = "All neighborhoods";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Filters");
    });
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Copy what the widgets need so state can be mutated below.
    let neighbourhoods = dataset.neighbourhoods().to_vec();
    let age_bounds = dataset.age_bounds();
    let age_marks = dataset.age_marks();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Neighbourhood ----
            ui.label("Select Neighborhood:");
            let current = state.filter.neighbourhood.clone();
            let mut choice = current.clone();
            egui::ComboBox::from_id_salt("select_neighbourhood")
                .selected_text(current.as_deref().unwrap_or(ALL_NEIGHBOURHOODS))
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut choice, None, ALL_NEIGHBOURHOODS);
                    for name in &neighbourhoods {
                        ui.selectable_value(&mut choice, Some(name.clone()), name);
                    }
                });
            state.set_neighbourhood(choice);
            ui.add_space(8.0);

            // ---- Gender ----
            ui.label("Select Gender:");
            let mut gender = state.filter.gender;
            egui::ComboBox::from_id_salt("gender_filter")
                .selected_text(gender.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for option in GenderFilter::CHOICES {
                        ui.selectable_value(&mut gender, option, option.label());
                    }
                });
            state.set_gender(gender);
            ui.add_space(8.0);

            // ---- Age range ----
            ui.label("Select Age Range:");
            if let Some((lo, hi)) = age_bounds {
                let (mut min, mut max) = state.filter.age_range;
                if ui
                    .add(egui::Slider::new(&mut min, lo..=hi).text("min"))
                    .changed()
                {
                    state.set_age_min(min);
                }
                if ui
                    .add(egui::Slider::new(&mut max, lo..=hi).text("max"))
                    .changed()
                {
                    state.set_age_max(max);
                }
                if let Some([low, mid, high]) = age_marks {
                    ui.label(RichText::new(format!("{low} · {mid} · {high}")).weak());
                }
            }

            ui.add_space(4.0);
            if ui.small_button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.separator();

            // ---- Covariate charts ----
            if let Some(bundle) = &state.bundle {
                for covariate in SIDE_COVARIATES {
                    if let Some(dist) = bundle.attribute(covariate) {
                        plot::outcome_chart(
                            ui,
                            covariate.column_name(),
                            covariate.title(),
                            dist,
                            120.0,
                        );
                        ui.add_space(6.0);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Filter banner plus the three KPI cards.
pub fn kpi_row(ui: &mut Ui, state: &DashboardState) {
    let Some(bundle) = &state.bundle else {
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&bundle.filter_summary).strong().size(16.0));
    });
    ui.add_space(8.0);

    let cards = [
        ("Total Appointments", bundle.total_count.to_string()),
        ("No-Show Rate", format_rate(bundle.no_show_rate)),
        ("Average Days Until Appointment", format_days(bundle.avg_days_until)),
    ];
    ui.columns(cards.len(), |columns: &mut [Ui]| {
        for (col, (title, value)) in columns.iter_mut().zip(cards) {
            kpi_card(col, title, &value);
        }
    });
}

fn kpi_card(ui: &mut Ui, title: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(title).size(15.0));
            ui.label(RichText::new(value).size(26.0).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.bundle.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export JSON…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(bundle)) = (&state.dataset, &state.bundle) {
            ui.label(format!(
                "{} appointments loaded, {} selected",
                ds.len(),
                bundle.total_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut DashboardState) {
    let file = rfd::FileDialog::new()
        .set_title("Open appointment data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Failures are logged and surfaced in the status line by `open`.
        let _ = state.open(&path);
    }
}

fn export_dialog(state: &mut DashboardState) {
    let Some(bundle) = &state.bundle else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export current results")
        .add_filter("JSON", &["json"])
        .set_file_name("noshow_results.json")
        .save_file();

    if let Some(path) = file {
        match bundle.write_json(&path) {
            Ok(()) => {
                log::info!("Exported results to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
