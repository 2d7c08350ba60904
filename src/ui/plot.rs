use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};

use noshow_dash::stats::bins::BinShare;
use noshow_dash::stats::distribution::{AttributeDistribution, NeighbourhoodRate};
use noshow_dash::Outcome;

use crate::color::{outcome_color, rate_color};

// ---------------------------------------------------------------------------
// Neighbourhood rates (bar chart)
// ---------------------------------------------------------------------------

/// No-show rate per neighbourhood, highest first.
pub fn neighbourhood_chart(ui: &mut Ui, rows: &[NeighbourhoodRate], height: f32) {
    ui.strong("No-show Rates by Neighborhood");

    let names: Vec<String> = rows.iter().map(|r| r.neighbourhood.clone()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.rate)
                .name(format!("{} ({} appts)", r.neighbourhood, r.appointments))
                .fill(rate_color(r.rate))
                .width(0.8)
        })
        .collect();

    Plot::new("neighbourhood_chart")
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label("Neighborhood")
        .y_axis_label("No-show Rate")
        .x_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .y_axis_formatter(|mark, _range| format!("{:.0}%", mark.value * 100.0))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("No-show Rate"));
        });
}

// ---------------------------------------------------------------------------
// Days until appointment (stacked percentage bars)
// ---------------------------------------------------------------------------

/// Show vs no-show share within each delay bin, stacked to 100%.
pub fn days_bin_chart(ui: &mut Ui, shares: &[BinShare], height: f32) {
    ui.strong("Show vs No-Show by Appointment Delay (%)");

    let labels: Vec<String> = shares.iter().map(|s| s.label().to_string()).collect();
    let series = |outcome: Outcome| {
        let bars = shares
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Bar::new(i as f64, s.pct(outcome))
                    .name(format!("{} ({} appts)", s.label(), s.counts.get(outcome)))
                    .width(0.7)
            })
            .collect();
        BarChart::new(bars)
            .name(outcome.label())
            .color(outcome_color(outcome))
    };
    let shows = series(Outcome::No);
    let no_shows = series(Outcome::Yes).stack_on(&[&shows]);

    Plot::new("days_bin_chart")
        .height(height)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .include_y(100.0)
        .x_axis_label("Days Until Appointment")
        .y_axis_label("Percentage of Appointments")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_formatter(|mark, _range| format!("{:.0}%", mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(shows);
            plot_ui.bar_chart(no_shows);
        });
}

// ---------------------------------------------------------------------------
// Covariate outcome charts
// ---------------------------------------------------------------------------

/// Two-bar outcome chart for one covariate, with the per-level split below.
pub fn outcome_chart(ui: &mut Ui, id: &str, title: &str, dist: &AttributeDistribution, height: f32) {
    ui.strong(title);

    let bars: Vec<Bar> = Outcome::ALL
        .into_iter()
        .enumerate()
        .map(|(i, outcome)| {
            Bar::new(i as f64, dist.outcomes.get(outcome) as f64)
                .name(outcome.label())
                .fill(outcome_color(outcome))
                .width(0.6)
        })
        .collect();

    Plot::new(id)
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_axes([true, false])
        .x_axis_formatter(|mark, _range| {
            let labels = [Outcome::No.label(), Outcome::Yes.label()];
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 1e-6 && (0.0..2.0).contains(&idx) {
                labels[idx as usize].to_string()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });

    let total = dist.outcomes.total();
    let share = dist
        .outcomes
        .no_show_fraction()
        .map_or_else(|| "n/a".to_string(), |f| format!("{:.1}%", f * 100.0));
    ui.label(RichText::new(format!("{total} appts, {share} no-show")).small());

    if dist.levels.len() > 1 {
        ui.collapsing(format!("{title}: by level"), |ui: &mut Ui| {
            for level in &dist.levels {
                ui.label(format!(
                    "{}: {} no-show / {} show",
                    level.level, level.counts.yes, level.counts.no
                ));
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Neighbourhood table
// ---------------------------------------------------------------------------

pub fn neighbourhood_table(ui: &mut Ui, rows: &[NeighbourhoodRate]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .max_scroll_height(240.0)
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Neighborhood");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Appointments");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("No-show Rate");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&r.neighbourhood);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(r.appointments.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("{:.1}%", r.rate * 100.0)).color(rate_color(r.rate)));
                });
            });
        });
}

/// Axis label for an integer category position; blank between ticks.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["0-3".to_string(), "4-7".to_string()];
        assert_eq!(category_label(&labels, 1.0), "4-7");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 5.0), "");
    }
}
