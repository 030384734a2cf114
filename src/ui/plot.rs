use std::collections::BTreeMap;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use world_happiness::data::aggregate::{self, trend_line, KpiSummary, TopEntity};
use world_happiness::data::model::{Indicator, Record};
use world_happiness::state::{AppState, LoadState};

/// GDP per capita is stored as a small index; charts show it in USD-like units.
pub const GDP_DISPLAY_SCALE: f64 = 100_000.0;

const CHART_HEIGHT: f32 = 260.0;

fn display_scale(indicator: Indicator) -> f64 {
    match indicator {
        Indicator::GdpPerCapita => GDP_DISPLAY_SCALE,
        _ => 1.0,
    }
}

/// Message for anything but a loaded dataset. Returns `true` if one was shown.
pub fn empty_state(ui: &mut Ui, state: &AppState) -> bool {
    let msg = match &state.dataset {
        LoadState::Loaded(_) if state.visible_indices.is_empty() => {
            "No data for the current filters.".to_string()
        }
        LoadState::Loaded(_) => return false,
        LoadState::Loading => "Loading data…".to_string(),
        LoadState::Failed(e) => format!("No data: {e}"),
        LoadState::NotLoaded => "Open a file to view data  (File → Open…)".to_string(),
    };
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(msg);
    });
    true
}

// ---------------------------------------------------------------------------
// Overview page
// ---------------------------------------------------------------------------

/// KPI cards, yearly trend, scatter relationships and the row table.
pub fn overview(ui: &mut Ui, state: &AppState) {
    if empty_state(ui, state) {
        return;
    }
    let records = state.visible_records();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            kpi_row(ui, &aggregate::kpis(records.iter().copied()));
            ui.separator();

            ui.strong("Average happiness by year");
            let avgs = aggregate::yearly_averages(records.iter().copied());
            let points: PlotPoints = avgs.iter().map(|a| [a.year as f64, a.avg]).collect();
            Plot::new("yearly_average")
                .height(CHART_HEIGHT)
                .x_axis_label("Year")
                .y_axis_label("Happiness")
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(points)
                            .name("Average")
                            .color(Color32::from_rgb(0xFF, 0x7F, 0x11))
                            .width(2.0),
                    );
                });

            ui.columns(2, |cols| {
                scatter_chart(
                    &mut cols[0],
                    state,
                    &records,
                    Indicator::PerceptionsOfCorruption,
                    Indicator::Ranking,
                    false,
                );
                scatter_chart(
                    &mut cols[1],
                    state,
                    &records,
                    Indicator::GdpPerCapita,
                    Indicator::Ranking,
                    true,
                );
            });
            scatter_chart(
                ui,
                state,
                &records,
                Indicator::GdpPerCapita,
                Indicator::Generosity,
                false,
            );

            ui.separator();
            record_table(ui, &records);
        });
}

fn kpi_row(ui: &mut Ui, kpis: &KpiSummary) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        kpi_card(ui, "Average happiness", format!("{:.2}", kpis.happiness));
        kpi_card(
            ui,
            "GDP per capita",
            format!("{:.0} USD", kpis.gdp_per_capita * GDP_DISPLAY_SCALE),
        );
        kpi_card(ui, "Social support", format!("{:.2}", kpis.social_support));
        kpi_card(ui, "Freedom of choice", format!("{:.2}", kpis.freedom));
        kpi_card(ui, "Perceived corruption", format!("{:.2}", kpis.corruption));
    });
}

fn kpi_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(label);
            ui.heading(RichText::new(value).strong());
        });
    });
}

/// Scatter of `y` against `x`, one series per region, optional OLS overlay.
fn scatter_chart(
    ui: &mut Ui,
    state: &AppState,
    records: &[&Record],
    x: Indicator,
    y: Indicator,
    with_trend: bool,
) {
    let sx = display_scale(x);
    let sy = display_scale(y);

    ui.strong(format!("{} vs {}", y.label(), x.label()));

    let mut by_region: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for r in records {
        by_region
            .entry(r.region.as_str())
            .or_default()
            .push([r.value(x) * sx, r.value(y) * sy]);
    }

    let trend = if with_trend {
        let pts: Vec<(f64, f64)> = records
            .iter()
            .map(|r| (r.value(x) * sx, r.value(y) * sy))
            .collect();
        trend_line(&pts)
    } else {
        Vec::new()
    };

    Plot::new(format!("scatter_{x:?}_{y:?}"))
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x.label())
        .y_axis_label(y.label())
        .show(ui, |plot_ui| {
            for (region, pts) in by_region {
                let color = state
                    .region_colors
                    .as_ref()
                    .map(|c| c.color_for(region))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(Points::new(pts).name(region).color(color).radius(3.0));
            }
            if trend.len() == 2 {
                let line: PlotPoints = trend.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.line(
                    Line::new(line)
                        .name("Trend")
                        .color(Color32::from_rgb(0x34, 0x98, 0xDB))
                        .width(3.0),
                );
            }
        });
}

fn record_table(ui: &mut Ui, records: &[&Record]) {
    ui.strong("Filtered records");
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto(), 3)
        .header(20.0, |mut header| {
            for title in ["Year", "Country", "Region", "Ranking", "Happiness", "GDP"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let r = records[row.index()];
                row.col(|ui| {
                    ui.label(r.year.to_string());
                });
                row.col(|ui| {
                    ui.label(&r.country);
                });
                row.col(|ui| {
                    ui.label(&r.region);
                });
                row.col(|ui| {
                    ui.label(r.ranking.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.happiness_score));
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.gdp_per_capita));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Social factors page
// ---------------------------------------------------------------------------

const SOCIAL_FACTORS: [Indicator; 4] = [
    Indicator::SocialSupport,
    Indicator::FreedomToChoose,
    Indicator::Generosity,
    Indicator::PerceptionsOfCorruption,
];

/// Leaders per social indicator, the selected country and factor scatters.
pub fn social(ui: &mut Ui, state: &AppState) {
    let Some(query) = state.query() else {
        empty_state(ui, state);
        return;
    };

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for factor in SOCIAL_FACTORS {
            top_card(ui, factor, query.top_by_field(factor));
        }
    });

    let records = state.visible_records();
    if let Some(country) = state.filters.country.as_value() {
        if let Some(r) = records.iter().find(|r| r.country == country) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.strong(format!("{} ({})", r.country, r.year));
                for factor in SOCIAL_FACTORS {
                    ui.label(format!("{}: {:.2}", factor.label(), r.value(factor)));
                }
            });
        }
    }
    ui.separator();

    if empty_state(ui, state) {
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for pair in SOCIAL_FACTORS.chunks(2) {
                ui.columns(pair.len(), |cols| {
                    for (col, factor) in cols.iter_mut().zip(pair) {
                        scatter_chart(
                            col,
                            state,
                            &records,
                            *factor,
                            Indicator::HappinessScore,
                            false,
                        );
                    }
                });
            }
        });
}

fn top_card(ui: &mut Ui, factor: Indicator, top: Option<TopEntity>) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(format!("Top {}", factor.label().to_lowercase()));
            match top {
                Some(t) => {
                    ui.heading(RichText::new(&t.country).strong());
                    ui.label(format!("{:.2}", t.value));
                }
                None => {
                    ui.label("No data");
                }
            }
        });
    });
}
