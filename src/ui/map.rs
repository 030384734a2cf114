use eframe::egui::{self, RichText, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};
use world_happiness::color::HappinessBand;
use world_happiness::data::aggregate::max_value;
use world_happiness::data::model::Indicator;
use world_happiness::state::{AppState, LoadState, MapLayer};

use super::plot::empty_state;

// ---------------------------------------------------------------------------
// Choropleth world map (central panel)
// ---------------------------------------------------------------------------

/// Render the world map, its legend and the selected country's details.
pub fn world_map(ui: &mut Ui, state: &mut AppState) {
    if empty_state(ui, state) {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Colour by:");
        ui.selectable_value(&mut state.map_layer, MapLayer::Happiness, "Happiness");
        ui.selectable_value(
            &mut state.map_layer,
            MapLayer::LifeExpectancy,
            "Healthy life expectancy",
        );
    });
    legend(ui);

    let clicked = match &state.geo {
        LoadState::Loaded(_) => draw_map(ui, state),
        LoadState::Loading | LoadState::NotLoaded => {
            ui.label("Loading country boundaries…");
            None
        }
        LoadState::Failed(e) => {
            ui.label(format!("No boundaries: {e}"));
            None
        }
    };
    if let Some(geo_name) = clicked {
        state.select_from_map(&geo_name);
    }

    selected_details(ui, state);
}

/// Draw every feature; returns the boundary name of a clicked feature.
fn draw_map(ui: &mut Ui, state: &AppState) -> Option<String> {
    let (Some(geo), Some(query)) = (state.geo.loaded(), state.query()) else {
        return None;
    };

    let snapshots = query.snapshots(&state.filters);
    let max_score = max_value(state.visible_records(), Indicator::HappinessScore);
    let selected = state.filters.selected_country.as_deref();
    let layer = state.map_layer;

    let response = Plot::new("world_map")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_double_click_reset(true)
        .height(ui.available_height() * 0.75)
        .show(ui, |plot_ui| {
            for feature in &geo.features {
                let raw = feature.name.as_deref().unwrap_or("");
                let country = state.aliases.reconcile(raw);
                let snapshot = snapshots.get(country);

                let band = if selected == Some(country) {
                    HappinessBand::Selected
                } else {
                    match layer {
                        MapLayer::Happiness => {
                            HappinessBand::classify(snapshot.map(|s| s.happiness), max_score)
                        }
                        MapLayer::LifeExpectancy => {
                            HappinessBand::classify_life(snapshot.map(|s| s.life))
                        }
                    }
                };
                let width = if band == HappinessBand::Selected { 2.0 } else { 1.0 };

                for ring in &feature.rings {
                    let points: PlotPoints = ring.iter().copied().collect();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .fill_color(band.fill().gamma_multiply(0.9))
                            .stroke(Stroke::new(width, band.stroke())),
                    );
                }
            }
            plot_ui.pointer_coordinate()
        });

    let pointer = response.inner?;
    let hovered = geo.feature_at(pointer.x, pointer.y)?;
    let raw = hovered.name.clone()?;

    let country = state.aliases.reconcile(&raw);
    let tooltip = match snapshots.get(country) {
        Some(s) => format!(
            "{country}\nHappiness: {:.2}\nRanking: {}\nGDP: {:.2}\nHealthy life: {:.2}\nCorruption: {:.2}",
            s.happiness, s.ranking, s.gdp, s.life, s.corruption
        ),
        None => {
            log::debug!("no data for boundary {raw} -> {country}");
            format!("{country}\nNo data")
        }
    };
    let clicked = response.response.clicked();
    response.response.on_hover_text(tooltip);

    clicked.then_some(raw)
}

fn legend(ui: &mut Ui) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for band in HappinessBand::LEGEND {
            ui.label(RichText::new("■").color(band.fill()));
            ui.label(band.label());
            ui.add_space(8.0);
        }
    });
}

fn selected_details(ui: &mut Ui, state: &mut AppState) {
    let Some(country) = state.filters.selected_country.clone() else {
        return;
    };
    let Some(snapshot) = state
        .query()
        .and_then(|q| q.snapshots(&state.filters).get(&country).copied())
    else {
        return;
    };

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.strong(format!("{country} ({})", snapshot.year));
        ui.label(format!("Happiness: {:.2}", snapshot.happiness));
        ui.label(format!("Ranking: {}", snapshot.ranking));
        ui.label(format!("GDP per capita: {:.2}", snapshot.gdp));
        ui.label(format!("Healthy life expectancy: {:.2}", snapshot.life));
        ui.label(format!("Perceived corruption: {:.2}", snapshot.corruption));
        if ui.button("Clear selection").clicked() {
            state.clear_selection();
        }
    });
}
