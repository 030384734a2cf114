use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use world_happiness::data::filter::{Selection, ALL_LABEL};
use world_happiness::state::{AppState, LoadState, View};

use crate::app::{spawn_dataset_load, WorldHappinessApp};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        LoadState::Loaded(ds) => ds,
        LoadState::Loading => {
            ui.label("Loading data…");
            return;
        }
        LoadState::Failed(_) | LoadState::NotLoaded => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the widgets.
    let regions = dataset.regions.clone();
    let countries = dataset.countries.clone();
    let [lo, hi] = state.config.year_bounds;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Year");
            let (mut from, mut to) = state.filters.years;
            let from_changed = ui
                .add(egui::Slider::new(&mut from, lo..=hi).text("from"))
                .changed();
            let to_changed = ui
                .add(egui::Slider::new(&mut to, lo..=hi).text("to"))
                .changed();
            if from_changed || to_changed {
                // Dragging one handle past the other drags both.
                if from_changed && from > to {
                    to = from;
                } else if to_changed && to < from {
                    from = to;
                }
                state.set_years(from, to);
            }
            ui.separator();

            // ---- Region ----
            ui.strong("Region");
            let current_region = state.filters.region.clone();
            egui::ComboBox::from_id_salt("region_filter")
                .selected_text(current_region.to_string())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(current_region.is_all(), ALL_LABEL)
                        .clicked()
                    {
                        state.set_region(Selection::All);
                    }
                    for region in &regions {
                        let selected = current_region.as_value() == Some(region.as_str());
                        if ui.selectable_label(selected, region).clicked() {
                            state.set_region(Selection::Only(region.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Country ----
            ui.strong("Country");
            let current_country = state.filters.country.clone();
            egui::ComboBox::from_id_salt("country_filter")
                .selected_text(current_country.to_string())
                .width(ui.available_width())
                .height(400.0)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(current_country.is_all(), ALL_LABEL)
                        .clicked()
                    {
                        state.set_country(Selection::All);
                    }
                    for country in &countries {
                        let selected = current_country.as_value() == Some(country.as_str());
                        if ui.selectable_label(selected, country).clicked() {
                            state.set_country(Selection::Only(country.clone()));
                        }
                    }
                });
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }

            ui.add_space(8.0);
            ui.label(format!("{} rows match", state.visible_indices.len()));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, page tabs and status line.
pub fn top_bar(ui: &mut Ui, app: &mut WorldHappinessApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx(), app);
                ui.close_menu();
            }
            let can_export = app
                .state
                .dataset
                .loaded()
                .is_some_and(|ds| ds.source.is_some());
            if ui
                .add_enabled(can_export, egui::Button::new("Export dataset…"))
                .clicked()
            {
                save_file_dialog(&mut app.state);
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            if ui
                .selectable_label(app.state.view == view, view.title())
                .clicked()
            {
                app.state.view = view;
            }
        }

        ui.separator();

        match &app.state.dataset {
            LoadState::Loaded(ds) => {
                ui.label(format!(
                    "{} records loaded, {} visible",
                    ds.len(),
                    app.state.visible_indices.len()
                ));
            }
            LoadState::Loading => {
                ui.spinner();
            }
            LoadState::Failed(msg) => {
                ui.label(RichText::new(format!("No data: {msg}")).color(Color32::RED));
            }
            LoadState::NotLoaded => {}
        }

        if let Some(msg) = &app.state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn open_file_dialog(ctx: &egui::Context, app: &mut WorldHappinessApp) {
    let file = rfd::FileDialog::new()
        .set_title("Open happiness data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        app.state.dataset = LoadState::Loading;
        app.state.status_message = None;
        app.dataset_rx = Some(spawn_dataset_load(ctx, path));
    }
}

fn save_file_dialog(state: &mut AppState) {
    let suggested = state
        .dataset
        .loaded()
        .and_then(|ds| ds.source.as_ref())
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "happiness.csv".to_string());

    let Some(dst) = rfd::FileDialog::new()
        .set_title("Export dataset")
        .set_file_name(suggested)
        .save_file()
    else {
        return;
    };

    match state.export_to(&dst) {
        Ok(_) => state.status_message = None,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
        }
    }
}
