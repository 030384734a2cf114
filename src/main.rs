mod app;
mod ui;

use app::WorldHappinessApp;
use eframe::egui;
use world_happiness::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let aliases = match config.alias_table() {
        Ok(table) => table,
        Err(e) => {
            log::warn!("using built-in aliases only: {e:#}");
            world_happiness::data::reconcile::AliasTable::builtin()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Happiness Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(WorldHappinessApp::new(cc, config, aliases)))),
    )
}
