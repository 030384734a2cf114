use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context, Result};
use eframe::egui;
use world_happiness::config::AppConfig;
use world_happiness::data::loader::load_file;
use world_happiness::data::model::HappinessDataset;
use world_happiness::data::reconcile::AliasTable;
use world_happiness::geo::{load_geo_file, FeatureCollection};
use world_happiness::state::{AppState, LoadState, View};

use crate::ui::{map, panels, plot};

// ---------------------------------------------------------------------------
// One-shot background loads
// ---------------------------------------------------------------------------

/// Run `load` on a worker thread; the result arrives once on the receiver.
fn spawn_load<T, F>(ctx: &egui::Context, load: F) -> Receiver<Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let ctx = ctx.clone();
    thread::spawn(move || {
        // The receiver may be gone if the window closed first.
        let _ = tx.send(load());
        ctx.request_repaint();
    });
    rx
}

pub fn spawn_dataset_load(ctx: &egui::Context, path: PathBuf) -> Receiver<Result<HappinessDataset>> {
    spawn_load(ctx, move || {
        load_file(&path).with_context(|| format!("loading {}", path.display()))
    })
}

fn spawn_geo_load(ctx: &egui::Context, path: PathBuf) -> Receiver<Result<FeatureCollection>> {
    spawn_load(ctx, move || {
        load_geo_file(&path).with_context(|| format!("loading {}", path.display()))
    })
}

/// Take the result if it has arrived. A dropped sender counts as a failure.
fn poll<T>(rx: &mut Option<Receiver<Result<T>>>) -> Option<Result<T>> {
    let result = match rx.as_ref()?.try_recv() {
        Ok(result) => result,
        Err(TryRecvError::Empty) => return None,
        Err(TryRecvError::Disconnected) => Err(anyhow::anyhow!("loader thread exited")),
    };
    *rx = None;
    Some(result)
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WorldHappinessApp {
    pub state: AppState,
    pub dataset_rx: Option<Receiver<Result<HappinessDataset>>>,
    geo_rx: Option<Receiver<Result<FeatureCollection>>>,
}

impl WorldHappinessApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, aliases: AliasTable) -> Self {
        let dataset_rx = Some(spawn_dataset_load(&cc.egui_ctx, config.data_path.clone()));
        let geo_rx = Some(spawn_geo_load(&cc.egui_ctx, config.geo_path.clone()));

        let mut state = AppState::new(config, aliases);
        state.dataset = LoadState::Loading;
        state.geo = LoadState::Loading;

        Self {
            state,
            dataset_rx,
            geo_rx,
        }
    }

    fn poll_loads(&mut self) {
        match poll(&mut self.dataset_rx) {
            Some(Ok(ds)) => self.state.set_dataset(ds),
            Some(Err(e)) => self.state.set_dataset_error(&e),
            None => {}
        }
        match poll(&mut self.geo_rx) {
            Some(Ok(geo)) => self.state.set_geo(geo),
            Some(Err(e)) => self.state.set_geo_error(&e),
            None => {}
        }
    }
}

impl eframe::App for WorldHappinessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loads();

        // ---- Top panel: menu bar + page tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Overview => plot::overview(ui, &self.state),
            View::Map => map::world_map(ui, &mut self.state),
            View::Social => plot::social(ui, &self.state),
        });
    }
}
