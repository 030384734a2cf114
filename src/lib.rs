//! World Happiness dashboard core.
//!
//! The [`data`] layer loads the per-country, per-year table once, filters it
//! by year range / region / country and derives the views every chart and the
//! map consume. [`state`] holds the UI state around it; the desktop binary in
//! `main.rs` renders it with egui.

pub mod color;
pub mod config;
pub mod data;
pub mod geo;
pub mod state;
