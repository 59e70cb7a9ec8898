mod app;
mod pages;
pub mod state;

use std::sync::Arc;

use crate::racer::Racer;
use crate::store::StateStore;

pub fn run(store: StateStore, racer: Arc<dyn Racer>) -> eframe::Result<()> {
    app::run(store, racer)
}
