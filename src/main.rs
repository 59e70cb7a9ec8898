mod error;
mod gui;
mod logging;
mod racer;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::racer::DetachedRacer;
use crate::store::StateStore;

#[derive(Parser, Debug)]
#[command(name = "compuracer-gui")]
#[command(about = "Desktop GUI for CompuRacer batches and captured requests", long_about = None)]
struct Cli {
    /// Directory holding the racer's state.json and batches/.
    #[arg(long, default_value = "state")]
    state_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let store = StateStore::new(cli.state_dir);
    tracing::info!(dir = %store.dir().display(), "starting CompuRacer GUI");

    // Standalone runs have no replay engine attached; an embedding program
    // supplies its own Racer implementation instead.
    let racer = Arc::new(DetachedRacer);

    gui::run(store, racer).map_err(|e| anyhow::anyhow!(e.to_string()))
}
