//! Interface to the replay engine.
//!
//! The GUI is a pure client: every mutation of request/batch state goes
//! through these calls, and the engine owns the JSON documents this layer
//! reads back from disk.

/// Operations the GUI forwards to the racer. These are the only externally
/// observable side effects this layer produces.
pub trait Racer: Send + Sync {
    /// Add a captured request to the current batch.
    fn add_request_to_current_batch(&self, request_id: &str) -> anyhow::Result<()>;

    /// Make the named batch the current one.
    fn set_current_batch(&self, name: &str) -> anyhow::Result<()>;

    /// Create a new, empty batch with the given name.
    fn create_batch(&self, name: &str) -> anyhow::Result<()>;

    /// Send the current batch through the replay engine.
    fn send_batches(&self) -> anyhow::Result<()>;

    /// Ask the engine to persist its state. `full` also flushes batches.
    fn save(&self, full: bool) -> anyhow::Result<()>;
}

/// Stand-in used when the GUI runs without an attached engine: every intent
/// is logged and otherwise dropped.
#[derive(Debug, Default)]
pub struct DetachedRacer;

impl Racer for DetachedRacer {
    fn add_request_to_current_batch(&self, request_id: &str) -> anyhow::Result<()> {
        tracing::info!(request_id, "add request to current batch (no engine attached)");
        Ok(())
    }

    fn set_current_batch(&self, name: &str) -> anyhow::Result<()> {
        tracing::info!(name, "set current batch (no engine attached)");
        Ok(())
    }

    fn create_batch(&self, name: &str) -> anyhow::Result<()> {
        tracing::info!(name, "create batch (no engine attached)");
        Ok(())
    }

    fn send_batches(&self) -> anyhow::Result<()> {
        tracing::info!("send batches (no engine attached)");
        Ok(())
    }

    fn save(&self, full: bool) -> anyhow::Result<()> {
        tracing::info!(full, "save (no engine attached)");
        Ok(())
    }
}
