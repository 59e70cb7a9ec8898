//! View-models backing the two screens.
//!
//! A model is built wholesale from the on-disk documents and replaced on every
//! refresh; nothing here is mutated incrementally between refreshes.

use crate::error::{GuiError, GuiResult};
use crate::store::{Batch, RESERVED_BATCH, Snapshot, StateStore};

/// One row of a requests table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub id: String,
    pub url: String,
    pub method: String,
    pub timestamp: String,
    pub host: String,
}

impl RequestRow {
    fn is_blank(&self) -> bool {
        [&self.id, &self.url, &self.method, &self.timestamp, &self.host]
            .iter()
            .all(|cell| cell.trim().is_empty())
    }
}

/// One row of the batches table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub name: String,
    pub allow_redirects: bool,
    pub sync_last_byte: bool,
    pub send_timeout: u64,
    pub is_current: bool,
}

impl BatchRow {
    pub fn is_reserved(&self) -> bool {
        self.name == RESERVED_BATCH
    }

    pub fn can_set_current(&self) -> bool {
        !self.is_current && !self.is_reserved()
    }

    pub fn can_open(&self) -> bool {
        self.is_current && !self.is_reserved()
    }
}

/// Everything the main screen renders.
#[derive(Debug, Clone, Default)]
pub struct MainModel {
    pub requests: Vec<RequestRow>,
    pub batches: Vec<BatchRow>,
    pub history: Vec<String>,
}

impl MainModel {
    pub fn load(store: &StateStore) -> GuiResult<Self> {
        let snapshot = store.load_snapshot()?;
        let batches = store.load_batches()?;
        Ok(Self::build(&snapshot, batches))
    }

    fn build(snapshot: &Snapshot, batches: Vec<(String, Batch)>) -> Self {
        let current = snapshot.current_batch.as_deref();
        let batches = batches
            .into_iter()
            .map(|(name, batch)| BatchRow {
                is_current: Some(name.as_str()) == current,
                name,
                allow_redirects: batch.allow_redirects,
                sync_last_byte: batch.sync_last_byte,
                send_timeout: batch.send_timeout,
            })
            .collect();
        Self {
            requests: request_rows(snapshot),
            batches,
            history: snapshot.cp_history.clone(),
        }
    }
}

/// Everything the batch screen renders.
#[derive(Debug, Clone)]
pub struct BatchModel {
    pub name: String,
    pub rows: Vec<RequestRow>,
}

impl BatchModel {
    pub fn load(store: &StateStore, name: &str) -> GuiResult<Self> {
        let batch = store.load_batch(name)?;
        let snapshot = store.load_snapshot()?;
        Self::build(name, &batch, &snapshot)
    }

    /// Joins the batch's item references against the snapshot, keeping item
    /// order. An item naming an unknown request is a schema mismatch.
    fn build(name: &str, batch: &Batch, snapshot: &Snapshot) -> GuiResult<Self> {
        let mut rows = Vec::with_capacity(batch.items.len());
        for item in &batch.items {
            let id = item.request_id()?;
            let request = snapshot.requests.get(&id).ok_or_else(|| {
                GuiError::malformed(format!("batch {name} references unknown request {id}"))
            })?;
            rows.push(RequestRow {
                id,
                url: request.url.clone(),
                method: request.method.clone(),
                timestamp: request.timestamp.clone(),
                host: request.host().to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            rows,
        })
    }
}

/// Requests table rows, with empty-row cleanup: a row with no non-blank cell
/// is dropped.
fn request_rows(snapshot: &Snapshot) -> Vec<RequestRow> {
    snapshot
        .requests
        .iter()
        .map(|(id, request)| RequestRow {
            id: id.clone(),
            url: request.url.clone(),
            method: request.method.clone(),
            timestamp: request.timestamp.clone(),
            host: request.host().to_string(),
        })
        .filter(|row| !row.is_blank())
        .collect()
}
