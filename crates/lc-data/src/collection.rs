//! Labelled datasets shared by the viewers

use std::sync::Arc;

use indexmap::IndexMap;
use lc_core::events::{DataAdded, DataAddedToViewer, EventBus, ViewerRenamed};
use lc_core::Time;
use tracing::{debug, info};

use crate::{DataError, DataTable, Result, REFERENCE_TIME};

/// Ordered collection of tables and the viewers showing them
pub struct DataCollection {
    /// Tables by label, in load order
    entries: IndexMap<String, Arc<DataTable>>,
    /// Labels shown in each viewer
    viewers: IndexMap<String, Vec<String>>,
    /// Optional bus notified about collection changes
    events: Option<Arc<EventBus>>,
}

impl DataCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            viewers: IndexMap::new(),
            events: None,
        }
    }

    /// Publish collection changes on `events`
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a table, returning the label it was stored under
    ///
    /// A label already in use gets a ` (n)` suffix.
    pub fn add_data(&mut self, data: DataTable, label: &str) -> String {
        let mut unique = label.to_string();
        let mut n = 1;
        while self.entries.contains_key(&unique) {
            n += 1;
            unique = format!("{} ({})", label, n);
        }

        let row_count = data.num_rows();
        self.entries.insert(unique.clone(), Arc::new(data));
        info!("Added '{}' with {} rows to the data collection", unique, row_count);

        if let Some(events) = &self.events {
            events.publish(DataAdded {
                label: unique.clone(),
                row_count,
            });
        }
        unique
    }

    /// Show a stored table in a viewer
    pub fn add_data_to_viewer(&mut self, viewer_ref: &str, label: &str) -> Result<()> {
        if !self.entries.contains_key(label) {
            return Err(DataError::UnknownData(label.to_string()));
        }

        let shown = self.viewers.entry(viewer_ref.to_string()).or_default();
        if shown.iter().any(|l| l == label) {
            return Ok(());
        }
        shown.push(label.to_string());
        debug!("Added '{}' to viewer '{}'", label, viewer_ref);

        if let Some(events) = &self.events {
            events.publish(DataAddedToViewer {
                label: label.to_string(),
                viewer_ref: viewer_ref.to_string(),
            });
        }
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&Arc<DataTable>> {
        self.entries.get(label)
    }

    /// Labels in load order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Labels shown in a viewer
    pub fn viewer_data(&self, viewer_ref: &str) -> &[String] {
        self.viewers.get(viewer_ref).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Move a viewer's contents to a new reference and announce the rename
    pub fn rename_viewer(&mut self, old_ref: &str, new_ref: &str) {
        if let Some(shown) = self.viewers.shift_remove(old_ref) {
            self.viewers.insert(new_ref.to_string(), shown);
        }
        info!("Viewer '{}' renamed to '{}'", old_ref, new_ref);

        if let Some(events) = &self.events {
            events.publish(ViewerRenamed {
                old_viewer_ref: old_ref.to_string(),
                new_viewer_ref: new_ref.to_string(),
            });
        }
    }

    /// Reference time of the first table that records one
    pub fn first_reference_time(&self) -> Option<Time> {
        self.entries.values().find_map(|data| {
            let value = data.meta().get(REFERENCE_TIME)?;
            serde_json::from_value(value.clone()).ok()
        })
    }
}

impl Default for DataCollection {
    fn default() -> Self {
        Self::new()
    }
}
