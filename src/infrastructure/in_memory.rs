use crate::domain::ports::SnapshotStore;
use crate::domain::station::Station;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for station snapshots.
///
/// Uses `Arc<RwLock<HashMap<String, Station>>>` to allow shared concurrent access.
/// Nothing survives the process; used when no database path is configured.
#[derive(Default, Clone)]
pub struct InMemorySnapshotStore {
    stations: Arc<RwLock<HashMap<String, Station>>>,
}

impl InMemorySnapshotStore {
    /// Creates a new, empty in-memory snapshot store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn store(&self, station: Station) -> Result<()> {
        let mut stations = self.stations.write().await;
        stations.insert(station.id().to_string(), station);
        Ok(())
    }

    async fn get(&self, station_id: &str) -> Result<Option<Station>> {
        let stations = self.stations.read().await;
        Ok(stations.get(station_id).cloned())
    }
}
