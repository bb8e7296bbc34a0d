use crate::domain::ports::SnapshotStore;
use crate::domain::station::Station;
use crate::error::{CheckoutError, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Shared handle to one station. Holding its lock serializes every
/// operation on that kiosk.
pub type StationHandle = Arc<Mutex<Station>>;

/// Owns every station of a site for the lifetime of the process.
///
/// The map itself is only read after construction, so lookups take the
/// shared side of the `RwLock` and contend with nothing but each other.
/// Mutation happens through the per-station `Mutex` returned by
/// [`StationRegistry::find_by_id`], never on a copy.
#[derive(Default, Clone)]
pub struct StationRegistry {
    stations: Arc<RwLock<HashMap<String, StationHandle>>>,
}

impl StationRegistry {
    /// Builds a registry from a bounded list of stations.
    ///
    /// When an id appears more than once the first station wins.
    pub fn from_stations(stations: impl IntoIterator<Item = Station>) -> Self {
        let mut map = HashMap::new();
        for station in stations {
            match map.entry(station.id().to_string()) {
                Entry::Occupied(_) => {
                    warn!(station_id = %station.id(), "duplicate station id, keeping the first definition");
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(Mutex::new(station)));
                }
            }
        }
        Self {
            stations: Arc::new(RwLock::new(map)),
        }
    }

    /// Builds a registry from configured stations, replacing each with its
    /// stored snapshot when one exists.
    ///
    /// A snapshot that cannot be read or fails [`Station::validate`] is
    /// discarded and the configured station is used instead.
    pub async fn restore(stations: Vec<Station>, store: &dyn SnapshotStore) -> Self {
        let mut restored = Vec::with_capacity(stations.len());
        for station in stations {
            let station = match store.get(station.id()).await {
                Ok(Some(saved)) if saved.id() != station.id() => {
                    warn!(station_id = %station.id(), snapshot_id = %saved.id(), "snapshot id does not match, discarding");
                    station
                }
                Ok(Some(saved)) => match saved.validate() {
                    Ok(()) => {
                        info!(station_id = %saved.id(), state = %saved.transaction_state(), "restored station snapshot");
                        saved
                    }
                    Err(e) => {
                        warn!(station_id = %station.id(), error = %e, "invalid station snapshot, using configuration");
                        station
                    }
                },
                Ok(None) => station,
                Err(e) => {
                    warn!(station_id = %station.id(), error = %e, "unreadable station snapshot, using configuration");
                    station
                }
            };
            restored.push(station);
        }
        Self::from_stations(restored)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<StationHandle> {
        let stations = self.stations.read().await;
        debug!(station_id = %id, "station lookup");
        stations
            .get(id)
            .cloned()
            .ok_or_else(|| CheckoutError::StationNotFound(id.to_string()))
    }

    /// All station ids, sorted.
    pub async fn ids(&self) -> Vec<String> {
        let stations = self.stations.read().await;
        let mut ids: Vec<String> = stations.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.stations.read().await.len()
    }

    /// A point-in-time copy of every station, sorted by id.
    ///
    /// Stations are locked one at a time, so the copy is consistent per
    /// station but not across stations.
    pub async fn snapshot(&self) -> Vec<Station> {
        let handles: Vec<StationHandle> = {
            let stations = self.stations.read().await;
            stations.values().cloned().collect()
        };

        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(handle.lock().await.clone());
        }
        out.sort_by(|a, b| a.id().cmp(b.id()));
        out
    }
}
