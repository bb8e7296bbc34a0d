use crate::domain::ports::SnapshotStore;
use crate::domain::station::Station;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing station snapshots.
pub const CF_STATIONS: &str = "stations";

/// A persistent snapshot store backed by RocksDB.
///
/// Stations are keyed by id and stored as JSON, ledger included, so an
/// in-flight transaction survives a restart.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_stations = ColumnFamilyDescriptor::new(CF_STATIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_stations])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn missing_cf() -> CheckoutError {
        CheckoutError::Internal(Box::new(std::io::Error::other(
            "Stations column family not found",
        )))
    }
}

#[async_trait]
impl SnapshotStore for RocksDBStore {
    async fn store(&self, station: Station) -> Result<()> {
        let cf = self.db.cf_handle(CF_STATIONS).ok_or_else(Self::missing_cf)?;
        let value = serde_json::to_vec(&station)?;
        self.db.put_cf(&cf, station.id().as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, station_id: &str) -> Result<Option<Station>> {
        let cf = self.db.cf_handle(CF_STATIONS).ok_or_else(Self::missing_cf)?;
        match self.db.get_cf(&cf, station_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
