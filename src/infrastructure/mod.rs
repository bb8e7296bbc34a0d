//! Concrete collaborators: the station registry, card authorizers,
//! receipt sinks and snapshot stores.

pub mod card;
pub mod in_memory;
pub mod receipts;
pub mod registry;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
