//! Application layer containing the checkout orchestration.
//!
//! The `TransactionCoordinator` owns the station registry and is the only
//! place where station state changes. Each station is guarded by its own
//! lock so kiosks never wait on each other.

pub mod commands;
pub mod coordinator;
