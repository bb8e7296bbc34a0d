//! Domain types and pure decision functions.
//!
//! Nothing in here performs I/O or locking; the ports describe the
//! collaborators the application layer talks to.

pub mod item;
pub mod payment;
pub mod ports;
pub mod receipt;
pub mod station;
pub mod weight;
