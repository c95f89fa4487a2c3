//! Event taxonomy for the HotCRP action log.

pub mod classify;

pub use classify::{EventKind, classify};
