//! Player-side state owned by the external game store

pub mod action_log;
pub mod stats;
pub mod store;
