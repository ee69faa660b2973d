//! Ironhaven Core - Shared primitives for the Ironhaven simulation
//!
//! This crate provides the foundational types used by the world and game crates:
//! - Entity identifiers and packed colors
//! - Game time with millisecond timestamps
//! - Interval timers that replace independent wall-clock callbacks

pub mod time;
pub mod types;

pub use glam::{Vec2, Vec3};
pub use time::{GameTime, Interval, Millis, TimeConfig};
pub use types::{Color, EntityId};
