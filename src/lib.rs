pub mod cache;
pub mod color;
pub mod common;
pub mod geometry;
pub mod message;
pub mod palette;
pub mod persist;
pub mod selection;
pub mod signal;
pub mod state;
pub mod tiles;
pub mod update;
