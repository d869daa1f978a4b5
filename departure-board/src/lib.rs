//! Live departure board for the nearest commuter rail station.
//!
//! Finds the user's position, asks a backend for the closest station's next
//! departures, and keeps a board of them current: relative times tick every
//! second, data refreshes every 30 seconds, and an optional filter keeps only
//! Helsinki-bound trains.

pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod domain;
pub mod location;
pub mod render;
