//! Shared model for the proxscan kiosk: configuration, paths, wireless scan
//! parsing, host facts and the discovered/lab device stores.

pub mod config;
pub mod host;
pub mod network;
pub mod platform;
pub mod scan;
pub mod store;
