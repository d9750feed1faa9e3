//! Live railroad crossing status, ranked by proximity.
//!
//! Fetches the list of monitored crossings, enriches each with its live
//! blocked/clear state, and keeps the list ordered nearest-first as the
//! viewer's reference point moves.

pub mod cache;
pub mod config;
pub mod domain;
pub mod enrich;
pub mod feed;
pub mod places;
pub mod proximity;
pub mod view;
