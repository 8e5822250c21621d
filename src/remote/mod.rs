//! Remote repository client
//!
//! Translates item operations into HTTP calls against the `/v1/` REST API:
//! - `POST items/` create, `PUT items/` full-record update
//! - `GET items/{userId}` per-user read
//! - `GET stats/{userId}/...` and `GET suggestions/{userId}` read-only queries

pub mod client;
pub mod stats;

pub use client::RemoteRepository;
pub use stats::Statistic;
