//! Database models and wire/config models of the lead tracker.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod lead;
pub mod saved_list;
pub mod user;
pub mod zmq;
