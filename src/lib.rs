//! Settlement Sync - Two-party settlement approval workflow
//!
//! One party submits an amount, the other approves or rejects it, and both
//! observe the current state through a polling client. The server side
//! owns the single settlement record and enforces its lifecycle; the client
//! side keeps an eventually-consistent copy.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
