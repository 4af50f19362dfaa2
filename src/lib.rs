//! fluxdash - dashboard backend for time-series databases
//!
//! Manages sources (connections to a time-series database), per-(source,
//! user) explorations (saved queries), and proxies raw queries to the
//! configured backend. Each capability is an abstract contract with
//! interchangeable implementations, bound once at startup.

pub mod cli;
pub mod http_server;
pub mod memory;
pub mod persist;
pub mod remote;
pub mod store;
pub mod validation;
