//! Library exports for the shorty administration client
//!
//! This module exposes the building blocks of the admin front-end for the
//! CLI binary and for integration tests.

pub mod actions;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod list;
pub mod model;
pub mod probe;
pub mod qr;
pub mod token;
pub mod transport;
pub mod validate;
