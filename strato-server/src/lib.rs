//! Strato Server Library
//!
//! This library exposes the server's internal modules for integration testing.

pub mod args;
pub mod connection;
pub mod constants;
pub mod db;
pub mod files;
pub mod handlers;
pub mod sessions;
