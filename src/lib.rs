//! smart-search - an interactive search box with debounced exact and fuzzy
//! suggestions and an "add term" fallback.
//!
//! This library exposes the core modules for use by the binary and the
//! integration tests.

pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod tui;
