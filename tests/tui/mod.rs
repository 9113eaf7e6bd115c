//! Headless end-to-end tests against the built binary.

pub mod headless_test;
