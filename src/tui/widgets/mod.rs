//! TUI widgets for smart-search.

pub mod fallback;
pub mod header;
pub mod input;
pub mod spinner;
pub mod suggestions;
pub mod toast;
