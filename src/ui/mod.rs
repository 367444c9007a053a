//! UI module
//!
//! Terminal components of the status view:
//! - Styles for consistent theming
//! - Status bar
//! - Details panel

mod details;
mod status_bar;
mod styles;

pub use details::{Details, max_scroll};
pub use status_bar::StatusBar;
pub use styles::Styles;
