//! Helper functions for date formatting and HTML handling

mod date;
mod html;

pub use date::*;
pub use html::*;
