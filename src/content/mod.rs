//! Content module - display-shaped post types and rich text conversion

mod post;
pub mod richtext;

pub use post::{PostDetail, PostSummary};
