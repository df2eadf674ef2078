//! The preview rendering pipeline.
//!
//! Kept pure on purpose: it takes parsed page content and a clock reading,
//! and produces deterministic HTML. State lives with the callers.

pub mod html;
pub mod markdown;
pub mod sections;
pub mod wrapper;

pub use html::escape_html;
pub use markdown::markdown_to_html;
pub use sections::{render_block, render_section, video_embed_url};
pub use wrapper::{WrapOptions, wrap_page};
