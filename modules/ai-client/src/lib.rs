//! Minimal Anthropic Messages API client for structured extraction.

pub mod claude;
pub mod util;

pub use claude::Claude;
pub use util::{json_payload, truncate_to_char_boundary};
