pub mod image;
pub mod template;

pub use image::{EmbedOutcome, embed_logo};
pub use template::{Template, WriteSummary};
