pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

pub use html::{FieldOutcome, RecordExtraction, RecordExtractor};
