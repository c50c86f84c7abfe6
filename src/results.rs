use serde::{Deserialize, Serialize};

/// One alert entry scraped from a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Title of the alert (product or device name)
    pub name: String,

    /// Identifier code published with the alert
    pub identifier: String,

    /// Publication date, kept as the site renders it
    pub date: String,
}

impl AlertRecord {
    /// Create a new alert record
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            date: date.into(),
        }
    }
}
