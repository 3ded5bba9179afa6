// src/extractors/mod.rs
pub mod anchors;
pub mod document;
pub mod normalize;
pub mod tables;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use {
    anchors::{AnchorRecord, Anchors},
    document::{extract_html, segments, DocumentSection, HtmlContent},
    tables::{TableData, Tables, MIN_TABLE_TEXT_LEN},
};

/// Counts and classification flags accumulated over one filing's sections.
/// Downstream filters key off these to decide whether a filing's artifacts
/// are worth persisting.
#[derive(Debug, Default)]
pub struct FilingSummary {
    pub source: String,
    pub section_count: usize,
    pub html_sections: usize,
    pub xbrl_sections: usize,
    pub anchor_count: usize,
    pub table_count: usize,
    pub form_types: Vec<String>,
}

impl FilingSummary {
    pub fn has_html(&self) -> bool {
        self.html_sections > 0
    }

    pub fn has_xbrl(&self) -> bool {
        self.xbrl_sections > 0
    }

    pub fn matches_form(&self, form_type: &str) -> bool {
        self.form_types.iter().any(|f| f == form_type)
    }
}
