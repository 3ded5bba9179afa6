// src/storage/mod.rs
use crate::extractors::{AnchorRecord, FilingSummary, TableData};
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager rooted at the specified base directory.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_dir: base_path })
    }

    /// The per-filing artifact directory, created on first use.
    pub fn filing_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let dir = self.base_dir.join(stem);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Writes each extracted table's normalized text as a numbered file.
    pub fn save_tables(
        &self,
        stem: &str,
        tables: &[TableData<'_>],
    ) -> Result<Vec<PathBuf>, StorageError> {
        let dir = self.filing_dir(stem)?;
        let mut paths = Vec::with_capacity(tables.len());

        for (i, table) in tables.iter().enumerate() {
            let path = dir.join(format!("table_{:03}.txt", i + 1));
            fs::write(&path, &table.text)?;
            paths.push(path);
        }

        tracing::info!("Saved {} table(s) under {}", paths.len(), dir.display());
        Ok(paths)
    }

    /// Writes all anchors of a filing as one JSON document.
    pub fn save_anchors(
        &self,
        stem: &str,
        anchors: &[AnchorRecord<'_>],
    ) -> Result<PathBuf, StorageError> {
        let dir = self.filing_dir(stem)?;
        let path = dir.join("anchors.json");

        let records: Vec<_> = anchors
            .iter()
            .map(|a| {
                serde_json::json!({
                    "href": a.href,
                    "name": a.name,
                    "text": a.text,
                })
            })
            .collect();

        let body = serde_json::to_string_pretty(&records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, body)?;

        tracing::info!("Saved {} anchor(s) to {}", anchors.len(), path.display());
        Ok(path)
    }

    /// Writes the filing summary plus an extraction timestamp.
    pub fn save_metadata(
        &self,
        stem: &str,
        summary: &FilingSummary,
    ) -> Result<PathBuf, StorageError> {
        let dir = self.filing_dir(stem)?;
        let path = dir.join("filing_meta.json");

        let metadata = serde_json::json!({
            "source": summary.source,
            "section_count": summary.section_count,
            "html_sections": summary.html_sections,
            "xbrl_sections": summary.xbrl_sections,
            "anchor_count": summary.anchor_count,
            "table_count": summary.table_count,
            "form_types": summary.form_types,
            "has_html": summary.has_html(),
            "has_xbrl": summary.has_xbrl(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let body = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, body)?;

        tracing::info!("Saved metadata to {}", path.display());
        Ok(path)
    }
}
