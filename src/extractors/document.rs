// src/extractors/document.rs
//
// Splits a raw filing container into <DOCUMENT> sections and classifies
// the HTML-bearing ones. Everything here is a borrowed view into the
// caller's filing buffer; nothing is copied.

use crate::extractors::anchors::Anchors;
use crate::extractors::tables::Tables;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;

// Container delimiters are upper-case in EDGAR full-submission files;
// the match is deliberately case-sensitive.
static DOCUMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<DOCUMENT>(.*?)</DOCUMENT>").expect("Failed to compile DOCUMENT_RE")
});

// Header fields sit on their own lines inside a section.
static FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^<FILENAME>(.*)").expect("Failed to compile FILENAME_RE"));

static TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^<TYPE>(.*)").expect("Failed to compile TYPE_RE"));

const TEXT_OPEN: &str = "<TEXT>";
const TEXT_CLOSE: &str = "</TEXT>";
const XBRL_OPEN: &str = "<XBRL>";

/// Declared file names ending in this (any casing) are candidate HTML.
const HTML_EXTENSION: &str = ".htm";

/// One `<DOCUMENT>`-delimited sub-document, borrowed from the filing buffer.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSection<'a> {
    body: &'a str,
}

impl<'a> DocumentSection<'a> {
    /// The section content between the container delimiters.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// The declared file name from the section's `<FILENAME>` line.
    pub fn file_name(&self) -> Result<&'a str, ExtractError> {
        header_field(self.body, &FILENAME_RE, "FILENAME")
    }

    /// The declared document type from the section's `<TYPE>` line.
    pub fn file_type(&self) -> Result<&'a str, ExtractError> {
        header_field(self.body, &TYPE_RE, "TYPE")
    }
}

fn header_field<'a>(
    body: &'a str,
    re: &Regex,
    field: &'static str,
) -> Result<&'a str, ExtractError> {
    re.captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .ok_or(ExtractError::MissingField(field))
}

/// Lazily yields the `<DOCUMENT>` sections of a filing container, in file
/// order. A fresh iterator over the same buffer is cheap; the scan itself
/// is a pure function of the buffer.
pub fn segments(buffer: &str) -> impl Iterator<Item = DocumentSection<'_>> + '_ {
    DOCUMENT_RE.captures_iter(buffer).filter_map(|cap| {
        cap.get(1).map(|m| DocumentSection { body: m.as_str() })
    })
}

/// The HTML payload of a section, with the `<TEXT>` wrapper removed.
/// Empty when the section is not HTML-bearing.
#[derive(Debug, Clone, Copy)]
pub struct HtmlContent<'a> {
    text: &'a str,
}

impl<'a> HtmlContent<'a> {
    pub fn empty() -> Self {
        HtmlContent { text: "" }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lazy anchor extraction over this content (see `anchors.rs`).
    pub fn anchors(&self) -> Anchors<'a> {
        Anchors::new(self.text)
    }

    /// Lazy table extraction over this content (see `tables.rs`).
    pub fn tables(&self) -> Tables<'a> {
        Tables::new(self.text)
    }
}

/// Pulls the HTML payload out of a section.
///
/// Sections whose declared file name is not `.htm` yield empty content (a
/// classification negative, not an error). A missing `<TEXT>` wrapper or a
/// missing final `</TEXT>` means the filing is truncated and is reported as
/// `MalformedSection`. Some filings wrap an XBRL instance document in an
/// `.htm`-named section; those are reported as `MisclassifiedXbrl` so the
/// caller can skip them without treating the filing as broken.
pub fn extract_html<'a>(section: &DocumentSection<'a>) -> Result<HtmlContent<'a>, ExtractError> {
    let name = section.file_name()?;
    if !name.to_ascii_lowercase().ends_with(HTML_EXTENSION) {
        return Ok(HtmlContent::empty());
    }

    let body = section.body();
    let open = body.find(TEXT_OPEN).ok_or_else(|| {
        ExtractError::MalformedSection(format!("no {} wrapper in section '{}'", TEXT_OPEN, name))
    })?;
    let after_open = &body[open + TEXT_OPEN.len()..];

    // Skip the remainder of the <TEXT> line; it is wrapper boilerplate,
    // not document content.
    let start = after_open.find('\n').map(|i| i + 1).unwrap_or_else(|| after_open.len());
    let wrapped = &after_open[start..];

    let end = wrapped.rfind(TEXT_CLOSE).ok_or_else(|| {
        ExtractError::MalformedSection(format!("no {} wrapper in section '{}'", TEXT_CLOSE, name))
    })?;
    let html = &wrapped[..end];

    if html.contains(XBRL_OPEN) {
        return Err(ExtractError::MisclassifiedXbrl(name.to_string()));
    }

    Ok(HtmlContent { text: html })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(sections: &[&str]) -> String {
        sections
            .iter()
            .map(|body| format!("<DOCUMENT>\n{}\n</DOCUMENT>", body))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn yields_sections_in_file_order() {
        let buffer = container(&[
            "<TYPE>10-K\n<FILENAME>a.htm\n<TEXT>\nfirst\n</TEXT>",
            "<TYPE>EX-21\n<FILENAME>b.htm\n<TEXT>\nsecond\n</TEXT>",
            "<TYPE>GRAPHIC\n<FILENAME>c.jpg\n<TEXT>\nthird\n</TEXT>",
        ]);

        let sections: Vec<_> = segments(&buffer).collect();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].body().contains("first"));
        assert!(sections[2].body().contains("third"));
    }

    #[test]
    fn no_sections_in_unmarked_buffer() {
        assert_eq!(segments("just some text, no delimiters").count(), 0);
    }

    #[test]
    fn reads_header_fields_from_their_own_lines() {
        let buffer = container(&["<TYPE>10-K\n<SEQUENCE>1\n<FILENAME>d10k.htm\n<TEXT>\nx\n</TEXT>"]);
        let section = segments(&buffer).next().unwrap();
        assert_eq!(section.file_name().unwrap(), "d10k.htm");
        assert_eq!(section.file_type().unwrap(), "10-K");
    }

    #[test]
    fn missing_header_field_is_an_error() {
        let buffer = container(&["<TYPE>10-K\n<TEXT>\nx\n</TEXT>"]);
        let section = segments(&buffer).next().unwrap();
        assert!(matches!(
            section.file_name(),
            Err(ExtractError::MissingField("FILENAME"))
        ));
    }

    #[test]
    fn header_tag_mid_line_does_not_count() {
        let buffer = container(&["<TYPE>10-K\ntext mentioning <FILENAME>inline\n<TEXT>\nx\n</TEXT>"]);
        let section = segments(&buffer).next().unwrap();
        assert!(section.file_name().is_err());
    }

    #[test]
    fn non_html_file_name_yields_empty_content() {
        let buffer = container(&["<TYPE>GRAPHIC\n<FILENAME>logo.jpg\n<TEXT>\n<p>hi</p>\n</TEXT>"]);
        let section = segments(&buffer).next().unwrap();
        let html = extract_html(&section).unwrap();
        assert!(html.is_empty());
    }

    #[test]
    fn html_extension_check_is_case_insensitive() {
        let buffer = container(&["<TYPE>10-K\n<FILENAME>D10K.HTM\n<TEXT>\n<p>hi</p>\n</TEXT>"]);
        let section = segments(&buffer).next().unwrap();
        let html = extract_html(&section).unwrap();
        assert_eq!(html.text().trim(), "<p>hi</p>");
    }

    #[test]
    fn skips_one_line_after_text_open() {
        let buffer = container(&[
            "<TYPE>10-K\n<FILENAME>a.htm\n<TEXT>boilerplate on wrapper line\n<html>body</html>\n</TEXT>",
        ]);
        let section = segments(&buffer).next().unwrap();
        let html = extract_html(&section).unwrap();
        assert!(!html.text().contains("boilerplate"));
        assert!(html.text().contains("<html>body</html>"));
    }

    #[test]
    fn truncates_at_last_text_close() {
        let buffer = container(&[
            "<TYPE>10-K\n<FILENAME>a.htm\n<TEXT>\ninner </TEXT> quoted\nreal end\n</TEXT>",
        ]);
        let section = segments(&buffer).next().unwrap();
        let html = extract_html(&section).unwrap();
        assert!(html.text().contains("quoted"));
        assert!(html.text().contains("real end"));
    }

    #[test]
    fn missing_text_close_is_malformed() {
        let buffer = container(&["<TYPE>10-K\n<FILENAME>a.htm\n<TEXT>\ntruncated filing"]);
        let section = segments(&buffer).next().unwrap();
        assert!(matches!(
            extract_html(&section),
            Err(ExtractError::MalformedSection(_))
        ));
    }

    #[test]
    fn xbrl_behind_html_name_is_rejected() {
        let buffer = container(&[
            "<TYPE>EX-101\n<FILENAME>instance.htm\n<TEXT>\n<XBRL>\n<xbrli:xbrl/>\n</XBRL>\n</TEXT>",
        ]);
        let section = segments(&buffer).next().unwrap();
        assert!(matches!(
            extract_html(&section),
            Err(ExtractError::MisclassifiedXbrl(_))
        ));
    }
}
