// src/extractors/tables.rs
//
// Forward-only extraction of <table> elements into tab/newline-delimited
// text. Filing HTML is full of decorative layout tables; candidates are
// screened for genuine row/cell markup before the fragment parser runs,
// and anything whose cleaned text stays under MIN_TABLE_TEXT_LEN is
// dropped as having little or no real content.

use crate::extractors::normalize::{normalize, repair_em_dashes};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::hash::{Hash, Hasher};

/// Tables whose normalized text is shorter than this are never yielded.
/// Empirically tuned against real filings; do not re-derive.
pub const MIN_TABLE_TEXT_LEN: usize = 100;

static TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<table(?:\s[^>]*)?>.*?</table>").expect("Failed to compile TABLE_RE")
});

static ROW_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</tr>").expect("Failed to compile ROW_CLOSE_RE"));

static CELL_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</td>").expect("Failed to compile CELL_CLOSE_RE"));

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("Failed to compile PARAGRAPH_SELECTOR"));

static DIV_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div").expect("Failed to compile DIV_SELECTOR"));

/// One extracted table: the raw markup span (borrowed from the owning HTML
/// content) and its normalized text, rows newline-separated and cells
/// tab-separated.
///
/// Equality and hashing consider only the raw span, so repeated yields of
/// the same markup can be detected regardless of normalization.
#[derive(Debug, Clone)]
pub struct TableData<'a> {
    raw: &'a str,
    pub text: String,
}

impl<'a> TableData<'a> {
    pub fn raw(&self) -> &'a str {
        self.raw
    }
}

impl PartialEq for TableData<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for TableData<'_> {}

impl Hash for TableData<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

/// Lazy, single-pass iterator over the tables of an HTML view. Candidates
/// that are decorative, unparseable, or below the length threshold are
/// skipped internally; the consumer only ever sees kept tables.
pub struct Tables<'a> {
    html: &'a str,
    cursor: usize,
}

impl<'a> Tables<'a> {
    pub fn new(html: &'a str) -> Self {
        Tables { html, cursor: 0 }
    }
}

impl<'a> Iterator for Tables<'a> {
    type Item = TableData<'a>;

    fn next(&mut self) -> Option<TableData<'a>> {
        loop {
            let m = TABLE_RE.find(&self.html[self.cursor..])?;
            let raw = &self.html[self.cursor + m.start()..self.cursor + m.end()];
            self.cursor += m.end();

            if !has_tabular_markup(raw) {
                tracing::debug!("skipping table candidate without row/cell markup");
                continue;
            }

            match extract_table_text(raw) {
                Some(text) if text.len() >= MIN_TABLE_TEXT_LEN => {
                    return Some(TableData { raw, text });
                }
                Some(text) => {
                    tracing::debug!(
                        "skipping table with little or no real content ({} chars)",
                        text.len()
                    );
                }
                None => {
                    tracing::warn!("skipping unparseable table candidate ({} bytes)", raw.len());
                }
            }
        }
    }
}

/// Decorative layout tables carry no row/cell close markers; real tabular
/// data carries both.
fn has_tabular_markup(candidate: &str) -> bool {
    ROW_CLOSE_RE.is_match(candidate) && CELL_CLOSE_RE.is_match(candidate)
}

/// Parses one candidate span in isolation and assembles its text: rows
/// newline-terminated, non-empty cells tab-separated, then the full
/// normalization pipeline. Returns None when the fragment parser produces
/// no table element at all.
fn extract_table_text(span: &str) -> Option<String> {
    let repaired = repair_em_dashes(span);
    let fragment = Html::parse_fragment(&repaired);

    // Normally exactly one table at this depth, but stay defensive about
    // what the fragment parser produced.
    let tables: Vec<_> = fragment.select(&TABLE_SELECTOR).collect();
    if tables.is_empty() {
        return None;
    }

    let mut out = String::new();
    for table in tables {
        for row in table.select(&ROW_SELECTOR) {
            let mut row_text = String::new();
            for cell in row.select(&CELL_SELECTOR) {
                let cell_text = cell_text(cell);
                if cell_text.is_empty() {
                    continue;
                }
                if !row_text.is_empty() {
                    row_text.push('\t');
                }
                row_text.push_str(&cell_text);
            }
            if !row_text.is_empty() {
                out.push_str(&row_text);
                out.push('\n');
            }
        }
    }

    Some(normalize(&out))
}

/// Cell text with fallbacks: paragraph fragments, then div fragments, then
/// the cell's own text. Source line terminators never survive; the
/// extractor injects its own line structure.
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut text = joined_fragment_text(cell, &PARAGRAPH_SELECTOR);
    if text.is_empty() {
        text = joined_fragment_text(cell, &DIV_SELECTOR);
    }
    if text.is_empty() {
        text = strip_line_breaks(&cell.text().collect::<String>())
            .trim()
            .to_string();
    }
    text
}

/// Concatenates the text of every matching sub-element, each fragment with
/// a single leading space.
fn joined_fragment_text(cell: ElementRef<'_>, selector: &Selector) -> String {
    let mut joined = String::new();
    for el in cell.select(selector) {
        let flat = strip_line_breaks(&el.text().collect::<String>());
        let flat = flat.trim();
        if flat.is_empty() {
            continue;
        }
        joined.push(' ');
        joined.push_str(flat);
    }
    joined
}

fn strip_line_breaks(text: &str) -> String {
    text.replace(['\n', '\r'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padding_row() -> String {
        format!("<tr><td>{}</td></tr>", "x".repeat(120))
    }

    #[test]
    fn simple_row_extracts_as_tab_separated_line() {
        let text = extract_table_text("<table><tr><td>A</td><td>B</td></tr></table>");
        assert_eq!(text.as_deref(), Some("A\tB\n"));
    }

    #[test]
    fn short_table_is_dropped_by_threshold() {
        let html = "<table><tr><td>A</td><td>B</td></tr></table>";
        assert!(Tables::new(html).next().is_none());
    }

    #[test]
    fn padded_table_is_kept() {
        let html = format!("<table><tr><td>A</td><td>B</td></tr>{}</table>", padding_row());
        let tables: Vec<_> = Tables::new(&html).collect();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].text.starts_with("A\tB\n"));
        assert!(tables[0].text.len() >= MIN_TABLE_TEXT_LEN);
    }

    #[test]
    fn decorative_table_without_row_markup_is_skipped() {
        // Two decorative variants, exact-case and mixed-case; only the real
        // table in the middle survives.
        let html = format!(
            r#"<table width="100%"><img src="spacer.gif"></table><table>{}</table><TABLE Width="5"><IMG src="rule.gif"></TABLE>"#,
            padding_row()
        );
        let tables: Vec<_> = Tables::new(&html).collect();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].raw().starts_with("<table>"));
    }

    #[test]
    fn markup_presence_check_accepts_mixed_case() {
        let html = format!("<TABLE><TR><TD>{}</TD></TR></TABLE>", "y".repeat(120));
        let tables: Vec<_> = Tables::new(&html).collect();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].text.starts_with("yyy"));
    }

    #[test]
    fn paragraph_fragments_win_over_cell_text() {
        let html = "<table><tr><td><p>Foo</p><p>Bar</p>stray</td></tr></table>";
        let text = extract_table_text(html).unwrap();
        assert_eq!(text, " Foo Bar\n");
    }

    #[test]
    fn div_fragments_are_the_second_fallback() {
        let html = "<table><tr><td><div>Left</div><div>Right</div></td></tr></table>";
        let text = extract_table_text(html).unwrap();
        assert_eq!(text, " Left Right\n");
    }

    #[test]
    fn source_line_breaks_do_not_leak_into_rows() {
        let html = "<table><tr><td>multi\nline\r\ncell</td><td>B</td></tr></table>";
        let text = extract_table_text(html).unwrap();
        assert_eq!(text, "multilinecell\tB\n");
    }

    #[test]
    fn currency_and_paren_columns_are_merged() {
        let html = "<table><tr><td>$</td><td>1,234</td></tr><tr><td>(56</td><td>)</td></tr></table>";
        let text = extract_table_text(html).unwrap();
        assert_eq!(text, "$1,234\n(56)\n");
    }

    #[test]
    fn em_dash_mojibake_is_repaired_before_parsing() {
        let html = "<table><tr><td>net lossâ€”continued</td></tr></table>";
        let text = extract_table_text(html).unwrap();
        assert_eq!(text, "net loss---continued\n");
    }

    #[test]
    fn equality_considers_only_the_raw_span() {
        let a = TableData { raw: "<table>same</table>", text: "one".into() };
        let b = TableData { raw: "<table>same</table>", text: "two".into() };
        let c = TableData { raw: "<table>other</table>", text: "one".into() };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_rows_produce_no_lines() {
        let html = format!(
            "<table><tr><td></td><td>  </td></tr>{}</table>",
            padding_row()
        );
        let tables: Vec<_> = Tables::new(&html).collect();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].text.starts_with("xxx"));
    }
}
