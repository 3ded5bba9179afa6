// src/extractors/anchors.rs
//
// Forward-only anchor extraction. Filing boilerplate routinely nests <a>
// elements inside each other, which is malformed HTML; the scan below
// matches each outer anchor to its true closing tag with an explicit
// depth counter, so nested anchors are absorbed instead of double-counted.

use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static ANCHOR_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<a>|<a\s").expect("Failed to compile ANCHOR_OPEN_RE"));

// Open and close markers in one alternation so a single forward scan sees
// them in document order.
static ANCHOR_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</a>|<a>|<a\s").expect("Failed to compile ANCHOR_TOKEN_RE"));

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to compile ANCHOR_SELECTOR"));

/// One outer anchor. `href` and `name` are independent; either or both may
/// be empty. `raw` is the full markup span, borrowed from the owning
/// HTML content.
#[derive(Debug, Clone)]
pub struct AnchorRecord<'a> {
    pub href: String,
    pub name: String,
    pub text: String,
    pub raw: &'a str,
}

/// Lazy, single-pass iterator over the outer anchors of an HTML view.
/// Yields `Err(UnterminatedAnchor)` once and then fuses if an anchor never
/// closes; the filing is malformed beyond recovery at that point.
pub struct Anchors<'a> {
    html: &'a str,
    cursor: usize,
    failed: bool,
}

impl<'a> Anchors<'a> {
    pub fn new(html: &'a str) -> Self {
        Anchors { html, cursor: 0, failed: false }
    }

    /// Scans from `from` for the close matching an anchor opened with
    /// `depth` levels already on the stack. Returns the offset just past
    /// the matching close. Explicit loop, not recursion: adversarial
    /// nesting depth must not translate into call-stack depth.
    fn find_matching_close(&self, from: usize, mut depth: usize) -> Option<usize> {
        let mut pos = from;
        loop {
            let tok = ANCHOR_TOKEN_RE.find(&self.html[pos..])?;
            let tok_end = pos + tok.end();
            if tok.as_str().as_bytes()[1] == b'/' {
                depth -= 1;
                if depth == 0 {
                    return Some(tok_end);
                }
            } else {
                depth += 1;
            }
            pos = tok_end;
        }
    }
}

impl<'a> Iterator for Anchors<'a> {
    type Item = Result<AnchorRecord<'a>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let open = ANCHOR_OPEN_RE.find(&self.html[self.cursor..])?;
        let span_start = self.cursor + open.start();

        match self.find_matching_close(self.cursor + open.end(), 1) {
            Some(span_end) => {
                let raw = &self.html[span_start..span_end];
                self.cursor = span_end;
                Some(Ok(parse_anchor(raw)))
            }
            None => {
                self.failed = true;
                Some(Err(ExtractError::UnterminatedAnchor(span_start)))
            }
        }
    }
}

/// Parses one isolated anchor span and pulls the outer anchor's attributes
/// and display text.
fn parse_anchor(raw: &str) -> AnchorRecord<'_> {
    let fragment = Html::parse_fragment(raw);
    let (href, name, text) = match fragment.select(&ANCHOR_SELECTOR).next() {
        Some(a) => (
            a.value().attr("href").unwrap_or("").to_string(),
            a.value().attr("name").unwrap_or("").to_string(),
            a.text().collect::<String>(),
        ),
        None => Default::default(),
    };
    AnchorRecord { href, name, text, raw }
}
