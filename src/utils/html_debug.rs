// src/utils/html_debug.rs
use crate::utils::error::StorageError;
use std::fs;
use std::path::Path;

/// Byte span of `part` within `parent`, when `part` is a sub-view borrowed
/// from `parent`. The extractors hand out zero-copy views, so identity,
/// not content search, locates them.
pub fn span_in(parent: &str, part: &str) -> Option<(usize, usize)> {
    let offset = (part.as_ptr() as usize).checked_sub(parent.as_ptr() as usize)?;
    if offset + part.len() > parent.len() {
        return None;
    }
    Some((offset, offset + part.len()))
}

/// Writes a copy of `html` with the given spans wrapped in highlight
/// markers, for eyeballing what the extractors matched. Overlapping spans
/// (anchors inside tables) keep the earlier-starting one.
pub fn save_annotated_html(
    html: &str,
    path: &Path,
    highlights: &[(usize, usize, &str)],
) -> Result<(), StorageError> {
    let mut sorted = highlights.to_vec();
    sorted.sort_by_key(|h| h.0);

    let mut out = String::with_capacity(html.len() + 256);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    out.push_str(".hl-anchor { background-color: #90EE90; }\n");
    out.push_str(".hl-table { outline: 2px solid #FFA500; }\n");
    out.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    for (start, end, kind) in sorted {
        if start < last_pos || end > html.len() {
            continue;
        }
        out.push_str(&html[last_pos..start]);
        out.push_str(&format!(
            "<span class=\"hl-{}\" title=\"bytes {}-{}\">",
            kind, start, end
        ));
        out.push_str(&html[start..end]);
        out.push_str("</span>");
        last_pos = end;
    }
    out.push_str(&html[last_pos..]);
    out.push_str("\n</body>\n</html>");

    fs::write(path, out)?;
    tracing::info!("Saved annotated debug HTML to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_in_locates_borrowed_subview() {
        let parent = String::from("0123456789");
        let part = &parent[3..7];
        assert_eq!(span_in(&parent, part), Some((3, 7)));
    }

    #[test]
    fn span_in_rejects_foreign_slices() {
        let parent = String::from("abcdef");
        let other = String::from("zzzzzzzzzzzz");
        // A slice from an unrelated allocation must not produce a span.
        assert_eq!(span_in(&parent, &other[8..]), None);
    }
}
