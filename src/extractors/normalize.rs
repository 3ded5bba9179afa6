// src/extractors/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;

// --- Em-dash repair constants ---
// Two encodings of U+2014 show up in real filings: the UTF-8 bytes decoded
// as Windows-1252 ("â€”"), and the bare Windows-1252 numeric reference.
// Both are rewritten to a plain triple hyphen before any fragment parsing.
const EM_DASH_MOJIBAKE: &str = "â€”";
const EM_DASH_ENTITY: &str = "&#151;";
const EM_DASH_REPLACEMENT: &str = "---";

// --- Rewrite passes (Lazy statics, applied in a fixed order) ---
static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" {2,}").expect("Failed to compile MULTI_SPACE_RE"));

static DOLLAR_TAB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\t").expect("Failed to compile DOLLAR_TAB_RE"));

static TAB_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t[\t ]+").expect("Failed to compile TAB_RUN_RE"));

static TAB_PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t\)").expect("Failed to compile TAB_PAREN_RE"));

static SPACE_TAB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" \t").expect("Failed to compile SPACE_TAB_RE"));

/// Rewrites both known em-dash encodings to `---`.
pub fn repair_em_dashes(text: &str) -> String {
    text.replace(EM_DASH_MOJIBAKE, EM_DASH_REPLACEMENT)
        .replace(EM_DASH_ENTITY, EM_DASH_REPLACEMENT)
}

/// The table-text cleanup pipeline. Order matters: dash repair, non-ASCII
/// stripping, space collapsing, then the tab repairs that remove spurious
/// column breaks around currency symbols and closing parentheses.
///
/// The tab/newline structure of the input is the extractor's own; source
/// line terminators were already dropped during cell assembly.
pub fn normalize(text: &str) -> String {
    let text = repair_em_dashes(text);

    // Every char outside the 7-bit range becomes a single space.
    let text: String = text
        .chars()
        .map(|c| if c.is_ascii() { c } else { ' ' })
        .collect();

    let text = MULTI_SPACE_RE.replace_all(&text, " ");
    let text = DOLLAR_TAB_RE.replace_all(&text, "$$");
    let text = TAB_RUN_RE.replace_all(&text, "\t");
    let text = TAB_PAREN_RE.replace_all(&text, ")");
    let text = SPACE_TAB_RE.replace_all(&text, "\t");

    let text = text.strip_prefix('\t').unwrap_or(&text);
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_mojibake_em_dash() {
        assert_eq!(repair_em_dashes("net lossâ€”continued"), "net loss---continued");
    }

    #[test]
    fn repairs_entity_em_dash() {
        assert_eq!(repair_em_dashes("net loss&#151;continued"), "net loss---continued");
    }

    #[test]
    fn em_dash_repair_is_idempotent() {
        let once = repair_em_dashes("aâ€”b&#151;c");
        assert_eq!(once, "a---b---c");
        assert_eq!(repair_em_dashes(&once), once);
    }

    #[test]
    fn strips_non_ascii_to_spaces() {
        // One multi-byte char collapses to one space, then space runs collapse.
        assert_eq!(normalize("Revenue\u{00a0}\u{00a0}up"), "Revenue up");
    }

    #[test]
    fn collapses_space_runs() {
        assert_eq!(normalize("a    b"), "a b");
    }

    #[test]
    fn merges_dollar_sign_into_next_column() {
        assert_eq!(normalize("Total\t$\t1,234\n"), "Total\t$1,234\n");
    }

    #[test]
    fn collapses_tab_runs_and_space_before_tab() {
        assert_eq!(normalize("a\t\t  b"), "a\tb");
        assert_eq!(normalize("a \tb"), "a\tb");
    }

    #[test]
    fn merges_closing_paren_into_previous_column() {
        assert_eq!(normalize("(1,234\t)\n"), "(1,234)\n");
    }

    #[test]
    fn drops_leading_tab() {
        assert_eq!(normalize("\ta\tb\n"), "a\tb\n");
    }

    #[test]
    fn pipeline_is_idempotent_on_normalized_text() {
        let raw = "Revenue\t$\t1,234  \t(56\t)\nâ€”\tnotes\u{00a0}here\n";
        let once = normalize(raw);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }
}
