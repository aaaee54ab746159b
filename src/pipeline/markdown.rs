//! Markdown structuring: turn a page of extracted plain text into Markdown.
//!
//! PDF text extraction yields hard-wrapped lines with no markup. This stage
//! applies cheap, deterministic heuristics to recover structure:
//!
//! - **Headings**: short lines without terminal punctuation that are
//!   ALL CAPS (`##`) or Title Case (`###`)
//! - **Paragraphs**: consecutive wrapped lines re-flowed into one block
//! - **Hyphenation repair**: `exam-` + `ple` at a line break becomes `example`
//! - **Bullets**: `•`, `◦`, `▪` and dash markers normalised to `- `
//!
//! The heuristics are intentionally conservative: a false heading is far
//! more damaging than a missed one, so ambiguous lines stay body text.
//! Callers that want the extracted text verbatim disable this stage with
//! `ConversionConfig::structure = false`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lines longer than this are never headings, no matter their casing.
const MAX_HEADING_LEN: usize = 80;

/// Structure one page of extracted text as Markdown.
pub fn structure_page(text: &str) -> String {
    let text = repair_hyphenation(text);

    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph = String::new();

    let flush = |paragraph: &mut String, blocks: &mut Vec<String>| {
        if !paragraph.is_empty() {
            blocks.push(std::mem::take(paragraph));
        }
    };

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(item) = bullet_item(trimmed) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(format!("- {item}"));
            continue;
        }

        // Headings are only recognised at a paragraph boundary: a capitalised
        // line in the middle of running text is just a wrapped sentence.
        if paragraph.is_empty() {
            if let Some(heading) = as_heading(trimmed) {
                blocks.push(heading);
                continue;
            }
        }

        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        paragraph.push_str(trimmed);
    }
    flush(&mut paragraph, &mut blocks);

    blocks.join("\n\n")
}

// ── Hyphenation ──────────────────────────────────────────────────────────

static RE_HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{Ll})-\n(\p{Ll})").unwrap());

/// Join words hyphenated across a line break.
///
/// Only lowercase-to-lowercase joins are made; `UTF-8`-style hyphens and
/// proper-noun compounds stay untouched.
fn repair_hyphenation(text: &str) -> String {
    RE_HYPHEN_BREAK.replace_all(text, "$1$2").to_string()
}

// ── Bullets ──────────────────────────────────────────────────────────────

/// If `line` starts with a bullet glyph, return the item text after it.
fn bullet_item(line: &str) -> Option<&str> {
    for marker in ["• ", "◦ ", "▪ ", "– ", "— ", "* "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    None
}

// ── Headings ─────────────────────────────────────────────────────────────

/// Classify a line as a Markdown heading, or `None` for body text.
fn as_heading(line: &str) -> Option<String> {
    if line.len() > MAX_HEADING_LEN || looks_like_sentence_end(line) {
        return None;
    }
    if is_all_caps(line) {
        return Some(format!("## {line}"));
    }
    if is_title_case(line) {
        return Some(format!("### {line}"));
    }
    None
}

fn looks_like_sentence_end(line: &str) -> bool {
    line.ends_with('.') || line.ends_with(',') || line.ends_with(';') || line.ends_with(':')
}

/// All alphabetic characters uppercase, and at least one of them present.
fn is_all_caps(line: &str) -> bool {
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

/// Every significant word (len > 3) capitalised, and the line contains
/// more than one word (single capitalised words are usually labels or
/// names, not headings).
fn is_title_case(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 2 {
        return false;
    }
    let significant: Vec<&&str> = words.iter().filter(|w| w.len() > 3).collect();
    if significant.is_empty() {
        return false;
    }
    significant
        .iter()
        .all(|w| w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false))
}
