//! Title resolution
//!
//! Selects the title from the first-page line sequence by geometric ranking:
//! wide lines near the top of the page are filtered for author/affiliation
//! noise, the tallest surviving line anchors the title, equally tall
//! neighbors are appended (multi-line titles set in one font size), and a
//! final pass merges hyphen-wrapped or tightly spaced continuation lines.

use crate::abstracts::starts_with_abstract_label;
use crate::config::ExtractConfig;
use crate::layout::TextLine;
use crate::MetaError;

use once_cell::sync::Lazy;
use regex::Regex;

/// A resolved title
#[derive(Debug, Clone)]
pub struct Title {
    /// Assembled title text, continuation lines merged
    pub text: String,
    /// Index (in the original line sequence) of the first assembled line;
    /// the abstract resolver uses it to bound its implicit-strategy span
    pub first_line: usize,
}

/// Author-affiliation markers: a capitalized word directly followed by a
/// superscript-style "1"/"2" and a separator, or by a comma and one or two
/// asterisks ("Smith1," / "Smith,*").
static AUTHOR_SUPERSCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+[12][,\s]").unwrap());
static AUTHOR_ASTERISK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z][a-z]+,\*{1,2}").unwrap());

/// Does the line look like an author list with footnote markers?
pub fn is_author_like(text: &str) -> bool {
    AUTHOR_SUPERSCRIPT_RE.is_match(text) || AUTHOR_ASTERISK_RE.is_match(text)
}

/// Does the line look like an affiliation/organization footnote?
pub fn is_organization_like(text: &str) -> bool {
    text.starts_with('†') || text.starts_with('?')
}

/// Does the line contain any of the configured skip characters?
pub fn contains_skip_character(text: &str, skip_characters: &[char]) -> bool {
    text.chars().any(|c| skip_characters.contains(&c))
}

/// Punctuation that marks a line as author-block noise rather than a title
/// continuation.
const AUTHOR_BLOCK_MARKERS: [char; 6] = [',', '*', '.', '†', '‡', '♭'];

/// Resolve the title from the first-page line sequence.
///
/// Fails with [`MetaError::NoTitleCandidate`] when no line survives the
/// filters with at least `title_min_length` width; callers should record the
/// failure for that file and continue with others.
pub fn resolve_title(lines: &[TextLine], config: &ExtractConfig) -> Result<Title, MetaError> {
    let candidates: Vec<&TextLine> = lines
        .iter()
        .filter(|l| l.width > config.min_width)
        .collect();

    // The title sits before the abstract, or in the upper half of the page
    // when no label bounds the search.
    let window_end = candidates
        .iter()
        .position(|l| starts_with_abstract_label(&l.text))
        .unwrap_or((candidates.len() as f32 * config.title_bottom_ratio) as usize)
        .min(candidates.len());

    let pool: Vec<&TextLine> = candidates[..window_end]
        .iter()
        .filter(|l| !contains_skip_character(&l.text, &config.skip_characters))
        .filter(|l| !is_author_like(&l.text))
        .filter(|l| !is_organization_like(&l.text))
        .filter(|l| !config.exclude_words.iter().any(|w| w == &l.text))
        .copied()
        .collect();

    // Stable argmax over height, restricted to lines long enough to be a
    // title at all. Ties keep the first occurrence.
    let mut anchor: Option<(usize, f32)> = None;
    for (i, l) in pool.iter().enumerate() {
        if l.width < config.title_min_length {
            continue;
        }
        if anchor.map_or(true, |(_, h)| l.height > h) {
            anchor = Some((i, l.height));
        }
    }
    let anchor_pos = anchor.ok_or(MetaError::NoTitleCandidate)?.0;
    let anchor_height = pool[anchor_pos].height;

    // Extend forward while the font size stays identical; multi-line titles
    // are set in one size.
    let mut assembled: Vec<&TextLine> = vec![pool[anchor_pos]];
    assembled.extend(
        pool[anchor_pos + 1..]
            .iter()
            .copied()
            .take_while(|l| l.height == anchor_height)
            .take(config.title_max_lines.saturating_sub(1)),
    );

    let mut title = assembled
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let start_line = assembled[0].index;
    let end_line = assembled[assembled.len() - 1].index;

    // Continuation merge. The neighbors are inspected in the *original*
    // sequence: author-block lines were filtered out of the pool but still
    // occupy sequence slots. The three branches are mutually exclusive.
    let last_char = title.chars().last();
    if matches!(last_char, Some('-') | Some(':')) && end_line < lines.len() - 1 {
        // Hyphen/colon wrap: the title continues on the next line.
        let next = &lines[end_line + 1];
        if next.upper_space > 0.0 && next.upper_space < config.connecting_space {
            title.push(' ');
            title.push_str(&next.text);
        }
    } else if last_char == Some('∗') && anchor_pos > 0 {
        // Trailing footnote star: the anchor may itself be the second line.
        let anchor = &lines[start_line];
        if anchor.upper_space > 0.0 && anchor.upper_space < config.connecting_space {
            title = format!("{} {}", pool[anchor_pos - 1].text, title);
        }
    } else if end_line < lines.len() - 1 {
        let next = &lines[end_line + 1];
        if next.upper_space > 0.0
            && next.upper_space < config.connecting_space
            && !contains_skip_character(&next.text, &AUTHOR_BLOCK_MARKERS)
        {
            title.push(' ');
            title.push_str(&next.text);
            title.truncate(title.trim_end().len());
        }
    }

    Ok(Title {
        text: title,
        first_line: start_line,
    })
}
