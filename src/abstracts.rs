//! Abstract resolution
//!
//! Four independent detection strategies tried in fixed order; the first to
//! produce non-empty text after normalization wins. The chain exists because
//! real papers label their abstract inconsistently: a plain "Abstract" line,
//! a rotated column of single letters, a label jammed against the
//! Introduction heading by two-column layout, or no label at all.

use crate::config::ExtractConfig;
use crate::layout::TextLine;

use once_cell::sync::Lazy;
use regex::Regex;

/// One self-contained detection rule; returns the collected raw lines,
/// empty when the rule did not fire.
type Strategy = fn(&[TextLine], usize, &ExtractConfig) -> Vec<String>;

const STRATEGIES: [Strategy; 4] = [explicit_label, vertical_label, two_column_label, implicit_body];

/// Resolve the abstract from the first-page line sequence.
///
/// `title_first_line` is the sequence index of the resolved title's first
/// line; only the implicit strategy needs it. Returns `""` when no strategy
/// matched, which is a legitimate outcome, not an error.
pub fn resolve_abstract(
    lines: &[TextLine],
    title_first_line: usize,
    config: &ExtractConfig,
) -> String {
    for strategy in STRATEGIES {
        let collected = strategy(lines, title_first_line, config);
        if collected.is_empty() {
            continue;
        }
        let text = build_abstract(&collected);
        if !text.is_empty() {
            return text;
        }
    }
    String::new()
}

/// Does the line's space-stripped, lower-cased text start with "abstract"?
pub fn starts_with_abstract_label(text: &str) -> bool {
    text.replace(' ', "").to_lowercase().starts_with("abstract")
}

const INTRODUCTION_PREFIXES: [&str; 5] =
    ["1", "1 Introduction", "1. Introduction", "Introduction", "I. "];

/// Is the line the heading of the first numbered section? Width is checked
/// too: body sentences can start with "1" but run much wider than a heading.
pub fn is_introduction_heading(text: &str, width: f32, config: &ExtractConfig) -> bool {
    INTRODUCTION_PREFIXES.iter().any(|p| text.starts_with(p))
        && width < config.introduction_max_width
}

/// Strategy 1: a line labeled "Abstract" starts the block; collect until the
/// Introduction heading.
fn explicit_label(lines: &[TextLine], _title_first: usize, config: &ExtractConfig) -> Vec<String> {
    let mut collected = Vec::new();
    let mut in_abstract = false;
    for line in lines {
        if starts_with_abstract_label(&line.text) {
            in_abstract = true;
        }
        if in_abstract {
            if is_introduction_heading(&line.text, line.width, config) {
                break;
            }
            collected.push(line.text.clone());
        }
    }
    collected
}

/// Do the 8 lines ending at `at` spell "abstract" one letter per line?
fn is_vertical_label(lines: &[TextLine], at: usize) -> bool {
    if at < 8 {
        return false;
    }
    let concat: String = lines[at - 7..=at]
        .iter()
        .map(|l| l.text.as_str())
        .collect::<String>()
        .to_lowercase();
    concat == "abstract"
}

/// Strategy 2: a rotated "Abstract" rendered as stacked single letters. The
/// body starts at the first steep negative `upper_space` after the label,
/// i.e. the jump from the rotated label back into the text column.
fn vertical_label(lines: &[TextLine], _title_first: usize, config: &ExtractConfig) -> Vec<String> {
    let mut collected = Vec::new();
    let mut label_seen = false;
    let mut in_abstract = false;
    for (i, line) in lines.iter().enumerate() {
        if !label_seen && is_vertical_label(lines, i) {
            label_seen = true;
        }
        if label_seen && !in_abstract && line.upper_space < config.vertical_label_exit_space {
            in_abstract = true;
        }
        if in_abstract {
            if is_introduction_heading(&line.text, line.width, config) {
                break;
            }
            collected.push(line.text.clone());
        }
    }
    collected
}

/// Is "Abstract" jammed directly against the Introduction heading at `at`?
fn is_two_column_label(lines: &[TextLine], at: usize) -> bool {
    if at < 3 {
        return false;
    }
    let concat = |n: usize| -> String {
        lines[at + 1 - n..=at]
            .iter()
            .map(|l| l.text.as_str())
            .collect::<String>()
            .to_lowercase()
    };
    concat(3) == "abstract1introduction" || concat(2) == "abstract1. introduction"
}

/// Strategy 3: two-column layout places "Abstract" with no visual gap before
/// "1 Introduction". Collect after the jam point until a column break.
fn two_column_label(lines: &[TextLine], _title_first: usize, config: &ExtractConfig) -> Vec<String> {
    let mut collected = Vec::new();
    let mut in_abstract = false;
    for (i, line) in lines.iter().enumerate() {
        if !in_abstract && is_two_column_label(lines, i) {
            in_abstract = true;
        } else if in_abstract {
            if line.upper_space < config.column_change_upper_space {
                break;
            }
            collected.push(line.text.clone());
        }
    }
    collected
}

fn pair_key(height: f32, upper_space: f32) -> (i64, i64) {
    (
        (height * 1000.0).round() as i64,
        (upper_space * 100.0).round() as i64,
    )
}

/// Strategy 4: no label at all. The abstract body is assumed to be the most
/// common `(height, upper_space)` typography between the title and the
/// Introduction heading. The line just before the first exact match is
/// collected retroactively: the abstract's opening line usually has a
/// different gap above it and would otherwise be missed.
fn implicit_body(lines: &[TextLine], title_first: usize, config: &ExtractConfig) -> Vec<String> {
    let intro_line = match lines.iter().position(|l| {
        l.index >= title_first
            && is_introduction_heading(&l.text, l.width, config)
            && l.width > config.min_width
    }) {
        Some(i) => i,
        None => return Vec::new(),
    };

    // Majority (height, upper_space) pair over the span between title and
    // heading; first-seen order breaks count ties.
    let span = lines
        .get(title_first + 1..intro_line.saturating_sub(1))
        .unwrap_or(&[]);
    let mut counts: Vec<((i64, i64), (f32, f32), usize)> = Vec::new();
    for line in span.iter().filter(|l| l.width > config.min_width) {
        let key = pair_key(line.height, line.upper_space);
        match counts.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, _, c)) => *c += 1,
            None => counts.push((key, (line.height, line.upper_space), 1)),
        }
    }
    let mut target: Option<((i64, i64), (f32, f32), usize)> = None;
    for &entry in &counts {
        if target.map_or(true, |(_, _, best)| entry.2 > best) {
            target = Some(entry);
        }
    }
    let (target_key, (target_height, target_space), _) = match target {
        Some(t) => t,
        None => return Vec::new(),
    };

    let margin = config.implicit_target_margin;
    let mut collected = Vec::new();
    let mut in_abstract = false;
    for (i, line) in lines.iter().enumerate() {
        if i < title_first {
            continue;
        }
        if !in_abstract && pair_key(line.height, line.upper_space) == target_key {
            in_abstract = true;
            if i > 0 {
                collected.push(lines[i - 1].text.clone());
            }
        } else if in_abstract
            && (line.height < target_height - margin
                || line.height > target_height + margin
                || line.upper_space < target_space - margin
                || line.upper_space > target_space + margin)
        {
            break;
        }
        if in_abstract {
            collected.push(line.text.clone());
        }
    }
    collected
}

static LABEL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Abstract|ABSTRACT|A B S T R A C T|a b s t r a c t)").unwrap());

/// Join collected lines and strip the label prefix and leading punctuation.
pub fn build_abstract(lines: &[String]) -> String {
    let joined = lines.join(" ");
    let stripped = LABEL_PREFIX_RE.replace(&joined, "");
    stripped
        .trim_start()
        .trim_start_matches('\u{2014}')
        .trim_start_matches(':')
        .trim_start_matches('-')
        .trim_start_matches('.')
        .trim_start()
        .to_string()
}
