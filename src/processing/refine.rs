//! Cosmetic punctuation and capitalization repair for model summaries.
//!
//! Spacing around punctuation is normalized before sentence breaks are inserted; with the
//! opposite order a space added after `!` or `?` would turn into a sentence break on a second
//! pass, and refinement must be idempotent. For the same reason the abbreviation test looks at
//! letters as they will read after capitalization.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?])").expect("valid punctuation pattern"));

/// Normalize punctuation spacing, break lines after sentences, and capitalize fragments.
pub fn refine_summary(summary: &str) -> String {
    let tightened = SPACE_BEFORE_PUNCTUATION.replace_all(summary, "$1");
    let spaced = space_after_punctuation(&tightened);
    let broken = break_sentences(&spaced);

    broken
        .split(". ")
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(capitalize_lines)
        .collect::<Vec<_>>()
        .join(". ")
}

fn space_after_punctuation(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(current) = chars.next() {
        output.push(current);
        if matches!(current, '.' | ',' | '!' | '?')
            && chars.peek().is_some_and(|next| !next.is_whitespace())
        {
            output.push(' ');
        }
    }
    output
}

/// Replace a whitespace run with a newline when it follows terminal punctuation.
fn break_sentences(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for run in WHITESPACE_RUN.find_iter(text) {
        output.push_str(&text[last..run.start()]);
        if ends_sentence(&output) {
            output.push('\n');
        } else {
            output.push_str(run.as_str());
        }
        last = run.end();
    }
    output.push_str(&text[last..]);
    output
}

/// Whether `prefix` ends with `.`, `?` or `!` that is not part of an abbreviation shape such as
/// `e.g.` or `Dr.`.
fn ends_sentence(prefix: &str) -> bool {
    let tail: Vec<(usize, char)> = prefix.char_indices().rev().take(4).collect();
    let letter = |index: usize| tail.get(index).map(|&(_, c)| c);
    match letter(0) {
        Some('.' | '?' | '!') => {}
        _ => return false,
    }
    let abbreviation_dot = matches!(
        (letter(3), letter(2), letter(1)),
        (Some(before), Some('.'), Some(after)) if is_word_char(before) && is_word_char(after)
    );
    let title_abbreviation = matches!(
        (letter(0), letter(1), tail.get(2)),
        (Some('.'), Some(second), Some(&(start, first)))
            if second.is_ascii_lowercase() && reads_uppercase(first, &prefix[..start])
    );
    !(abbreviation_dot || title_abbreviation)
}

/// Whether `c`, following `before`, is an ASCII capital once `capitalize_lines` has run.
fn reads_uppercase(c: char, before: &str) -> bool {
    if c.is_ascii_uppercase() {
        return true;
    }
    starts_fragment(before)
        && c
            .to_uppercase()
            .last()
            .is_some_and(|upper| upper.is_ascii_uppercase())
}

/// Whether the next character opens a line or a `. `-separated fragment.
fn starts_fragment(before: &str) -> bool {
    if before.ends_with('\n') {
        return true;
    }
    let trimmed = before.trim_end();
    trimmed.is_empty() || (trimmed.ends_with('.') && before[trimmed.len()..].starts_with(' '))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn capitalize_lines(fragment: &str) -> String {
    fragment
        .split('\n')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
