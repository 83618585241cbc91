//! Plain-text helpers shared by the analyzers: HTML stripping, word,
//! sentence and paragraph splitting, syllable estimation.

use regex::Regex;
use std::sync::OnceLock;

static RE_INVISIBLE: OnceLock<Regex> = OnceLock::new();
static RE_BLOCK_BREAK: OnceLock<Regex> = OnceLock::new();
static RE_BLOCK_EDGE: OnceLock<Regex> = OnceLock::new();
static RE_TAG: OnceLock<Regex> = OnceLock::new();
static RE_INLINE_WS: OnceLock<Regex> = OnceLock::new();
static RE_PARAGRAPH_GAP: OnceLock<Regex> = OnceLock::new();
static RE_SENTENCE_END: OnceLock<Regex> = OnceLock::new();

fn re_invisible() -> &'static Regex {
    RE_INVISIBLE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style|noscript|template)[^>]*?>.*?</(?:script|style|noscript|template)>")
            .expect("valid invisible-block pattern")
    })
}

fn re_block_break() -> &'static Regex {
    RE_BLOCK_BREAK.get_or_init(|| {
        Regex::new(r"(?i)</(?:p|div|h[1-6]|li|ul|ol|blockquote|pre|section|article|table|tr|figure)\s*>|<br\s*/?>|<hr\s*/?>")
            .expect("valid block-break pattern")
    })
}

/// Remaining block-level tags (openers, table cells) separate words but not paragraphs.
fn re_block_edge() -> &'static Regex {
    RE_BLOCK_EDGE.get_or_init(|| {
        Regex::new(r"(?i)</?(?:p|div|h[1-6]|li|ul|ol|dl|dt|dd|blockquote|pre|section|article|header|footer|nav|aside|main|table|thead|tbody|tr|td|th|figure|figcaption)\b[^>]*>")
            .expect("valid block-edge pattern")
    })
}

fn re_tag() -> &'static Regex {
    RE_TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"))
}

fn re_inline_ws() -> &'static Regex {
    RE_INLINE_WS.get_or_init(|| Regex::new(r"[ \t\r\f\v\u{a0}]+").expect("valid whitespace pattern"))
}

fn re_paragraph_gap() -> &'static Regex {
    RE_PARAGRAPH_GAP.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid paragraph pattern"))
}

fn re_sentence_end() -> &'static Regex {
    RE_SENTENCE_END.get_or_init(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"))
}

/// Convert an HTML body to plain text. Block-level boundaries become blank
/// lines so paragraph structure survives; inline tags vanish without adding
/// whitespace, so `e<em>x</em>cellent` stays one word.
pub fn html_to_text(html: &str) -> String {
    let s = re_invisible().replace_all(html, " ");
    let s = re_block_break().replace_all(&s, "\n\n");
    let s = re_block_edge().replace_all(&s, " ");
    let s = re_tag().replace_all(&s, "");
    let s = decode_entities(&s);

    let lines: Vec<String> = s
        .split('\n')
        .map(|line| re_inline_ws().replace_all(line, " ").trim().to_string())
        .collect();

    // Re-join, collapsing runs of empty lines into one paragraph gap.
    let mut out = String::with_capacity(s.len());
    let mut pending_gap = false;
    for line in lines {
        if line.is_empty() {
            pending_gap = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_gap { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        pending_gap = false;
    }
    out
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&#8217;", "'")
        .replace("&#8216;", "'")
        .replace("&#8220;", "\"")
        .replace("&#8221;", "\"")
        .replace("&#8211;", "-")
        .replace("&#8212;", "-")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Sentences split on runs of `.`, `!` or `?`; blank fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    re_sentence_end()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Paragraphs split on blank lines; blank fragments are dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    re_paragraph_gap()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Heuristic syllable count for an English word.
///
/// Counts vowel groups after dropping a trailing silent `e`, adds one for a
/// consonant + `le` ending, and never returns less than one.
pub fn count_syllables(word: &str) -> usize {
    let w: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if w.len() <= 3 {
        return 1;
    }

    let consonant_le = w.ends_with(&['l', 'e']) && !is_vowel(w[w.len() - 3]);
    let stem = if w.last() == Some(&'e') {
        &w[..w.len() - 1]
    } else {
        &w[..]
    };

    let mut groups = 0;
    let mut prev_vowel = false;
    for &c in stem {
        let v = is_vowel(c);
        if v && !prev_vowel {
            groups += 1;
        }
        prev_vowel = v;
    }
    if consonant_le {
        groups += 1;
    }
    groups.max(1)
}

pub fn total_syllables(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .map(count_syllables)
        .sum()
}

/// Minutes at 200 words per minute, at least one.
pub fn reading_time_minutes(word_count: usize) -> u32 {
    ((word_count as f64 / 200.0).ceil() as u32).max(1)
}

/// First `n` words of `text`, space-joined.
pub fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_keeps_paragraphs() {
        let html = "<h1>Title</h1><p>First <strong>para</strong>.</p>\n<p>Second&nbsp;one &amp; more.</p><script>var x = 1;</script>";
        let text = html_to_text(html);
        assert_eq!(text, "Title\n\nFirst para.\n\nSecond one & more.");
        assert_eq!(split_paragraphs(&text).len(), 3);
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let text = html_to_text(r#"<p>Read <a href="/x">our guide</a>. It is e<em>x</em>cellent.</p>"#);
        assert_eq!(text, "Read our guide. It is excellent.");
        assert_eq!(count_words(&text), 6);
    }

    #[test]
    fn test_table_cells_stay_separate() {
        let text = html_to_text("<table><tr><td>alpha</td><td>beta</td></tr></table><ul><li>one</li><li>two</li></ul>");
        assert_eq!(count_words(&text), 4);
    }

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("One two. Three?! Four... ");
        assert_eq!(s, vec!["One two", "Three", "Four"]);
    }

    #[test]
    fn test_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("reading"), 2);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("Syllable,"), 3);
        assert_eq!(count_syllables("12345"), 1);
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(0), 1);
        assert_eq!(reading_time_minutes(200), 1);
        assert_eq!(reading_time_minutes(201), 2);
    }

    #[test]
    fn test_first_words() {
        assert_eq!(first_words("a b  c d", 3), "a b c");
    }
}
