use super::structure::HeadingRef;
use super::text;
use crate::types::{recommend, Category, CategoryResult, Priority, Severity};
use regex::RegexBuilder;

pub const INTRO_WORDS: usize = 150;
pub const MIN_DENSITY: f64 = 0.5;
pub const MAX_DENSITY: f64 = 3.0;

pub struct KeywordInput<'a> {
    pub keyword: &'a str,
    pub title: &'a str,
    pub slug: &'a str,
    pub plain_text: &'a str,
    pub headings: &'a [HeadingRef],
}

/// Whole-word, case-insensitive, non-overlapping occurrences of `keyword` in `text`.
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return 0;
    }
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let trimmed = keyword.trim();
    // Word boundaries only make sense next to word characters ("c++" has none at its end).
    let lead = if is_word(trimmed.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(trimmed.chars().last()) { r"\b" } else { "" };
    let pattern = format!(r"{}{}{}", lead, words.join(r"\s+"), tail);
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.find_iter(text).count(),
        Err(e) => {
            tracing::warn!("keyword pattern rejected for {:?}: {}", keyword, e);
            0
        }
    }
}

/// Percentage of body words taken up by the keyword phrase.
pub fn keyword_density(plain_text: &str, keyword: &str) -> f64 {
    let total_words = text::count_words(plain_text);
    if total_words == 0 {
        return 0.0;
    }
    let keyword_words = text::count_words(keyword);
    let occurrences = count_occurrences(plain_text, keyword);
    (occurrences * keyword_words) as f64 / total_words as f64 * 100.0
}

/// Case-insensitive containment with whitespace runs collapsed on both sides.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    normalize(haystack).contains(&normalize(needle))
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn analyze_keywords(input: &KeywordInput<'_>) -> (CategoryResult, f64) {
    let mut result = CategoryResult::new(Category::Keywords);
    let keyword = input
        .keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let keyword = keyword.as_str();
    let word_count = text::count_words(input.plain_text);

    if !contains_ci(input.title, keyword) {
        result.penalize(
            25,
            "keyword_not_in_title",
            Severity::Warning,
            format!("Focus keyword \"{}\" does not appear in the title.", keyword),
            recommend(
                Priority::High,
                "Work the focus keyword into the title, ideally near the start",
                "The title is the most heavily weighted keyword location",
            ),
        );
    }

    let slug_form = keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if !input.slug.to_lowercase().contains(&slug_form) {
        result.penalize(
            10,
            "keyword_not_in_slug",
            Severity::Info,
            format!("Focus keyword is not in the slug \"{}\".", input.slug),
            recommend(
                Priority::Medium,
                format!("Use a slug containing \"{}\"", slug_form),
                "Keywords in the URL reinforce relevance",
            ),
        );
    }

    let intro = text::first_words(input.plain_text, INTRO_WORDS);
    if count_occurrences(&intro, keyword) == 0 {
        result.penalize(
            10,
            "keyword_not_in_intro",
            Severity::Info,
            format!("Focus keyword is missing from the first {} words.", INTRO_WORDS),
            recommend(
                Priority::Medium,
                "Mention the focus keyword in the opening paragraph",
                "Early mentions confirm the topic to readers and crawlers",
            ),
        );
    }

    if !input.headings.iter().any(|h| contains_ci(&h.text, keyword)) {
        result.penalize(
            8,
            "keyword_not_in_headings",
            Severity::Info,
            "Focus keyword does not appear in any heading.".to_string(),
            recommend(
                Priority::Low,
                "Use the focus keyword in at least one subheading",
                "Headings carry extra weight for topical relevance",
            ),
        );
    }

    let density = keyword_density(input.plain_text, keyword);
    if density < MIN_DENSITY && word_count > 300 {
        result.penalize(
            10,
            "low_keyword_density",
            Severity::Info,
            format!("Keyword density is {:.2}% (below {}%).", density, MIN_DENSITY),
            recommend(
                Priority::Medium,
                "Use the focus keyword a few more times where it reads naturally",
                "Too few mentions weaken the topical signal",
            ),
        );
    } else if density > MAX_DENSITY {
        result.penalize(
            20,
            "high_keyword_density",
            Severity::Warning,
            format!(
                "Keyword density is {:.2}% (above {}%); this may read as keyword stuffing.",
                density, MAX_DENSITY
            ),
            recommend(
                Priority::High,
                "Replace some keyword mentions with synonyms",
                "Keyword stuffing can trigger ranking penalties",
            ),
        );
    }

    (result, density)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_of_repeated_keyword() {
        assert_eq!(keyword_density("cat cat cat", "cat"), 100.0);
        let headings = vec![HeadingRef {
            level: 1,
            text: "Cat".to_string(),
        }];
        let (result, density) = analyze_keywords(&KeywordInput {
            keyword: "cat",
            title: "Cat facts",
            slug: "cat-facts",
            plain_text: "cat cat cat",
            headings: &headings,
        });
        assert_eq!(density, 100.0);
        assert!(result.has_issue("high_keyword_density"));
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_occurrences_are_whole_word_and_case_insensitive() {
        assert_eq!(count_occurrences("Rust rusty RUST trust", "rust"), 2);
        assert_eq!(count_occurrences("Error Handling and error\nhandling", "error handling"), 2);
        assert_eq!(count_occurrences("c++ and C++", "c++"), 2);
        assert_eq!(count_occurrences("anything", "  "), 0);
    }

    #[test]
    fn test_multiword_density() {
        let body = "error handling ".to_string() + &"word ".repeat(98);
        // 1 occurrence * 2 words / 100 words
        assert!((keyword_density(&body, "error handling") - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_everywhere() {
        let body = "lorem ".repeat(400);
        let (result, _) = analyze_keywords(&KeywordInput {
            keyword: "rust macros",
            title: "Something else",
            slug: "something-else",
            plain_text: &body,
            headings: &[],
        });
        for t in [
            "keyword_not_in_title",
            "keyword_not_in_slug",
            "keyword_not_in_intro",
            "keyword_not_in_headings",
            "low_keyword_density",
        ] {
            assert!(result.has_issue(t), "expected {}", t);
        }
        assert_eq!(result.score, 100 - 25 - 10 - 10 - 8 - 10);
    }

    #[test]
    fn test_inner_whitespace_in_keyword_is_ignored() {
        let headings = vec![HeadingRef {
            level: 2,
            text: "Rust macros".to_string(),
        }];
        let body = format!("rust macros {}", "word ".repeat(100));
        let (result, _) = analyze_keywords(&KeywordInput {
            keyword: "rust  macros",
            title: "Rust macros guide",
            slug: "rust-macros-guide",
            plain_text: &body,
            headings: &headings,
        });
        assert!(!result.has_issue("keyword_not_in_title"));
        assert!(!result.has_issue("keyword_not_in_headings"));
        assert!(!result.has_issue("keyword_not_in_slug"));
        assert!(!result.has_issue("keyword_not_in_intro"));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_keyword_only_after_intro() {
        let body = "filler ".repeat(200) + "rust macros";
        let (result, _) = analyze_keywords(&KeywordInput {
            keyword: "Rust Macros",
            title: "Rust macros explained",
            slug: "rust-macros-explained",
            plain_text: &body,
            headings: &[],
        });
        assert!(result.has_issue("keyword_not_in_intro"));
        assert!(!result.has_issue("keyword_not_in_title"));
        assert!(!result.has_issue("keyword_not_in_slug"));
    }
}
