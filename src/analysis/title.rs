use crate::types::{recommend, Category, CategoryResult, ContentItem, Priority, Severity};
use aho_corasick::AhoCorasick;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const POWER_WORDS: &[&str] = &[
    "ultimate",
    "complete",
    "essential",
    "proven",
    "best",
    "guide",
    "how to",
    "easy",
    "quick",
    "simple",
    "free",
    "new",
    "secret",
    "amazing",
    "powerful",
    "effective",
    "top",
    "expert",
    "step-by-step",
    "definitive",
    "exclusive",
    "instant",
    "review",
];

static POWER_WORD_MATCHER: OnceLock<AhoCorasick> = OnceLock::new();

fn power_word_matcher() -> &'static AhoCorasick {
    POWER_WORD_MATCHER.get_or_init(|| {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(POWER_WORDS)
            .expect("valid power-word patterns")
    })
}

pub fn contains_power_word(title: &str) -> bool {
    power_word_matcher().is_match(title)
}

/// Lowercased, trimmed title → ids carrying it. Built once per run from the
/// set of items duplicate detection should consider.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    by_title: HashMap<String, Vec<u64>>,
}

impl TitleIndex {
    pub fn build<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Self {
        let mut index = Self::default();
        for item in items {
            index.insert(&item.title, item.id);
        }
        index
    }

    pub fn insert(&mut self, title: &str, id: u64) {
        let key = Self::key(title);
        if key.is_empty() {
            return;
        }
        let ids = self.by_title.entry(key).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    /// Other ids sharing `title` with `current_id`.
    pub fn duplicates_of(&self, title: &str, current_id: u64) -> Vec<u64> {
        self.by_title
            .get(&Self::key(title))
            .map(|ids| ids.iter().copied().filter(|id| *id != current_id).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    fn key(title: &str) -> String {
        title.trim().to_lowercase()
    }
}

pub fn analyze_title(
    title: &str,
    min_len: usize,
    max_len: usize,
    index: &TitleIndex,
    current_id: u64,
) -> CategoryResult {
    let mut result = CategoryResult::new(Category::Title);
    let title = title.trim();
    let length = title.chars().count();

    if length < min_len {
        result.penalize(
            20,
            "title_too_short",
            Severity::Warning,
            format!("Title is {} characters; aim for at least {}.", length, min_len),
            recommend(
                Priority::High,
                format!("Expand the title to {}-{} characters", min_len, max_len),
                "Short titles waste search-result space and rank for fewer queries",
            ),
        );
    } else if length > max_len {
        result.penalize(
            15,
            "title_too_long",
            Severity::Warning,
            format!("Title is {} characters; search engines truncate after about {}.", length, max_len),
            recommend(
                Priority::Medium,
                format!("Shorten the title to at most {} characters", max_len),
                "Truncated titles lose their ending in search results",
            ),
        );
    }

    let words = title.split_whitespace().count();
    if words < 3 {
        result.penalize(
            10,
            "title_few_words",
            Severity::Info,
            format!("Title has only {} word(s).", words),
            recommend(
                Priority::Low,
                "Use at least three descriptive words in the title",
                "More descriptive titles match more search intents",
            ),
        );
    }

    let duplicates = index.duplicates_of(title, current_id);
    if !duplicates.is_empty() {
        let ids = duplicates
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        result.penalize(
            30,
            "duplicate_title",
            Severity::Error,
            format!("Title duplicates content item(s): {}.", ids),
            recommend(
                Priority::High,
                "Give this item a unique title",
                "Duplicate titles split ranking signals between pages",
            ),
        );
    }

    if !contains_power_word(title) {
        result.penalize(
            5,
            "no_power_words",
            Severity::Info,
            "Title contains no compelling power words.".to_string(),
            recommend(
                Priority::Low,
                "Add a power word such as \"guide\", \"essential\" or \"proven\"",
                "Power words raise click-through rates",
            ),
        );
    }

    if !title.chars().any(|c| c.is_ascii_digit()) {
        result.penalize(
            3,
            "no_numbers",
            Severity::Info,
            "Title contains no numbers.".to_string(),
            recommend(
                Priority::Low,
                "Consider adding a number (a list size, year or statistic)",
                "Titles with numbers tend to draw more clicks",
            ),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_index() -> TitleIndex {
        TitleIndex::default()
    }

    #[test]
    fn test_perfect_title_scores_100() {
        let title = "The Ultimate Guide to 10 Rust Patterns";
        let result = analyze_title(title, 30, 60, &empty_index(), 1);
        assert_eq!(result.score, 100);
        assert!(result.issues.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_single_char_title_penalties() {
        let result = analyze_title("A", 30, 60, &empty_index(), 1);
        assert_eq!(result.score, 100 - 20 - 10 - 5 - 3);
        assert!(result.has_issue("title_too_short"));
        assert!(result.has_issue("title_few_words"));
        assert!(result.has_issue("no_power_words"));
        assert!(result.has_issue("no_numbers"));
    }

    #[test]
    fn test_too_long_title() {
        let title = "Best 5 ".to_string() + &"word ".repeat(20);
        let result = analyze_title(&title, 30, 60, &empty_index(), 1);
        assert!(result.has_issue("title_too_long"));
        assert_eq!(result.score, 85);
    }

    #[test]
    fn test_power_word_is_case_insensitive() {
        assert!(contains_power_word("HOW TO Bake Bread"));
        assert!(contains_power_word("A Step-By-Step walkthrough"));
        assert!(!contains_power_word("Bread baking notes"));
    }

    #[test]
    fn test_duplicate_detection_ignores_self() {
        let mut index = TitleIndex::default();
        index.insert("  Same Title ", 1);
        index.insert("same title", 2);
        index.insert("Other", 3);

        let r1 = analyze_title("Same Title", 1, 100, &index, 1);
        assert!(r1.has_issue("duplicate_title"));
        assert!(r1.issues.iter().any(|i| i.message.contains('2')));

        let r3 = analyze_title("Other", 1, 100, &index, 3);
        assert!(!r3.has_issue("duplicate_title"));
        assert_eq!(index.len(), 2);
    }
}
