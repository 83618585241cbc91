use crate::types::{recommend, Category, CategoryResult, Priority, Severity};

/// Word count threshold below which thin content is treated as an error.
const THIN_CONTENT_WORDS: usize = 100;

pub fn analyze_content(
    word_count: usize,
    min_words: usize,
    excerpt: &str,
    desc_min_len: usize,
    desc_max_len: usize,
) -> CategoryResult {
    let mut result = CategoryResult::new(Category::Content);

    if word_count < min_words {
        let thin = word_count < THIN_CONTENT_WORDS;
        let (penalty, severity) = if thin {
            (35, Severity::Error)
        } else {
            (25, Severity::Warning)
        };
        result.penalize(
            penalty,
            "content_too_short",
            severity,
            format!(
                "Content has {} words; at least {} are recommended.",
                word_count, min_words
            ),
            recommend(
                Priority::High,
                format!("Expand the content to at least {} words", min_words),
                "Thin content rarely ranks and offers little value to readers",
            ),
        );
    }

    let excerpt = excerpt.trim();
    if excerpt.is_empty() {
        result.penalize(
            15,
            "missing_excerpt",
            Severity::Warning,
            "No excerpt / meta description is set.".to_string(),
            recommend(
                Priority::Medium,
                format!(
                    "Write an excerpt of {}-{} characters summarising the content",
                    desc_min_len, desc_max_len
                ),
                "Search engines fall back to arbitrary page text without one",
            ),
        );
        return result;
    }

    let length = excerpt.chars().count();
    if length < desc_min_len {
        result.penalize(
            8,
            "excerpt_too_short",
            Severity::Info,
            format!(
                "Excerpt is {} characters; aim for at least {}.",
                length, desc_min_len
            ),
            recommend(
                Priority::Low,
                format!("Lengthen the excerpt to {}-{} characters", desc_min_len, desc_max_len),
                "Longer descriptions use the full search snippet",
            ),
        );
    } else if length > desc_max_len {
        result.penalize(
            5,
            "excerpt_too_long",
            Severity::Info,
            format!(
                "Excerpt is {} characters; search engines truncate after about {}.",
                length, desc_max_len
            ),
            recommend(
                Priority::Low,
                format!("Trim the excerpt to at most {} characters", desc_max_len),
                "Truncated descriptions lose their call to action",
            ),
        );
    }

    result
}
