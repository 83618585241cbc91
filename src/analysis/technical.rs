use super::structure::PageStructure;
use crate::types::{recommend, Category, CategoryResult, Priority, Severity};
use regex::Regex;
use std::sync::OnceLock;

pub const SLUG_MAX_LEN: usize = 75;

pub const SLUG_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "from", "as", "it", "this", "that",
];

static RE_DATE_RUN: OnceLock<Regex> = OnceLock::new();

fn re_date_run() -> &'static Regex {
    RE_DATE_RUN.get_or_init(|| Regex::new(r"\d{4,}").expect("valid digit-run pattern"))
}

pub struct TechnicalInput<'a> {
    pub structure: &'a PageStructure,
    pub slug: &'a str,
    pub has_featured_image: bool,
    pub word_count: usize,
}

pub fn analyze_technical(input: &TechnicalInput<'_>) -> CategoryResult {
    let mut result = CategoryResult::new(Category::Technical);
    check_headings(&mut result, input.structure, input.word_count);
    check_links(&mut result, input.structure, input.word_count);
    check_images(&mut result, input.structure, input.has_featured_image);
    check_slug(&mut result, input.slug);
    result
}

fn check_headings(result: &mut CategoryResult, structure: &PageStructure, word_count: usize) {
    let h1 = structure.count_level(1);
    if h1 == 0 {
        result.penalize(
            20,
            "missing_h1",
            Severity::Warning,
            "Content has no H1 heading.".to_string(),
            recommend(
                Priority::High,
                "Add a single H1 heading that states the topic",
                "The H1 is the strongest on-page topic signal",
            ),
        );
    } else if h1 > 1 {
        result.penalize(
            15,
            "multiple_h1",
            Severity::Warning,
            format!("Content has {} H1 headings.", h1),
            recommend(
                Priority::Medium,
                "Keep one H1 and demote the others to H2",
                "Several H1s blur the page's main topic",
            ),
        );
    }

    let skips = structure.heading_skips();
    if skips > 0 {
        result.penalize(
            8,
            "heading_hierarchy_skip",
            Severity::Warning,
            format!("Heading levels are skipped {} time(s) (e.g. H2 followed by H4).", skips),
            recommend(
                Priority::Medium,
                "Nest headings one level at a time",
                "A clean outline helps crawlers and screen readers",
            ),
        );
    }

    let subheadings = (2..=4).map(|l| structure.count_level(l)).sum::<usize>();
    if subheadings == 0 && word_count > 300 {
        result.penalize(
            10,
            "no_subheadings",
            Severity::Warning,
            format!("{} words of content with no H2-H4 subheadings.", word_count),
            recommend(
                Priority::Medium,
                "Break the content into sections with H2/H3 subheadings",
                "Subheadings make long content scannable",
            ),
        );
    }
}

fn check_links(result: &mut CategoryResult, structure: &PageStructure, word_count: usize) {
    if structure.internal_links() == 0 && word_count > 200 {
        result.penalize(
            15,
            "no_internal_links",
            Severity::Warning,
            "Content has no internal links.".to_string(),
            recommend(
                Priority::High,
                "Link to two or three related pages on this site",
                "Internal links spread authority and keep readers on site",
            ),
        );
    }

    if structure.external_links() == 0 && word_count > 500 {
        result.penalize(
            5,
            "no_external_links",
            Severity::Info,
            "Content has no external links.".to_string(),
            recommend(
                Priority::Low,
                "Cite at least one authoritative external source",
                "Outbound citations add credibility",
            ),
        );
    }
}

fn check_images(result: &mut CategoryResult, structure: &PageStructure, has_featured_image: bool) {
    let missing_alt = structure.images.iter().filter(|i| i.missing_alt()).count();
    if missing_alt > 0 {
        let penalty = (5 * missing_alt).min(15) as u8;
        result.penalize(
            penalty,
            "missing_alt_text",
            Severity::Warning,
            format!(
                "{} of {} image(s) have no alt text.",
                missing_alt,
                structure.images.len()
            ),
            recommend(
                Priority::Medium,
                "Describe every image with alt text",
                "Alt text feeds image search and accessibility",
            ),
        );
    }

    if !has_featured_image {
        result.penalize(
            8,
            "missing_featured_image",
            Severity::Info,
            "No featured image is set.".to_string(),
            recommend(
                Priority::Low,
                "Set a featured image",
                "Featured images appear in social shares and rich results",
            ),
        );
    }
}

fn check_slug(result: &mut CategoryResult, slug: &str) {
    let slug = slug.trim();
    let length = slug.chars().count();
    if length > SLUG_MAX_LEN {
        result.penalize(
            8,
            "slug_too_long",
            Severity::Info,
            format!("Slug is {} characters long.", length),
            recommend(
                Priority::Low,
                format!("Shorten the slug to under {} characters", SLUG_MAX_LEN),
                "Short URLs are easier to share and read",
            ),
        );
    }

    if re_date_run().is_match(slug) {
        result.penalize(
            5,
            "slug_contains_date",
            Severity::Info,
            "Slug contains what looks like a date or long number.".to_string(),
            recommend(
                Priority::Low,
                "Remove dates from the slug",
                "Dated URLs look stale and break when content is refreshed",
            ),
        );
    }

    let stop_words = count_slug_stop_words(slug);
    if stop_words > 2 {
        result.penalize(
            5,
            "slug_stop_words",
            Severity::Info,
            format!("Slug contains {} stop words.", stop_words),
            recommend(
                Priority::Low,
                "Drop filler words such as \"the\", \"and\" or \"of\" from the slug",
                "Concise slugs keep the keywords prominent",
            ),
        );
    }
}

pub fn count_slug_stop_words(slug: &str) -> usize {
    slug.split(|c: char| c == '-' || c == '_' || c == '/')
        .filter(|part| {
            let part = part.to_ascii_lowercase();
            SLUG_STOP_WORDS.contains(&part.as_str())
        })
        .count()
}
